/// Notice shown in place of the game once the connection is lost.
pub const FATAL_NOTICE: &str =
    "Sorry, but there's some problem with your connection or the server is down.";

/// Text and list state the window draws around the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub status: String,
    pub people: Vec<String>,
    pub fatal: Option<String>,
    /// Cleared once a session exists. The window shows its join prompt
    /// before any session is created, so this only signals other front ends.
    pub join_dialog_visible: bool,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            status: String::new(),
            people: Vec::new(),
            fatal: None,
            join_dialog_visible: true,
        }
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    pub fn add_user(&mut self, name: &str) {
        self.people.push(name.to_string());
    }

    pub fn show_fatal(&mut self) {
        self.fatal = Some(FATAL_NOTICE.to_string());
    }

    pub fn hide_join_dialog(&mut self) {
        self.join_dialog_visible = false;
    }
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

use crate::rendering::Renderer;
use log::{debug, info};
use shared::Player;
use std::collections::{HashMap, HashSet};

/// Lobby/running phase of a session. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Lobby,
    Running,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }

    /// Switches to `Running`; returns true only on the first switch.
    pub fn start(&mut self) -> bool {
        let changed = *self == RunState::Lobby;
        *self = RunState::Running;
        changed
    }
}

/// The session's view of every player it has heard about.
pub struct Roster {
    known_names: Vec<String>,
    known_set: HashSet<String>,
    players: HashMap<String, Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self {
            known_names: Vec::new(),
            known_set: HashSet::new(),
            players: HashMap::new(),
        }
    }

    /// Applies one `PlayerChanged` snapshot in arrival order.
    ///
    /// New names join the display list only while the lobby is open. A
    /// player flagged `can_start` moves the session to running. Every
    /// player is painted, whatever the roster did with it. Returns the
    /// names added to the display list.
    pub fn apply(
        &mut self,
        snapshot: Vec<Player>,
        run_state: &mut RunState,
        renderer: &mut Renderer,
    ) -> Vec<String> {
        let mut added = Vec::new();

        for player in snapshot {
            debug!(
                "{} at [{};{}] ready={} can_start={}",
                player.name, player.position.x, player.position.y, player.is_ready, player.can_start
            );

            if !run_state.is_running() && self.known_set.insert(player.name.clone()) {
                self.known_names.push(player.name.clone());
                added.push(player.name.clone());
            }

            if player.can_start && run_state.start() {
                info!("Server signalled start via {}", player.name);
            }

            renderer.draw(&player.name, &player.color, player.position);

            self.players.insert(player.name.clone(), player);
        }

        added
    }

    /// Names in the order they first appeared.
    pub fn known_names(&self) -> &[String] {
        &self.known_names
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn len(&self) -> usize {
        self.known_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_names.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

//! Keyboard to command mapping, gated on the session's run state

use log::debug;
use macroquad::input::KeyCode;
use macroquad::miniquad::{EventHandler, KeyMods};
use shared::{Direction, OutboundMessage};

/// What a key press asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Ready,
}

/// Fixed key table. Arrow keys steer; Enter or Space asks to start.
pub fn map_key(key: KeyCode) -> Option<KeyAction> {
    match key {
        KeyCode::Left => Some(KeyAction::Move(Direction::Left)),
        KeyCode::Up => Some(KeyAction::Move(Direction::Up)),
        KeyCode::Right => Some(KeyAction::Move(Direction::Right)),
        KeyCode::Down => Some(KeyAction::Move(Direction::Down)),
        KeyCode::Enter | KeyCode::KpEnter | KeyCode::Space => Some(KeyAction::Ready),
        _ => None,
    }
}

/// Every key-down in arrival order, OS auto-repeats included. Fed from
/// macroquad's raw input replay once per frame.
#[derive(Debug, Default)]
pub struct KeyQueue {
    keys: Vec<KeyCode>,
}

impl KeyQueue {
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, KeyCode> {
        self.keys.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl EventHandler for KeyQueue {
    fn update(&mut self) {}

    fn draw(&mut self) {}

    fn key_down_event(&mut self, keycode: KeyCode, _keymods: KeyMods, _repeat: bool) {
        self.keys.push(keycode);
    }
}

pub struct InputManager {
    last_direction: Option<Direction>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            last_direction: None,
        }
    }

    /// Turns a move key into a move request while the game is running.
    /// Presses before that are dropped, never queued.
    pub fn on_key_down(&mut self, key: KeyCode, running: bool) -> Option<OutboundMessage> {
        let Some(KeyAction::Move(direction)) = map_key(key) else {
            return None;
        };

        if !running {
            return None;
        }

        debug!("keyPressed : {}", direction.as_str());
        self.last_direction = Some(direction);
        Some(OutboundMessage::PlayerMoveRequest { direction })
    }

    /// `None` until the first move is sent.
    pub fn last_direction(&self) -> Option<Direction> {
        self.last_direction
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

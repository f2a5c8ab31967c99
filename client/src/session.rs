use crate::countdown::{Countdown, CountdownState};
use crate::game::{Roster, RunState};
use crate::hud::Hud;
use crate::input::{map_key, InputManager, KeyAction};
use crate::network::{Connection, ConnectionError, ConnectionEvent, Outbox};
use crate::rendering::Renderer;
use log::{debug, error, info, warn};
use macroquad::input::KeyCode;
use shared::{
    Direction, InboundMessage, OutboundMessage, CANVAS_HEIGHT, CANVAS_WIDTH, COUNTDOWN_START,
    COUNTDOWN_TICK_MS, DEFAULT_SERVER_URL, TILE_SIZE,
};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub server_url: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub tile_size: u32,
    pub countdown_start: u32,
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            tile_size: TILE_SIZE,
            countdown_start: COUNTDOWN_START,
            tick_interval: Duration::from_millis(COUNTDOWN_TICK_MS),
        }
    }
}

/// One joined player's session: owns the connection and all shared state,
/// and routes connection events, countdown ticks and key presses to it.
/// Every handler runs to completion before the next one starts.
pub struct Session<C: Outbox> {
    player_name: String,
    config: SessionConfig,
    connection: C,

    run_state: RunState,
    roster: Roster,
    countdown: Countdown,
    input: InputManager,
    renderer: Renderer,
    hud: Hud,

    dropped_frames: u64,
}

impl Session<Connection> {
    /// Opens the connection for `player_name`. Must be called from within
    /// a Tokio runtime.
    pub fn open(config: SessionConfig, player_name: &str) -> Result<Self, ConnectionError> {
        let connection = Connection::open(&config.server_url, player_name)?;
        Ok(Self::with_outbox(config, player_name, connection))
    }

    /// Handles every connection event already waiting, then any countdown
    /// tick due at `now`.
    pub fn pump(&mut self, now: Instant) {
        while let Some(event) = self.connection.try_next_event() {
            self.handle_event(event, now);
        }
        self.poll_countdown(now);
    }
}

impl<C: Outbox> Session<C> {
    pub fn with_outbox(config: SessionConfig, player_name: &str, connection: C) -> Self {
        let mut hud = Hud::new();
        hud.set_status("Connecting...");
        hud.hide_join_dialog();

        Session {
            player_name: player_name.to_string(),
            countdown: Countdown::new(config.tick_interval),
            renderer: Renderer::new(config.canvas_width, config.canvas_height, config.tile_size),
            config,
            connection,
            run_state: RunState::Lobby,
            roster: Roster::new(),
            input: InputManager::new(),
            hud,
            dropped_frames: 0,
        }
    }

    pub fn handle_event(&mut self, event: ConnectionEvent, now: Instant) {
        if self.is_dead() {
            return;
        }

        match event {
            ConnectionEvent::Opened => {
                info!("Connected as {}", self.player_name);
                self.hud.set_status("Connected");
            }
            ConnectionEvent::Message(raw) => self.handle_frame(&raw, now),
            ConnectionEvent::Closed => {
                info!("Disconnected");
                self.hud.set_status("Disconnected");
            }
            ConnectionEvent::Failed(reason) => {
                error!("Connection lost: {}", reason);
                self.hud.show_fatal();
            }
        }
    }

    /// Decodes and dispatches one inbound frame. Malformed frames are dropped.
    pub fn handle_frame(&mut self, raw: &str, now: Instant) {
        if self.is_dead() {
            return;
        }

        match InboundMessage::decode(raw) {
            Ok(message) => self.dispatch(message, now),
            Err(e) => {
                self.dropped_frames += 1;
                warn!("Dropping frame: {}", e);
            }
        }
    }

    fn dispatch(&mut self, message: InboundMessage, now: Instant) {
        match message {
            InboundMessage::GameStart(obj) => {
                info!("GameStart {}", obj);
                if self.run_state.is_running() {
                    debug!("Game already running, no countdown needed");
                } else if !self.countdown.start(self.config.countdown_start, now) {
                    debug!("Countdown already started, ignoring GameStart");
                } else if self.countdown.is_done() {
                    self.run_state.start();
                }
            }
            InboundMessage::PlayerChanged(players) => {
                let added = self
                    .roster
                    .apply(players, &mut self.run_state, &mut self.renderer);
                for name in &added {
                    self.hud.add_user(name);
                }
            }
            InboundMessage::Unknown(msg_type) => {
                debug!("Ignoring message type {}", msg_type);
            }
        }
    }

    pub fn poll_countdown(&mut self, now: Instant) {
        if self.is_dead() {
            return;
        }

        if self.countdown.poll(now) {
            self.run_state.start();
        }
    }

    pub fn on_key_down(&mut self, key: KeyCode) {
        if self.is_dead() {
            return;
        }

        match map_key(key) {
            Some(KeyAction::Ready) => {
                self.request_ready();
            }
            Some(KeyAction::Move(_)) => {
                if let Some(message) = self.input.on_key_down(key, self.run_state.is_running()) {
                    self.send(&message);
                }
            }
            None => {}
        }
    }

    /// Tells the server this player is ready. Only meaningful in the lobby.
    pub fn request_ready(&mut self) -> bool {
        if self.is_dead() || self.run_state.is_running() {
            return false;
        }

        info!("Starting game...");
        let message = OutboundMessage::PlayerReady {
            player: self.player_name.clone(),
        };
        self.send(&message);
        true
    }

    fn send(&mut self, message: &OutboundMessage) {
        if let Err(e) = self.connection.send(message) {
            warn!("Error sending {}: {}", message.msg_type(), e);
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn is_running(&self) -> bool {
        self.run_state.is_running()
    }

    pub fn is_dead(&self) -> bool {
        self.hud.fatal.is_some()
    }

    pub fn known_names(&self) -> &[String] {
        self.roster.known_names()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn last_direction(&self) -> Option<Direction> {
        self.input.last_direction()
    }

    pub fn countdown_state(&self) -> CountdownState {
        self.countdown.state()
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }
}

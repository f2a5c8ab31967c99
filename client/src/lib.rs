//! # Arena Client Library
//!
//! This library provides the client side of the server-authoritative arena
//! game. Players join a lobby, ready up, and then steer an avatar across a
//! shared toroidal grid while the server streams the authoritative roster
//! over a WebSocket. The client never simulates anything itself: it keeps a
//! display roster, counts down to the start, paints what the server reports
//! and forwards key presses as move intents.
//!
//! ## Architecture Overview
//!
//! ### Event-Driven Session
//! A single [`session::Session`] owns every piece of mutable state. Three
//! independent sources feed it: inbound connection events, countdown ticks
//! and key presses. Each handler runs to completion before the next starts,
//! so no locking is involved. The only state two sources share is the run
//! flag, and it can only ever move from lobby to running, so the order in
//! which a countdown tick and a `canStart` snapshot arrive does not matter.
//!
//! ### Server Authority
//! Every `PlayerChanged` snapshot replaces what the client knows about the
//! listed players. There is no prediction and no reconciliation; transport
//! ordering is what makes the newest snapshot the current one.
//!
//! ### Trail Rendering
//! Tiles are painted into a persistent canvas that is never cleared. The
//! picture is the cumulative trail of every cell each player has occupied.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! - WebSocket connection on a Tokio task, exchanged over channels
//! - Endpoint construction with the player name as a query parameter
//! - Lifecycle events: opened, message, clean close, failure
//!
//! ### Session Module (`session`)
//! - Inbound frame decoding and dispatch by `msgType`
//! - Countdown polling, key routing and ready requests
//! - Fatal error handling: a failed connection ends the session for good
//!
//! ### Game Module (`game`)
//! - Lobby/running state
//! - Roster reconciliation from snapshots
//!
//! ### Countdown Module (`countdown`)
//! - Idle/running/done state machine driven by explicit instants
//!
//! ### Input Module (`input`)
//! - Fixed key table and run-state gating for move requests
//!
//! ### Rendering Module (`rendering`)
//! - Game-space to pixel mapping with wrap-around on both axes
//! - Trail canvas and display color parsing
//!
//! ### HUD Module (`hud`) and App Module (`app`)
//! - Status line, player list and fatal notice as plain data
//! - Window frontend drawing the canvas and HUD with macroquad
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::session::{Session, SessionConfig};
//! use std::time::Instant;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::open(SessionConfig::default(), "alice")?;
//!
//!     loop {
//!         // Connection events and due countdown ticks
//!         session.pump(Instant::now());
//!
//!         if session.is_dead() {
//!             break;
//!         }
//!         tokio::time::sleep(std::time::Duration::from_millis(16)).await;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod countdown;
pub mod game;
pub mod hud;
pub mod input;
pub mod network;
pub mod rendering;
pub mod session;

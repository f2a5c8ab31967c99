//! Window frontend: join prompt, frame loop and HUD drawing

use crate::countdown::CountdownState;
use crate::input::KeyQueue;
use crate::network::Outbox;
use crate::session::{Session, SessionConfig};
use log::{error, info};
use macroquad::input::utils::{register_input_subscriber, repeat_all_miniquad_input};
use macroquad::prelude::*;
use tokio::runtime::Runtime;

const MARGIN: f32 = 10.0;
const HEADER_HEIGHT: f32 = 40.0;
const SIDEBAR_WIDTH: f32 = 180.0;
const FONT_SIZE: f32 = 20.0;

pub fn window_conf(config: &SessionConfig) -> Conf {
    Conf {
        window_title: "Arena".to_owned(),
        window_width: (config.canvas_width as f32 + SIDEBAR_WIDTH + MARGIN * 2.0) as i32,
        window_height: (config.canvas_height as f32 + HEADER_HEIGHT + MARGIN) as i32,
        window_resizable: false,
        ..Default::default()
    }
}

/// Runs until the window closes. The runtime hosts the socket task.
pub async fn run(config: SessionConfig, name: Option<String>, runtime: Runtime) {
    let player_name = match name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => join_prompt().await,
    };

    let mut session = {
        let _guard = runtime.enter();
        match Session::open(config, &player_name) {
            Ok(session) => session,
            Err(e) => {
                error!("Could not start session: {}", e);
                return;
            }
        }
    };
    info!("Joined as {} via {}", player_name, session.connection().url());

    // get_keys_pressed() skips auto-repeats, so replay the raw events instead
    let input_subscriber = register_input_subscriber();
    let mut key_queue = KeyQueue::new();

    let mut texture = Texture2D::from_image(&session.renderer().canvas().to_image());
    texture.set_filter(FilterMode::Nearest);
    let mut uploaded_fills = session.renderer().fills();

    loop {
        session.pump(std::time::Instant::now());

        repeat_all_miniquad_input(&mut key_queue, input_subscriber);
        for key in key_queue.drain() {
            session.on_key_down(key);
        }

        clear_background(Color::from_rgba(26, 26, 26, 255));

        if let Some(notice) = &session.hud().fatal {
            draw_text(notice, MARGIN, HEADER_HEIGHT, 16.0, RED);
            next_frame().await;
            continue;
        }

        if session.renderer().fills() != uploaded_fills {
            texture.update(&session.renderer().canvas().to_image());
            uploaded_fills = session.renderer().fills();
        }
        draw_texture(&texture, MARGIN, HEADER_HEIGHT, WHITE);

        draw_header(&session);
        draw_people(&session);

        next_frame().await;
    }
}

fn draw_header<C: Outbox>(session: &Session<C>) {
    draw_text(&session.hud().status, MARGIN, 25.0, FONT_SIZE, WHITE);

    let phase = match session.countdown_state() {
        _ if session.is_running() => "Running".to_string(),
        CountdownState::Running { remaining } => format!("Starting in {}", remaining),
        _ => "Lobby (Enter: ready)".to_string(),
    };
    draw_text(&phase, MARGIN + 140.0, 25.0, FONT_SIZE, YELLOW);
}

fn draw_people<C: Outbox>(session: &Session<C>) {
    let x = session.renderer().canvas().width() as f32 + MARGIN * 2.0;
    draw_text("Players", x, HEADER_HEIGHT + 15.0, FONT_SIZE, WHITE);

    for (i, name) in session.hud().people.iter().enumerate() {
        let y = HEADER_HEIGHT + 40.0 + i as f32 * 20.0;
        draw_text(name, x, y, FONT_SIZE, LIGHTGRAY);
    }
}

async fn join_prompt() -> String {
    let mut name = String::new();

    loop {
        while let Some(c) = get_char_pressed() {
            if !c.is_control() {
                name.push(c);
            }
        }
        if is_key_pressed(KeyCode::Backspace) {
            name.pop();
        }
        if is_key_pressed(KeyCode::Enter) && !name.trim().is_empty() {
            // Let the Enter press expire before the session sees keys.
            next_frame().await;
            return name.trim().to_string();
        }

        clear_background(Color::from_rgba(26, 26, 26, 255));
        draw_text("Enter your name:", MARGIN, 60.0, 24.0, WHITE);
        draw_text(&format!("{}_", name), MARGIN, 95.0, 24.0, YELLOW);

        next_frame().await;
    }
}

use clap::Parser;
use client::app;
use client::session::SessionConfig;
use log::info;
use shared::{
    CANVAS_HEIGHT, CANVAS_WIDTH, COUNTDOWN_START, COUNTDOWN_TICK_MS, DEFAULT_SERVER_URL, TILE_SIZE,
};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket endpoint of the game server
    #[arg(short = 's', long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Player name; prompts in the window when omitted
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Canvas width in pixels
    #[arg(short = 'w', long, default_value_t = CANVAS_WIDTH)]
    width: u32,

    /// Canvas height in pixels (no short flag to avoid conflict with --help)
    #[arg(long, default_value_t = CANVAS_HEIGHT)]
    height: u32,

    /// Tile edge in pixels
    #[arg(short = 't', long, default_value_t = TILE_SIZE)]
    tile: u32,

    /// Countdown length in ticks after GameStart
    #[arg(short = 'c', long, default_value_t = COUNTDOWN_START)]
    countdown: u32,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value_t = COUNTDOWN_TICK_MS)]
    tick_ms: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Server: {}", args.server);
    info!("Controls: arrow keys to move, Enter/Space to ready up");

    let config = SessionConfig {
        server_url: args.server,
        canvas_width: args.width,
        canvas_height: args.height,
        tile_size: args.tile,
        countdown_start: args.countdown,
        tick_interval: Duration::from_millis(args.tick_ms),
    };

    let runtime = tokio::runtime::Runtime::new()?;

    macroquad::Window::from_config(
        app::window_conf(&config),
        app::run(config, args.name, runtime),
    );

    Ok(())
}

//! stackfall - falling blocks in the terminal

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use stackfall::app::App;
use stackfall::game::Game;
use stackfall::input::KeyBindings;
use stackfall::settings::Settings;
use std::io::stdout;
use std::path::PathBuf;

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(name = "stackfall", version, about)]
struct Args {
    /// Settings file (TOML). Defaults to the platform config directory.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for a reproducible piece sequence
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Board width in columns
    #[arg(long, value_name = "COLS")]
    width: Option<usize>,

    /// Board height in rows
    #[arg(long, value_name = "ROWS")]
    height: Option<usize>,

    /// Milliseconds between gravity ticks
    #[arg(long, value_name = "MS")]
    gravity_ms: Option<u64>,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Get the stackfall temp directory, creating it if needed
fn log_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("stackfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Setup tracing to a log file so nothing writes over the UI
    let session_id: u32 = rand::random();
    let log_dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stackfall=debug".parse()?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "stackfall starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    if let Some(seed) = args.seed {
        settings.gameplay.seed = Some(seed);
    }
    if let Some(width) = args.width {
        settings.board.width = width;
    }
    if let Some(height) = args.height {
        settings.board.height = height;
    }
    if let Some(ms) = args.gravity_ms {
        settings.gameplay.gravity_ms = ms;
    }

    if args.print_config {
        print!("{}", settings.to_toml());
        return Ok(());
    }

    let config = settings.game_config().context("invalid settings")?;
    let gravity = settings.gravity().context("invalid settings")?;
    let game = Game::new(&config).context("creating game")?;
    let mut app = App::new(game, KeyBindings::from_settings(&settings), gravity);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.hide_cursor()?;
    terminal.clear()?;

    let result = app.run(&mut terminal);

    // Restore terminal before reporting anything
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("running game")?;
    println!("Lines cleared: {}", app.game().lines_cleared());
    Ok(())
}

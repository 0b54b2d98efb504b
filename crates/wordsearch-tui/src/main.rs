mod app;
mod config;
mod dictionary_api;
mod leaderboard;
mod render;
mod theme;

use app::{App, TICK_RATE};
use clap::Parser;
use config::Cli;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::Env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use theme::Theme;
use wordsearch_core::Session;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let logging = init_logging();

    let config = cli.session_config();
    let store = cli.ranking_store();
    let session = match cli.seed {
        Some(seed) => Session::with_seed(config, seed, cli.player_name(), store),
        None => Session::new(config, cli.player_name(), store),
    };
    let mut app = App::new(session, cli.oracle(), Theme::named(cli.theme));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = logging {
        eprintln!("Logging disabled: {}", e);
    }
    if let Err(e) = result {
        log::error!("terminal loop failed: {}", e);
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the game
fn init_logging() -> Result<(), String> {
    let dir = dirs::data_local_dir().ok_or("no local data directory")?;
    let file = open_log_file(&dir)?;
    env_logger::Builder::from_env(Env::new().filter_or("WORDSEARCH_LOG", "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| e.to_string())
}

fn open_log_file(dir: &Path) -> Result<File, String> {
    std::fs::create_dir_all(dir).map_err(|e| format!("{}: {}", dir.display(), e))?;
    let path = dir.join("wordsearch.log");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("{}: {}", path.display(), e))
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        render::render(stdout, app)?;
        stdout.flush()?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
            }
        }

        // Tick messages and the countdown
        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_opens_in_new_directory() {
        let dir = std::env::temp_dir().join(format!("wordsearch-logs-{}", std::process::id()));
        assert!(open_log_file(&dir).is_ok());
        assert!(dir.join("wordsearch.log").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_log_file_failure_is_reported() {
        let blocker =
            std::env::temp_dir().join(format!("wordsearch-not-a-dir-{}", std::process::id()));
        std::fs::write(&blocker, "file").unwrap();
        let err = open_log_file(&blocker).unwrap_err();
        assert!(err.contains(&blocker.display().to_string()));
        let _ = std::fs::remove_file(&blocker);
    }
}

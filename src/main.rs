use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs, io, sync::Mutex};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use taskplanner::config::{Cli, Settings};
use taskplanner::planner::Planner;
use taskplanner::store::TaskStore;
use taskplanner::ui;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_cli(Cli::parse())?;
    init_logging(&settings)?;
    info!(data_dir = %settings.data_dir.display(), "starting taskplanner");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(%err, "taskplanner exited with an error");
    }
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let identity = match settings.user.clone() {
        Some(user) => user,
        None => match ui::prompt_identity(terminal)? {
            Some(user) => user,
            None => return Ok(()),
        },
    };

    let store = TaskStore::new(&settings.data_dir);
    let mut planner = Planner::open(store, identity)
        .with_context(|| format!("failed to open tasks in {}", settings.data_dir.display()))?;
    info!(identity = planner.identity(), tasks = planner.tasks.len(), "session opened");

    ui::run_app(terminal, &mut planner)?;
    Ok(())
}

/// Logs go to a file because the terminal belongs to the UI.
fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    fs::create_dir_all(&settings.data_dir)?;
    let log_path = settings.log_file();
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lazyimport::app::App;
use lazyimport::azure::BackendClient;
use lazyimport::config::Config;
use lazyimport::events::{self, Exit};
use lazyimport::logging;
use lazyimport::session::Session;
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// Import Azure DevOps work items into project requirements
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/lazyimport/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for the log file (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Act as this user instead of the configured one
    #[arg(long)]
    user_id: Option<String>,

    /// Act within this organization instead of the configured one
    #[arg(long)]
    org_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(user_id) = cli.user_id {
        config.session.user_id = user_id;
    }
    if let Some(org_id) = cli.org_id {
        config.session.org_id = org_id;
    }

    if config.session.user_id.is_empty() {
        eprintln!("No user configured. Set [session] user_id in ~/.config/lazyimport/config.toml");
        eprintln!("See config.example.toml for reference.");
        std::process::exit(1);
    }

    match logging::init_logging(&cli.log_level) {
        Ok(path) => tracing::info!(log = %path.display(), "lazyimport starting"),
        Err(e) => eprintln!("Logging disabled: {e:#}"),
    }

    // Setup panic hook for clean terminal restore
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let session = Session::from_config(&config.session);
    let backend = Arc::new(BackendClient::new(&config.backend));

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // Create app and run
    let mut app = App::new(config, session, backend);
    let res = events::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    match res {
        Ok(Exit::Quit) => {
            tracing::info!("lazyimport exiting");
            Ok(())
        }
        Ok(Exit::Redirect(route)) => {
            eprintln!("Azure DevOps import is not enabled for this account (redirected to {route}).");
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "event loop failed");
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

mod art;
mod auth;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use art::AsciiArtRenderer;
use config::AppConfig;
use controller::{AppController, AppEvent, Flow};
use error::LoopError;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    let _log_guard = match logging::init_logging(&config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== Spotify Now Playing Starting ===");

    // Step 1: Authorize and obtain the session
    let spotify = match auth::authorize(&config.auth).await {
        Ok(spotify) => spotify,
        Err(e) => {
            tracing::error!(error = %e, "Authorization failed");
            return Err(e.into());
        }
    };

    // Step 2: Confirm who we are before taking over the terminal
    let user = spotify.current_user().await?;
    tracing::info!(user_id = %user.id, "Authorized successfully");
    println!("You are logged in as: {}", user.id);
    if let Some(name) = &user.display_name {
        println!("You are logged in as: {}", name);
    }

    // Step 3: Hand the session to the presentation loop
    let (controller, events) =
        AppController::new(Arc::new(spotify), Arc::new(AsciiArtRenderer::new()), &config);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, controller, events, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("Spotify Now Playing shutting down");

    if let Err(err) = res {
        tracing::error!(error = %err, "Application error");
        return Err(err.into());
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut controller: AppController,
    mut events: UnboundedReceiver<AppEvent>,
    config: &AppConfig,
) -> Result<(), LoopError> {
    let size = terminal.size()?;
    controller.handle_event(AppEvent::Resize(size.width, size.height));

    controller::spawn_terminal_events(controller.sender());
    controller.start_ticker(config.refresh_interval);

    loop {
        let model = controller.model();
        terminal.draw(|f| {
            AppView::render(f, model.snapshot(), &model.ui_state, model.album_art());
        })?;

        // The controller holds a sender, so the queue stays open while it lives
        let Some(event) = events.recv().await else {
            break;
        };
        if controller.handle_event(event) == Flow::Exit {
            break;
        }
    }

    match controller.into_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

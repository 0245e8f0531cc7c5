// Dugout entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the API client
// 4. Create mpsc channels
// 5. Initialize AppState and kick off the first list load
// 6. Spawn the control loop task
// 7. Run the TUI event loop (blocking until the user quits)
// 8. Cleanup on exit

use dugout::api;
use dugout::app;
use dugout::config;
use dugout::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("dugout starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!("Config loaded: base_url={}", config.api.base_url);

    // 3. Build the API client
    let api = api::ApiClient::new(&config.api.base_url);

    // 4. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (net_tx, net_rx) = mpsc::channel(256);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 5. Initialize the application state and kick off the first load
    let mut app_state = app::AppState::new(api, net_tx);
    app_state.load_players();

    // 6. Spawn the control loop task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, net_rx, ui_tx, app_state).await {
            error!("control loop error: {e}");
        }
    });

    // 7. Run the TUI event loop. The TUI consumes ui_rx and sends commands
    // through cmd_tx; it blocks until the user presses 'q' or Ctrl+C.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {e}");
    }

    // 8. Cleanup: wait for the control loop to finish (with timeout). It
    // exits once cmd_tx is dropped or a Quit command lands.
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("dugout shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("dugout.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dugout=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

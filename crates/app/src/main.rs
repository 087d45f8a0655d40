use std::{fs::OpenOptions, sync::Mutex};

use backend::Backend;
use error::AppError;

mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = settings::Settings::load()?;
    init_tracing(&settings.app)?;
    tracing::info!("Starting monthly expenses manager...");

    let (ui_channel, backend_channel) = bridge::pair();
    let (rpc_client, rpc_server) = bridge::rpc_channel();

    // The UI registers its handlers before the backend can announce itself.
    let mut app = tui::App::new(settings.ui, ui_channel, rpc_client)?;

    let mut backend = Backend::builder()
        .token(&settings.ynab.token)
        .base_url(&settings.ynab.base_url)
        .budgets(settings.budgets)
        .payees(settings.payees)
        .build()?;

    let mut tasks = tokio::task::JoinSet::new();
    tasks.spawn(async move {
        backend.setup().await;
        if let Err(err) = backend.run(backend_channel, rpc_server).await {
            tracing::error!("backend stopped: {err}");
        }
    });

    let result = app.run().await;
    tasks.shutdown().await;
    tracing::info!("Bye");

    result.map_err(AppError::from)
}

fn init_tracing(app: &settings::App) -> Result<(), AppError> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&app.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "monthly_expenses={level},tui={level},backend={level},bridge={level},engine={level}",
            level = app.level
        ))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

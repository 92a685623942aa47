//! Smoke binary: build the app, report backend health and todo count, exit.

use taskdeck::{App, RootView};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let app = App::from_env().await?;

    let health = app.health.status().await;
    tracing::info!(?health, "backend health");

    match app.root_view().await {
        RootView::Auth => {
            tracing::info!("no session; sign in to load todos");
        }
        RootView::Todos => match app.todos.list().await {
            Ok(todos) => tracing::info!(count = todos.len(), "todos loaded"),
            Err(e) => tracing::warn!(error = %e, "failed to load todos"),
        },
    }

    Ok(())
}

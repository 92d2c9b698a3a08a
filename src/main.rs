use std::error::Error;
use std::sync::Arc;

use tokio::sync::mpsc;

mod app;
mod components;
mod config;
mod logger;
mod mock;
mod models;
mod services;
mod tui;
mod utils;

use app::App;
use components::component::Component;
use models::Environment;
use services::analytics::LogAnalytics;
use services::export::DirectorySaveDialog;
use services::network::NoopRequestHandle;
use services::store::InMemoryResponseStore;

fn starter_environment() -> Environment {
    match serde_json::json!({
        "base_url": "https://api.example.com",
        "api_token": ""
    }) {
        serde_json::Value::Object(map) => map,
        _ => Environment::new(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logger::init()?;

    let config = config::Config::new()?;

    let store = InMemoryResponseStore::new();
    let requests = mock::seed(&store).await?;

    let mut app = App::new(
        config,
        requests,
        starter_environment(),
        store,
        Arc::new(LogAnalytics),
        Arc::new(DirectorySaveDialog::new(std::env::temp_dir())),
        Arc::new(NoopRequestHandle),
    );

    run(&mut app).await
}

async fn run(app: &mut App) -> Result<(), Box<dyn Error>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    app.register_action_handler(action_tx.clone())?;

    let mut tui = tui::Tui::new()?;
    tui.enter()?;

    if let Some(action) = app.on_mount()? {
        action_tx.send(action)?;
    }

    loop {
        if let Some(event) = tui.next().await {
            if let tui::Event::Render = event {
                tui.terminal.draw(|f| {
                    let _ = app.render(f, f.size());
                })?;
            }

            if let Some(action) = app.handle_events(Some(event))? {
                action_tx.send(action)?;
            }
        }

        while let Ok(action) = action_rx.try_recv() {
            if let Some(next) = app.update(action)? {
                action_tx.send(next)?;
            }
        }

        if app.should_quit {
            break;
        }
    }

    tui.exit()?;

    Ok(())
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Crux-Tracker dashboard CLI
//!
//! Diagnostic entry point: connects to the document store with the
//! configured credentials and prints the signed-in user's dashboard
//! aggregates as JSON.

use crux_tracker::{
    auth::StaticAuth,
    config::Config,
    db::RtdbStore,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(database_url = %config.database_url, "Starting Crux-Tracker dashboard");

    let auth = Arc::new(StaticAuth::new(
        config.user_id.clone(),
        config.auth_token.clone(),
    ));
    let store = Arc::new(RtdbStore::new(&config, auth.clone()).expect("Failed to build store"));

    let state = AppState::new(config.clone(), store, auth);

    let panels = state.routes.get_panel_types().await?;
    tracing::info!(count = panels.len(), "Panel types loaded");

    match state.dashboard.load(&config.user_id).await {
        Ok(data) => {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Err(e) => {
            tracing::error!(error = %e, "Dashboard load failed");
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crux_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

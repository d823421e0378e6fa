pub mod ai;
pub mod app;
pub mod commands;
pub mod config;
pub mod console;
pub mod sensors;
pub mod tts;
pub mod utils;

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::CompanionApp;
use crate::sensors::MockCaptureDevice;
use crate::tts::ConsoleSpeech;

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);
    info!(seed = ?config.seed, speech = config.speech_enabled, "starting companion");

    let app = CompanionApp::launch(
        config,
        Arc::new(ConsoleSpeech::new()),
        Arc::new(MockCaptureDevice::granting()),
    )
    .await;
    console::run_repl(app).await
}

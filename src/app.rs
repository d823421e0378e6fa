//! Wiring: one companion, one sensor hub, started together.

use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::orchestrator::Companion;
use crate::config::CompanionConfig;
use crate::sensors::{CaptureDevice, SensorHub};
use crate::tts::SpeechOutput;

#[derive(Clone)]
pub struct CompanionApp {
    pub companion: Companion,
    pub sensors: SensorHub,
}

impl CompanionApp {
    /// Build the runtime and enter the startup context. Sensors come up only
    /// when the startup transition asks for it and the config allows it.
    pub async fn launch(
        config: CompanionConfig,
        speech: Arc<dyn SpeechOutput>,
        device: Arc<dyn CaptureDevice>,
    ) -> Self {
        let auto_start = config.auto_start_sensors;
        let companion = Companion::new(config, speech);
        let sensors = SensorHub::new(companion.clone(), device);

        let transition = companion.start().await;
        if auto_start && transition.is_some_and(|t| t.auto_start_sensors) {
            for err in sensors.start_all().await {
                warn!(error = %err, "sensor unavailable at startup");
            }
        }
        info!("companion app ready");
        Self { companion, sensors }
    }

    pub async fn shutdown(&self) {
        self.sensors.stop_all().await;
        self.companion.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{MockCaptureDevice, Permission, SensorKind, SensorStatus};
    use crate::tts::RecordingSpeech;

    #[tokio::test(start_paused = true)]
    async fn launch_starts_granted_sensors() {
        let device = MockCaptureDevice::with(Permission::Granted, Permission::Denied);
        let app = CompanionApp::launch(
            CompanionConfig::default(),
            Arc::new(RecordingSpeech::new()),
            Arc::new(device),
        )
        .await;

        assert_eq!(app.sensors.status(SensorKind::Camera).await, SensorStatus::Active);
        assert_eq!(
            app.sensors.status(SensorKind::Microphone).await,
            SensorStatus::Denied
        );
        assert_eq!(app.companion.messages().await.len(), 1);

        app.shutdown().await;
        assert_eq!(app.sensors.task_count(SensorKind::Camera).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_start_can_be_turned_off() {
        let config = CompanionConfig {
            auto_start_sensors: false,
            ..CompanionConfig::default()
        };
        let app = CompanionApp::launch(
            config,
            Arc::new(RecordingSpeech::new()),
            Arc::new(MockCaptureDevice::granting()),
        )
        .await;

        for kind in SensorKind::ALL {
            assert_eq!(app.sensors.status(kind).await, SensorStatus::Idle);
        }
    }
}

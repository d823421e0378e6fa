//! Sensor hub: owns the periodic mock-sensing tasks.
//!
//! Each device gets at most one set of tasks. The camera feeds face emotion;
//! the microphone feeds voice emotion and transcripts.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::interface::{CaptureDevice, Permission, SensorError, SensorKind, SensorStatus};
use super::mock::{pick_label, pick_phrase};
use crate::ai::emotion::EmotionChannel;
use crate::ai::orchestrator::Companion;
use crate::utils::timer::PeriodicTask;

// Offset so sensor draws never mirror the companion's response RNG.
const SENSOR_SEED_OFFSET: u64 = 0x5e45_0b5e;

#[derive(Clone)]
pub struct SensorHub {
    companion: Companion,
    device: Arc<dyn CaptureDevice>,
    rng: Arc<Mutex<StdRng>>,
    running: Arc<Mutex<HashMap<SensorKind, Vec<PeriodicTask>>>>,
}

impl SensorHub {
    pub fn new(companion: Companion, device: Arc<dyn CaptureDevice>) -> Self {
        let rng = match companion.config().seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(SENSOR_SEED_OFFSET)),
            None => StdRng::from_entropy(),
        };
        Self {
            companion,
            device,
            rng: Arc::new(Mutex::new(rng)),
            running: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Ask for access and start sensing. Starting a running device is a no-op.
    pub async fn start(&self, kind: SensorKind) -> Result<(), SensorError> {
        let mut running = self.running.lock().await;
        if running.contains_key(&kind) {
            debug!(sensor = %kind, "already running");
            return Ok(());
        }

        if self.device.request_access(kind).await == Permission::Denied {
            warn!(sensor = %kind, "access denied");
            self.companion
                .set_sensor_status(kind, SensorStatus::Denied)
                .await;
            return Err(SensorError::PermissionDenied(kind));
        }

        let mut tasks = vec![self.emotion_task(kind.channel())];
        if kind == SensorKind::Microphone {
            tasks.push(self.transcript_task());
        }
        running.insert(kind, tasks);
        drop(running);

        self.companion
            .set_sensor_status(kind, SensorStatus::Active)
            .await;
        info!(sensor = %kind, "sensor started");
        Ok(())
    }

    /// Stop sensing. A denied device keeps its denied status.
    pub async fn stop(&self, kind: SensorKind) {
        let stopped = self.running.lock().await.remove(&kind);
        if stopped.is_some() {
            self.companion
                .set_sensor_status(kind, SensorStatus::Idle)
                .await;
            info!(sensor = %kind, "sensor stopped");
        }
    }

    /// Start every device, logging the ones that refuse.
    pub async fn start_all(&self) -> Vec<SensorError> {
        let mut errors = Vec::new();
        for kind in SensorKind::ALL {
            if let Err(e) = self.start(kind).await {
                errors.push(e);
            }
        }
        errors
    }

    pub async fn stop_all(&self) {
        for kind in SensorKind::ALL {
            self.stop(kind).await;
        }
    }

    pub async fn status(&self, kind: SensorKind) -> SensorStatus {
        self.companion.sensor_status(kind).await
    }

    pub async fn task_count(&self, kind: SensorKind) -> usize {
        self.running
            .lock()
            .await
            .get(&kind)
            .map_or(0, |tasks| tasks.iter().filter(|t| !t.is_finished()).count())
    }

    fn emotion_task(&self, channel: EmotionChannel) -> PeriodicTask {
        let period = match channel {
            EmotionChannel::Face => self.companion.config().face_interval(),
            EmotionChannel::Voice => self.companion.config().voice_interval(),
        };
        let companion = self.companion.clone();
        let rng = self.rng.clone();
        PeriodicTask::spawn(period, move || {
            let companion = companion.clone();
            let rng = rng.clone();
            async move {
                let label = pick_label(channel, &mut *rng.lock().await);
                companion.record_emotion(channel, label).await;
            }
        })
    }

    fn transcript_task(&self) -> PeriodicTask {
        let period = self.companion.config().transcript_interval();
        let companion = self.companion.clone();
        let rng = self.rng.clone();
        PeriodicTask::spawn(period, move || {
            let companion = companion.clone();
            let rng = rng.clone();
            async move {
                let phrase = pick_phrase(&mut *rng.lock().await);
                companion.hear_speech(phrase).await;
            }
        })
    }
}

//! Simulated voice-assistant integration.
//!
//! There is no device behind [`AssistantSimulator`]: it produces plausible,
//! randomized suggestions after an artificial round-trip delay and keeps an
//! auditable log of every exchange. Build one at startup and share it by
//! reference (`Arc<AssistantSimulator>`); its log lives as long as the process.
//!
//! Probabilities per call:
//! - receive activity: 0.3 (logged only when something is returned)
//! - receive routine: 0.5 (logged only when something is returned)
//! - send activity: 0.9 success
//! - set reminder: 0.95 success
//! - connection status: 0.9 connected (never logged)

mod catalog;
mod log;
mod random;

pub use catalog::{voice_reply, ACTIVITY_TEMPLATES, ROUTINE_TEMPLATES, SKILL_VERSION};
pub use log::{InteractionLog, MAX_INTERACTIONS};
pub use random::{RandomSource, ScriptedRandom, SystemRandom};

use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::models::*;

pub const ACTIVITY_PROBABILITY: f64 = 0.3;
pub const ROUTINE_PROBABILITY: f64 = 0.5;
pub const SEND_SUCCESS_PROBABILITY: f64 = 0.9;
pub const REMINDER_SUCCESS_PROBABILITY: f64 = 0.95;
pub const CONNECTED_PROBABILITY: f64 = 0.9;

/// Longest gap between now and the reported last sync.
const MAX_SYNC_AGE_MS: f64 = 3_600_000.0;

/// Simulated round-trip per operation. Callers may only rely on these as lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub receive_activity: Duration,
    pub receive_routine: Duration,
    pub send_activity: Duration,
    pub progress: Duration,
    pub reminder: Duration,
    pub connection_status: Duration,
    pub voice_command: Duration,
}

impl LatencyProfile {
    /// No waiting at all.
    pub fn instant() -> Self {
        Self {
            receive_activity: Duration::ZERO,
            receive_routine: Duration::ZERO,
            send_activity: Duration::ZERO,
            progress: Duration::ZERO,
            reminder: Duration::ZERO,
            connection_status: Duration::ZERO,
            voice_command: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            receive_activity: Duration::from_millis(1000),
            receive_routine: Duration::from_millis(1000),
            send_activity: Duration::from_millis(500),
            progress: Duration::from_millis(800),
            reminder: Duration::from_millis(300),
            connection_status: Duration::from_millis(200),
            voice_command: Duration::from_millis(1500),
        }
    }
}

pub struct AssistantSimulator {
    log: Mutex<InteractionLog>,
    rng: Mutex<Box<dyn RandomSource>>,
    latency: LatencyProfile,
}

impl AssistantSimulator {
    pub fn new(rng: impl RandomSource + 'static, latency: LatencyProfile) -> Self {
        let rng: Box<dyn RandomSource> = Box::new(rng);
        Self {
            log: Mutex::new(InteractionLog::new()),
            rng: Mutex::new(rng),
            latency,
        }
    }

    /// Entropy-seeded randomness with the default latencies.
    pub fn with_defaults() -> Self {
        Self::new(SystemRandom::new(), LatencyProfile::default())
    }

    pub fn latency(&self) -> LatencyProfile {
        self.latency
    }

    // ============================================================
    // Incoming suggestions
    // ============================================================

    /// Poll for a new activity suggestion. Usually there is none.
    pub async fn receive_activity(&self) -> Option<Activity> {
        delay(self.latency.receive_activity).await;

        let template = {
            let mut rng = self.rng();
            if !rng.chance(ACTIVITY_PROBABILITY) {
                return None;
            }
            &ACTIVITY_TEMPLATES[rng.pick(ACTIVITY_TEMPLATES.len())]
        };

        let activity = Activity {
            id: self.fresh_id(),
            title: template.title.to_string(),
            description: template.description.to_string(),
            duration: template.duration,
            calories: template.calories,
            date: Utc::now(),
            kind: template.kind,
            completed: false,
            source: ActivitySource::Alexa,
        };

        self.record(InteractionAction::ReceiveActivity, &activity, true);
        Some(activity)
    }

    /// Poll for a recommended routine. Templates come without exercises.
    pub async fn receive_routine(&self) -> Option<Routine> {
        delay(self.latency.receive_routine).await;

        let template = {
            let mut rng = self.rng();
            if !rng.chance(ROUTINE_PROBABILITY) {
                return None;
            }
            &ROUTINE_TEMPLATES[rng.pick(ROUTINE_TEMPLATES.len())]
        };

        let routine = Routine {
            id: self.fresh_id(),
            name: template.name.to_string(),
            description: template.description.to_string(),
            exercises: Vec::new(),
            estimated_duration: template.estimated_duration,
            difficulty: template.difficulty,
            category: template.category.to_string(),
            recommended_by: RoutineSource::Alexa,
            created_at: Utc::now(),
        };

        self.record(InteractionAction::ReceiveRoutine, &routine, true);
        Some(routine)
    }

    // ============================================================
    // Outgoing requests
    // ============================================================

    /// Push a completed activity. `false` is a modeled failure, not an error.
    pub async fn send_activity(&self, activity: &Activity) -> bool {
        delay(self.latency.send_activity).await;
        let success = self.rng().chance(SEND_SUCCESS_PROBABILITY);
        self.record(InteractionAction::SendActivity, activity, success);
        success
    }

    pub async fn progress(&self) -> ProgressSnapshot {
        delay(self.latency.progress).await;
        let snapshot = catalog::progress_snapshot();
        self.record(InteractionAction::GetProgress, &snapshot, true);
        snapshot
    }

    /// Schedule a reminder. `false` is a modeled failure, not an error.
    pub async fn set_reminder(&self, reminder: &Reminder) -> bool {
        delay(self.latency.reminder).await;
        let success = self.rng().chance(REMINDER_SUCCESS_PROBABILITY);
        self.record(InteractionAction::SetReminder, reminder, success);
        success
    }

    pub async fn process_voice_command(&self, command: &str) -> VoiceReply {
        delay(self.latency.voice_command).await;
        let reply = voice_reply(command);
        self.record(
            InteractionAction::VoiceCommand,
            &serde_json::json!({ "command": command, "response": &reply }),
            reply.understood,
        );
        reply
    }

    // ============================================================
    // Status
    // ============================================================

    pub async fn connection_status(&self) -> ConnectionStatus {
        delay(self.latency.connection_status).await;
        let (connected, age) = {
            let mut rng = self.rng();
            (
                rng.chance(CONNECTED_PROBABILITY),
                rng.next_f64() * MAX_SYNC_AGE_MS,
            )
        };
        ConnectionStatus {
            connected,
            last_sync: Utc::now() - chrono::Duration::milliseconds(age as i64),
            skill_version: SKILL_VERSION.to_string(),
        }
    }

    /// Copy of the retained interactions, newest first.
    pub fn interaction_history(&self) -> Vec<AssistantInteraction> {
        self.log().snapshot()
    }

    // ============================================================
    // Internals
    // ============================================================

    fn rng(&self) -> std::sync::MutexGuard<'_, Box<dyn RandomSource>> {
        self.rng.lock().expect("assistant rng lock poisoned")
    }

    fn log(&self) -> std::sync::MutexGuard<'_, InteractionLog> {
        self.log.lock().expect("assistant log lock poisoned")
    }

    fn fresh_id(&self) -> String {
        self.log().next_id().to_string()
    }

    fn record<T: Serialize>(&self, action: InteractionAction, data: &T, success: bool) {
        let data = serde_json::to_value(data).unwrap_or_else(|e| {
            tracing::warn!("Could not serialize {} payload: {}", action.as_str(), e);
            serde_json::Value::Null
        });
        let entry = self.log().record(action, data, success);
        tracing::debug!(id = entry.id, success, "assistant {}", action.as_str());
    }
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one simulated exchange with the voice assistant.
///
/// Interactions are append-only. The simulator keeps only the most recent
/// entries and hands out copies, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantInteraction {
    /// Time-derived and strictly increasing within one simulator.
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub action: InteractionAction,
    /// Payload relevant to the action (activity sent, command heard, ...).
    pub data: serde_json::Value,
    pub success: bool,
}

/// What kind of exchange an [`AssistantInteraction`] records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionAction {
    ReceiveActivity,
    ReceiveRoutine,
    SendActivity,
    GetProgress,
    SetReminder,
    VoiceCommand,
}

impl InteractionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReceiveActivity => "receive_activity",
            Self::ReceiveRoutine => "receive_routine",
            Self::SendActivity => "send_activity",
            Self::GetProgress => "get_progress",
            Self::SetReminder => "set_reminder",
            Self::VoiceCommand => "voice_command",
        }
    }
}

/// Simulated reachability of the assistant skill. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub connected: bool,
    pub last_sync: DateTime<Utc>,
    pub skill_version: String,
}

/// A reminder to schedule on the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Local time of day, e.g. `07:30`.
    pub time: String,
    pub message: String,
    pub days: Vec<String>,
}

/// Weekly progress as reported by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Target minutes for the week.
    pub weekly_goal: u32,
    pub current_progress: u32,
    pub streak_days: u32,
    pub achievements: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Answer to a spoken command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceReply {
    pub understood: bool,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<VoiceAction>,
}

/// Follow-up the app should take after a recognized command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceAction {
    SuggestRoutine {
        #[serde(rename = "routineType")]
        routine_type: String,
    },
    LogActivityPrompt,
    ShowProgress,
}

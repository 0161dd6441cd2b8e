use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::models::{AssistantInteraction, InteractionAction};

/// Number of interactions kept; older ones are dropped first.
pub const MAX_INTERACTIONS: usize = 50;

/// Bounded, chronological record of simulated exchanges.
///
/// Ids and timestamps never go backwards, even if the wall clock does.
#[derive(Debug, Default)]
pub struct InteractionLog {
    entries: VecDeque<AssistantInteraction>,
    last_id: u64,
    last_timestamp: Option<DateTime<Utc>>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next time-derived id: the current epoch millis, bumped past the last one.
    pub fn next_id(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(timestamp);
        timestamp
    }

    pub fn record(
        &mut self,
        action: InteractionAction,
        data: serde_json::Value,
        success: bool,
    ) -> AssistantInteraction {
        let interaction = AssistantInteraction {
            id: self.next_id(),
            timestamp: self.next_timestamp(),
            action,
            data,
            success,
        };
        self.entries.push_back(interaction.clone());
        while self.entries.len() > MAX_INTERACTIONS {
            self.entries.pop_front();
        }
        interaction
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the retained entries, newest first.
    pub fn snapshot(&self) -> Vec<AssistantInteraction> {
        self.entries.iter().rev().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut log = InteractionLog::new();
        let ids: Vec<u64> = (0..75)
            .map(|i| log.record(InteractionAction::VoiceCommand, json!({ "n": i }), true).id)
            .collect();

        assert_eq!(log.len(), MAX_INTERACTIONS);
        let kept: Vec<u64> = log.snapshot().iter().rev().map(|i| i.id).collect();
        assert_eq!(kept, ids[25..].to_vec());
    }

    #[test]
    fn ids_strictly_increase() {
        let mut log = InteractionLog::new();
        let a = log.next_id();
        let b = log.next_id();
        let c = log.next_id();
        assert!(a < b && b < c);
    }

    #[test]
    fn snapshot_is_newest_first() {
        let mut log = InteractionLog::new();
        log.record(InteractionAction::GetProgress, json!(null), true);
        log.record(InteractionAction::SetReminder, json!(null), false);

        let snapshot = log.snapshot();
        assert_eq!(snapshot[0].action, InteractionAction::SetReminder);
        assert_eq!(snapshot[1].action, InteractionAction::GetProgress);
        assert!(snapshot[0].timestamp >= snapshot[1].timestamp);
    }
}

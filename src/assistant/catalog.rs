//! Fixed suggestion templates and the voice command table.

use crate::models::*;

pub struct ActivityTemplate {
    pub title: &'static str,
    pub description: &'static str,
    pub duration: u32,
    pub calories: u32,
    pub kind: ActivityType,
}

pub struct RoutineTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub estimated_duration: u32,
    pub difficulty: Difficulty,
    pub category: &'static str,
}

pub const ACTIVITY_TEMPLATES: &[ActivityTemplate] = &[
    ActivityTemplate {
        title: "Walk with Alexa",
        description: "Voice-guided walking session",
        duration: 30,
        calories: 150,
        kind: ActivityType::Cardio,
    },
    ActivityTemplate {
        title: "Morning strength routine",
        description: "Strength workout recommended by Alexa",
        duration: 25,
        calories: 180,
        kind: ActivityType::Strength,
    },
    ActivityTemplate {
        title: "Stretching session",
        description: "Flexibility and relaxation exercises",
        duration: 15,
        calories: 60,
        kind: ActivityType::Flexibility,
    },
];

pub const ROUTINE_TEMPLATES: &[RoutineTemplate] = &[
    RoutineTemplate {
        name: "Alexa Express Routine",
        description: "Quick and effective workout for busy days",
        estimated_duration: 15,
        difficulty: Difficulty::Beginner,
        category: "Quick Workout",
    },
    RoutineTemplate {
        name: "Alexa Cardio Blast",
        description: "High-intensity cardio session",
        estimated_duration: 30,
        difficulty: Difficulty::Intermediate,
        category: "Cardio",
    },
];

pub const SKILL_VERSION: &str = "2.1.0";

const FALLBACK_RESPONSE: &str =
    "I didn't quite get that. Could you repeat your workout request?";

/// Look up a spoken command. Matching is exact; anything else falls back.
pub fn voice_reply(command: &str) -> VoiceReply {
    let (response, action) = match command {
        "start workout" => (
            "Great, starting your workout. Do you prefer cardio or strength today?",
            VoiceAction::SuggestRoutine {
                routine_type: "mixed".to_string(),
            },
        ),
        "log activity" => (
            "Got it. I'll log your activity. How many minutes did you train?",
            VoiceAction::LogActivityPrompt,
        ),
        "show progress" => (
            "You've completed 120 minutes this week out of your 150 minute goal. Keep it up!",
            VoiceAction::ShowProgress,
        ),
        _ => {
            return VoiceReply {
                understood: false,
                response: FALLBACK_RESPONSE.to_string(),
                action: None,
            }
        }
    };

    VoiceReply {
        understood: true,
        response: response.to_string(),
        action: Some(action),
    }
}

pub fn progress_snapshot() -> ProgressSnapshot {
    ProgressSnapshot {
        weekly_goal: 150,
        current_progress: 120,
        streak_days: 5,
        achievements: vec![
            "First Week Complete".to_string(),
            "Cardio Master".to_string(),
        ],
        recommendations: vec![
            "Try adding more strength exercises".to_string(),
            "Your cardiovascular endurance has improved".to_string(),
            "Consider increasing the intensity gradually".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands_are_understood() {
        for command in ["start workout", "log activity", "show progress"] {
            let reply = voice_reply(command);
            assert!(reply.understood, "{command} should be understood");
            assert!(reply.action.is_some());
        }
    }

    #[test]
    fn start_workout_suggests_mixed_routine() {
        assert_eq!(
            voice_reply("start workout").action,
            Some(VoiceAction::SuggestRoutine {
                routine_type: "mixed".to_string()
            })
        );
    }

    #[test]
    fn unknown_command_falls_back() {
        let reply = voice_reply("order pizza");
        assert!(!reply.understood);
        assert!(reply.action.is_none());
        assert_eq!(reply.response, FALLBACK_RESPONSE);
    }

    #[test]
    fn templates_cover_three_activity_types() {
        let kinds: Vec<_> = ACTIVITY_TEMPLATES.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![ActivityType::Cardio, ActivityType::Strength, ActivityType::Flexibility]
        );
    }
}

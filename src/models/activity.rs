use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single workout, either logged by hand or suggested by the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Length in minutes.
    pub duration: u32,
    pub calories: u32,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub completed: bool,
    pub source: ActivitySource,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Cardio,
    Strength,
    Flexibility,
    Sports,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Flexibility => "flexibility",
            Self::Sports => "sports",
            Self::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cardio" => Some(Self::Cardio),
            "strength" => Some(Self::Strength),
            "flexibility" => Some(Self::Flexibility),
            "sports" => Some(Self::Sports),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Where an activity came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySource {
    Alexa,
    Manual,
}

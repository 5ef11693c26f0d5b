use chrono::{DateTime, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[display("happy")]
    Happy,
    #[display("content")]
    Content,
    #[display("neutral")]
    Neutral,
    #[display("anxious")]
    Anxious,
    #[display("sad")]
    Sad,
    #[display("angry")]
    Angry,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
#[display("unknown mood: {_0}")]
pub struct UnknownMood(#[error(not(source))] pub String);

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Content,
        Mood::Neutral,
        Mood::Anxious,
        Mood::Sad,
        Mood::Angry,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Content => "content",
            Mood::Neutral => "neutral",
            Mood::Anxious => "anxious",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
        }
    }

    pub const fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Content => "😌",
            Mood::Neutral => "😐",
            Mood::Anxious => "😰",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
        }
    }

    /// Accent colour used behind the mood emoji
    pub const fn color(self) -> &'static str {
        match self {
            Mood::Happy => "#4CAF50",
            Mood::Content => "#2196F3",
            Mood::Neutral => "#9E9E9E",
            Mood::Anxious => "#FFB300",
            Mood::Sad => "#FF9800",
            Mood::Angry => "#F44336",
        }
    }
}

impl FromStr for Mood {
    type Err = UnknownMood;

    /// Exact match on the stored value, moods are never typed by hand
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == s)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// Row of the `mood_logs` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodLog {
    pub id: Uuid,
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub mood: Mood,
    #[serde(default)]
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMoodLog {
    pub pet_id: Uuid,
    pub user_id: Uuid,
    pub mood: Mood,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

//! BMO's mood, derived from backend hints

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of moods the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Happy,
    Curious,
    Caring,
    Excited,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Curious, Mood::Caring, Mood::Excited];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Curious => "curious",
            Mood::Caring => "caring",
            Mood::Excited => "excited",
        }
    }

    /// Face image for this mood
    pub fn face_asset(self) -> &'static str {
        match self {
            Mood::Happy => "BMOHappy.png",
            Mood::Curious => "BmoCurious.png",
            Mood::Caring => "BmoCaring.png",
            Mood::Excited => "BMOExcited.png",
        }
    }

    pub fn caption(self) -> String {
        format!("Feeling {}", self.label())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|mood| mood.label() == s)
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// Current mood; only ever holds a recognized value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoodState {
    current: Mood,
}

impl MoodState {
    pub fn current(self) -> Mood {
        self.current
    }

    /// Store `label` if it names a known mood. Returns whether it did.
    pub fn set(&mut self, label: &str) -> bool {
        match label.parse::<Mood>() {
            Ok(mood) => {
                self.current = mood;
                true
            }
            Err(UnknownMood(label)) => {
                tracing::debug!(label = %label, current = %self.current, "Ignoring unknown mood");
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.current = Mood::Happy;
    }
}

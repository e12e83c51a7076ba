//! Data models for the flashcard system

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::algorithm::INITIAL_EASE_FACTOR;
use crate::identity::OwnerId;

/// A flashcard with question (front), answer (back) and its SM-2 schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub owner: OwnerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// SM-2 ease factor, never below 1.3
    pub ease_factor: f64,
    /// Current interval in days
    pub interval: u32,
    /// Consecutive successful reviews since creation or the last failure
    pub repetitions: u32,
    /// The card is due once this instant has passed
    pub next_review: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    /// Bumped by the store on every committed review
    #[serde(default)]
    pub version: u64,
}

impl Flashcard {
    /// Build a never-reviewed card. It is due immediately.
    pub fn new(owner: OwnerId, request: NewFlashcard, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            session_id: request.session_id,
            front: request.front,
            back: request.back,
            category: request.category,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review: now,
            last_review: None,
            created_at: now,
            version: 0,
        }
    }

    pub fn schedule(&self) -> ScheduleState {
        ScheduleState {
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
        }
    }

    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.next_review <= as_of
    }
}

/// The three SM-2 inputs carried from one review to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleState {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
        }
    }
}

/// SM-2 recall quality, guaranteed to be in `0..=5`
///
/// - 0: Complete blackout
/// - 1: Incorrect, but recognized once shown
/// - 2: Incorrect, but the answer seemed easy
/// - 3: Correct with serious difficulty
/// - 4: Correct after hesitation
/// - 5: Perfect response
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= Self::MAX)
            .map(Self)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Qualities of 3 and above count as a successful recall
    pub fn is_pass(self) -> bool {
        self.0 >= 3
    }
}

impl From<Rating> for Quality {
    fn from(rating: Rating) -> Self {
        Self(rating.quality())
    }
}

/// The four review buttons shown to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy];

    /// SM-2 quality submitted for this button
    pub fn quality(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }

    /// Map UI rating (1-4: Again, Hard, Good, Easy)
    pub fn from_ui_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Again),
            2 => Some(Self::Hard),
            3 => Some(Self::Good),
            4 => Some(Self::Easy),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "again" => Ok(Self::Again),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            other => Err(format!(
                "Unknown rating '{}', expected again, hard, good or easy",
                other
            )),
        }
    }
}

/// Content supplied by whoever creates a card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

impl NewFlashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            category: None,
            session_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A moment flagged during a session that the user wants to turn into a card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningMoment {
    pub id: Uuid,
    pub session_id: Uuid,
    /// Owner of the session the moment came from
    pub owner: OwnerId,
    /// Kind of moment (e.g. "vocabulary", "grammar"), used as a default category
    #[serde(rename = "type")]
    pub kind: String,
}

/// Cards extracted from one recorded session, ingested together
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpload {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub flashcards: Vec<NewFlashcard>,
}

/// Review statistics for one owner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub due_cards: usize,
    /// Never reviewed
    pub new_cards: usize,
    /// Reviewed, interval under three weeks
    pub learning_cards: usize,
    /// Interval of three weeks or more
    pub mature_cards: usize,
}

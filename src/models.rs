use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Calendar dates persisted as plain `YYYY-MM-DD` strings with `""` as the
/// unset sentinel, the shape earlier releases wrote, so old exports import
/// unchanged.
pub mod date_string {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

/// The sole persisted aggregate. One record per user/device.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    pub current_day: u32,
    pub completed_days: Vec<u32>,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(with = "date_string")]
    pub last_completed_date: Option<NaiveDate>,
    pub xp_points: u32,
    pub level: u32,
    pub completion_data: BTreeMap<u32, DayCompletion>,
    pub achievements: Vec<String>,
    pub bookmarks: Vec<u32>,
    pub notes: BTreeMap<u32, String>,
    pub streak_freezes: u32,
    #[serde(with = "date_string")]
    pub last_streak_freeze_used: Option<NaiveDate>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            current_day: 1,
            completed_days: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
            xp_points: 0,
            level: 1,
            completion_data: BTreeMap::new(),
            achievements: Vec::new(),
            bookmarks: Vec::new(),
            notes: BTreeMap::new(),
            streak_freezes: 1, // new-user grant
            last_streak_freeze_used: None,
        }
    }
}

/// Per-lesson history: latest completion timestamp, accumulated seconds,
/// best quiz score, and how many times the lesson was finished.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayCompletion {
    pub completed_at: DateTime<Local>,
    pub time_spent: u32,
    pub quiz_score: u32,
    pub attempts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AchievementCategory {
    Streak,
    Completion,
    Quiz,
    Speed,
    Category,
    Special,
}

/// Unlock predicate for an achievement. One variant per requirement kind,
/// each carrying exactly the data its check needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Requirement {
    /// Current streak of at least this many days.
    Streak { days: u32 },
    /// At least this many distinct lessons completed.
    Completion { count: u32 },
    /// At least this many lessons finished with a 100% quiz score.
    QuizScore { perfect_count: u32 },
    /// Some lesson finished in at most this many minutes.
    Speed { minutes: u32 },
    /// Some lesson finished between these hours of the day, inclusive.
    Time { start_hour: u32, end_hour: u32 },
    /// Every lesson of a category completed. Needs the lesson catalog,
    /// which the evaluator does not receive, so this never unlocks.
    CategoryComplete { category: LessonCategory },
}

/// Static achievement metadata. The catalog is plain data owned by the
/// surrounding application; only unlocked ids end up in [`UserProgress`].
#[derive(Clone, Debug)]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub rarity: Rarity,
    pub category: AchievementCategory,
    pub requirement: Requirement,
    pub xp_reward: u32,
}

/// Progress towards a single achievement, re-derived on demand.
#[derive(Clone, Debug, PartialEq)]
pub struct AchievementProgress {
    pub current: u32,
    pub required: u32,
    pub percentage: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonCategory {
    Fundamentals,
    Llms,
    Applications,
    Advanced,
    Ethics,
    Practical,
}

impl fmt::Display for LessonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LessonCategory::Fundamentals => "fundamentals",
            LessonCategory::Llms => "llms",
            LessonCategory::Applications => "applications",
            LessonCategory::Advanced => "advanced",
            LessonCategory::Ethics => "ethics",
            LessonCategory::Practical => "practical",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        write!(f, "{label}")
    }
}

/// One entry of the 30-day curriculum. Read-only input to the core.
#[derive(Clone, Debug)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    pub category: LessonCategory,
    pub difficulty: Difficulty,
    pub estimated_time: u32,
}

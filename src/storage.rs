use crate::models::{DayCompletion, UserProgress};
use chrono::{DateTime, Local, NaiveDate};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{error, warn};

/// Stamped alongside every saved record for future migrations.
pub const SCHEMA_VERSION: &str = "1.0.0";

const PROGRESS_FILE: &str = "progress.json";
const VERSION_FILE: &str = "version";

/// Where progress lives. The store owns exactly one of these; swapping in
/// [`MemoryStorage`] keeps tests off the filesystem.
///
/// Nothing here returns `Err`: unavailable storage degrades to the default
/// record on read and to `false` on write, and a damaged record is repaired
/// field by field rather than rejected.
pub trait ProgressStorage {
    fn is_available(&self) -> bool;

    /// The persisted record, or the default one if storage is unavailable,
    /// empty, or corrupt.
    fn load(&self) -> UserProgress;

    /// Sanitize, serialize, and write the record plus the schema-version
    /// marker. Failures are logged and reported as `false`.
    fn save(&self, progress: &UserProgress) -> bool;

    /// Pretty JSON of the persisted record, suitable for saving to a file.
    fn export(&self) -> String {
        let progress = self.load();
        serde_json::to_string_pretty(&progress).unwrap_or_default()
    }

    /// Parse, sanitize, and save. Malformed text yields `false` and leaves
    /// the persisted record untouched.
    fn import(&self, text: &str) -> bool {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => self.save(&sanitize_record(&value)),
            Err(e) => {
                warn!("import rejected: {e}");
                false
            }
        }
    }
}

/// Clamp a well-typed record into its valid ranges. The type system already
/// rules out negative counters; what remains is the day window and the
/// level floor.
pub fn sanitize(progress: &UserProgress) -> UserProgress {
    let mut record = progress.clone();
    record.current_day = record.current_day.clamp(1, 30);
    record.level = record.level.max(1);
    record
}

/// Rebuild a record from raw JSON, field by field. Each field falls back to
/// its default when missing or wrong-shaped, so one damaged field never
/// costs the rest of the user's progress.
pub fn sanitize_record(value: &Value) -> UserProgress {
    let defaults = UserProgress::default();

    UserProgress {
        current_day: int_field(value, "currentDay")
            .map(|n| n.clamp(1, 30) as u32)
            .unwrap_or(defaults.current_day),
        completed_days: day_list(value, "completedDays"),
        current_streak: non_negative(value, "currentStreak", 0),
        longest_streak: non_negative(value, "longestStreak", 0),
        last_completed_date: date_field(value, "lastCompletedDate"),
        xp_points: non_negative(value, "xpPoints", 0),
        level: int_field(value, "level")
            .map(|n| n.max(1) as u32)
            .unwrap_or(defaults.level),
        completion_data: completion_map(value),
        achievements: string_list(value, "achievements"),
        bookmarks: day_list(value, "bookmarks"),
        notes: note_map(value),
        streak_freezes: non_negative(value, "streakFreezes", defaults.streak_freezes),
        last_streak_freeze_used: date_field(value, "lastStreakFreezeUsed"),
    }
}

fn int_field(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

fn non_negative(value: &Value, key: &str, default: u32) -> u32 {
    int_field(value, key)
        .map(|n| n.max(0) as u32)
        .unwrap_or(default)
}

fn date_field(value: &Value, key: &str) -> Option<NaiveDate> {
    value
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

fn day_list(value: &Value, key: &str) -> Vec<u32> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_i64)
                .filter(|n| *n >= 0)
                .map(|n| n as u32)
                .collect()
        })
        .unwrap_or_default()
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn completion_map(value: &Value) -> BTreeMap<u32, DayCompletion> {
    let mut map = BTreeMap::new();
    let Some(object) = value.get("completionData").and_then(Value::as_object) else {
        return map;
    };

    for (key, entry) in object {
        let Ok(day) = key.parse::<u32>() else { continue };
        let Some(completion) = completion_entry(entry) else {
            continue;
        };
        map.insert(day, completion);
    }
    map
}

fn completion_entry(entry: &Value) -> Option<DayCompletion> {
    let completed_at = entry
        .get("completedAt")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;

    Some(DayCompletion {
        completed_at,
        time_spent: non_negative(entry, "timeSpent", 0),
        quiz_score: non_negative(entry, "quizScore", 0),
        attempts: non_negative(entry, "attempts", 1),
    })
}

/// Accepts RFC 3339 timestamps and the bare `YYYY-MM-DD` form older
/// records used, read as local midnight.
fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Local));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(Local).single())
}

fn note_map(value: &Value) -> BTreeMap<u32, String> {
    let mut map = BTreeMap::new();
    let Some(object) = value.get("notes").and_then(Value::as_object) else {
        return map;
    };

    for (key, entry) in object {
        let Ok(day) = key.parse::<u32>() else { continue };
        let Some(text) = entry.as_str() else { continue };
        map.insert(day, text.to_string());
    }
    map
}

/// Progress record on disk: `progress.json` plus a `version` marker in one
/// directory, created on demand.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn progress_path(&self) -> PathBuf {
        self.dir.join(PROGRESS_FILE)
    }

    fn version_path(&self) -> PathBuf {
        self.dir.join(VERSION_FILE)
    }
}

impl ProgressStorage for FileStorage {
    fn is_available(&self) -> bool {
        fs::create_dir_all(&self.dir).is_ok()
    }

    fn load(&self) -> UserProgress {
        let path = self.progress_path();
        if !path.exists() {
            return UserProgress::default();
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("could not read {}: {e}", path.display());
                return UserProgress::default();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(value) => sanitize_record(&value),
            Err(e) => {
                warn!("corrupt progress record, starting from defaults: {e}");
                UserProgress::default()
            }
        }
    }

    fn save(&self, progress: &UserProgress) -> bool {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            error!("storage unavailable: {e}");
            return false;
        }

        let record = sanitize(progress);
        let content = match serde_json::to_string_pretty(&record) {
            Ok(content) => content,
            Err(e) => {
                error!("could not serialize progress: {e}");
                return false;
            }
        };

        if let Err(e) = fs::write(self.progress_path(), content) {
            error!("could not write progress: {e}");
            return false;
        }
        if let Err(e) = fs::write(self.version_path(), SCHEMA_VERSION) {
            error!("could not write version marker: {e}");
            return false;
        }
        true
    }
}

/// In-memory adapter for tests and embedding. Clones share one record.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    record: Rc<RefCell<Option<String>>>,
    unavailable: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// An adapter that refuses every read and write, for exercising the
    /// degraded paths.
    pub fn unavailable() -> Self {
        Self {
            record: Rc::default(),
            unavailable: true,
        }
    }
}

impl ProgressStorage for MemoryStorage {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn load(&self) -> UserProgress {
        if self.unavailable {
            return UserProgress::default();
        }

        match &*self.record.borrow() {
            Some(content) => match serde_json::from_str::<Value>(content) {
                Ok(value) => sanitize_record(&value),
                Err(_) => UserProgress::default(),
            },
            None => UserProgress::default(),
        }
    }

    fn save(&self, progress: &UserProgress) -> bool {
        if self.unavailable {
            return false;
        }

        let record = sanitize(progress);
        match serde_json::to_string_pretty(&record) {
            Ok(content) => {
                *self.record.borrow_mut() = Some(content);
                true
            }
            Err(_) => false,
        }
    }
}

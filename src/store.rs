use crate::achievements;
use crate::models::{Achievement, DayCompletion, UserProgress};
use crate::storage::{self, ProgressStorage};
use crate::streak;
use crate::xp::{self, XpAward};
use chrono::{DateTime, Local};
use tracing::{debug, warn};

/// Owner of the progress record and sole writer of the persisted copy.
///
/// Every public operation is one synchronous read-modify-persist
/// transaction; after it returns, the in-memory record equals the sanitized
/// record on disk.
pub struct ProgressStore {
    storage: Box<dyn ProgressStorage>,
    progress: UserProgress,
    loaded: bool,
}

impl ProgressStore {
    pub fn new(storage: Box<dyn ProgressStorage>) -> Self {
        let progress = storage.load();
        Self {
            storage,
            progress,
            loaded: false,
        }
    }

    /// Re-read the persisted record, overwriting in-memory state. No merge.
    pub fn load(&mut self) {
        self.progress = self.storage.load();
        self.loaded = true;
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Record a lesson completion: bookkeeping, streak update, XP award,
    /// persist. Achievement checking is a separate call.
    pub fn complete_lesson(&mut self, day: u32, time_spent: u32, quiz_score: u32) -> XpAward {
        self.complete_lesson_at(day, time_spent, quiz_score, Local::now())
    }

    fn complete_lesson_at(
        &mut self,
        day: u32,
        time_spent: u32,
        quiz_score: u32,
        now: DateTime<Local>,
    ) -> XpAward {
        let today = now.date_naive();
        let already_completed = self.progress.completed_days.contains(&day);

        let entry = self
            .progress
            .completion_data
            .entry(day)
            .or_insert_with(|| DayCompletion {
                completed_at: now,
                time_spent: 0,
                quiz_score: 0,
                attempts: 0,
            });
        entry.completed_at = now;
        entry.time_spent = if already_completed {
            entry.time_spent + time_spent
        } else {
            time_spent
        };
        entry.quiz_score = entry.quiz_score.max(quiz_score);
        entry.attempts += 1;

        if !already_completed {
            self.progress.completed_days.push(day);
        }
        self.progress.current_day = self.progress.current_day.max(day + 1);

        // The streak update stamps today before the XP award runs, so the
        // first-completion-of-the-day bonus never fires on this path.
        streak::update_streak(&mut self.progress, today);
        let award = xp::award_lesson_xp(&mut self.progress, xp::LESSON_BASE_XP, quiz_score, today);

        debug!(day, earned_xp = award.earned_xp, "lesson completed");
        self.persist();
        award
    }

    /// Fold newly unlocked achievements into the record: ids appended, XP
    /// rewards added. The level is left to the next lesson award to
    /// recompute.
    pub fn check_achievements(&mut self, catalog: &[Achievement]) -> Vec<Achievement> {
        let newly_unlocked: Vec<Achievement> =
            achievements::check_new_achievements(catalog, &self.progress)
                .into_iter()
                .cloned()
                .collect();

        if !newly_unlocked.is_empty() {
            for achievement in &newly_unlocked {
                self.progress.achievements.push(achievement.id.clone());
                self.progress.xp_points += achievement.xp_reward;
            }
            debug!(count = newly_unlocked.len(), "achievements unlocked");
            self.persist();
        }

        newly_unlocked
    }

    pub fn add_bookmark(&mut self, day: u32) {
        if self.progress.bookmarks.contains(&day) {
            return;
        }
        self.progress.bookmarks.push(day);
        self.persist();
    }

    pub fn remove_bookmark(&mut self, day: u32) {
        self.progress.bookmarks.retain(|bookmark| *bookmark != day);
        self.persist();
    }

    pub fn save_note(&mut self, day: u32, note: String) {
        self.progress.notes.insert(day, note);
        self.persist();
    }

    /// Consume one streak freeze; persists only on success.
    pub fn use_streak_freeze(&mut self) -> bool {
        if streak::use_streak_freeze(&mut self.progress, streak::today()) {
            self.persist();
            true
        } else {
            false
        }
    }

    /// Replace everything with the default record.
    pub fn reset(&mut self) {
        self.progress = UserProgress::default();
        self.persist();
    }

    /// Accept an externally supplied record, sanitize, persist, replace.
    pub fn import_progress(&mut self, data: UserProgress) {
        self.progress = data;
        self.persist();
    }

    /// Pretty JSON of the persisted record.
    pub fn export(&self) -> String {
        self.storage.export()
    }

    /// Parse and persist an exported record; on success the in-memory
    /// state is refreshed from storage.
    pub fn import_text(&mut self, text: &str) -> bool {
        if self.storage.import(text) {
            self.load();
            true
        } else {
            false
        }
    }

    fn persist(&mut self) {
        let record = storage::sanitize(&self.progress);
        if !self.storage.save(&record) {
            warn!("progress not persisted; keeping in-memory state only");
        }
        self.progress = record;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn store() -> ProgressStore {
        let mut store = ProgressStore::new(Box::new(MemoryStorage::new()));
        store.load();
        store
    }

    fn at(y: i32, m: u32, d: u32, hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_first_completion_scenario() {
        let mut store = store();

        let award = store.complete_lesson_at(1, 120, 100, at(2026, 8, 5, 12));

        let progress = store.progress();
        assert_eq!(progress.completed_days, vec![1]);
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.current_day, 2);
        assert_eq!(progress.level, 1);
        assert!(!award.leveled_up);
        // 100 base + 50 perfect; the daily bonus is dead on this path.
        assert_eq!(award.earned_xp, 150);
        assert_eq!(progress.xp_points, 150);
    }

    #[test]
    fn test_daily_bonus_never_fires_in_lesson_flow() {
        let mut store = store();

        // Even the very first completion of a fresh day earns no +25: the
        // streak update has already stamped today by the time the XP award
        // checks for it.
        let award = store.complete_lesson_at(1, 300, 50, at(2026, 8, 5, 9));
        assert_eq!(award.earned_xp, 100);

        let award = store.complete_lesson_at(2, 300, 50, at(2026, 8, 6, 9));
        assert_eq!(award.earned_xp, 100);
    }

    #[test]
    fn test_level_up_past_bucket_boundary() {
        let mut store = store();
        store.import_progress(UserProgress {
            xp_points: 480,
            ..UserProgress::default()
        });

        let award = store.complete_lesson_at(1, 120, 100, at(2026, 8, 5, 12));
        assert!(award.leveled_up);
        assert_eq!(store.progress().level, 2);
        assert_eq!(store.progress().xp_points, 630);
    }

    #[test]
    fn test_repeat_completion_accumulates() {
        let mut store = store();

        store.complete_lesson_at(3, 200, 60, at(2026, 8, 5, 10));
        store.complete_lesson_at(3, 100, 90, at(2026, 8, 5, 18));

        let progress = store.progress();
        assert_eq!(progress.completed_days, vec![3]);

        let entry = progress.completion_data.get(&3).unwrap();
        assert_eq!(entry.time_spent, 300);
        assert_eq!(entry.quiz_score, 90);
        assert_eq!(entry.attempts, 2);
    }

    #[test]
    fn test_repeat_keeps_best_quiz_score() {
        let mut store = store();

        store.complete_lesson_at(3, 200, 90, at(2026, 8, 5, 10));
        store.complete_lesson_at(3, 100, 40, at(2026, 8, 5, 18));

        let entry = store.progress().completion_data.get(&3).unwrap();
        assert_eq!(entry.quiz_score, 90);
    }

    #[test]
    fn test_streak_over_consecutive_days() {
        let mut store = store();

        store.complete_lesson_at(1, 120, 80, at(2026, 8, 5, 12));
        store.complete_lesson_at(2, 120, 80, at(2026, 8, 6, 12));
        store.complete_lesson_at(3, 120, 80, at(2026, 8, 7, 12));
        assert_eq!(store.progress().current_streak, 3);

        // Two quiet days reset the streak.
        store.complete_lesson_at(4, 120, 80, at(2026, 8, 10, 12));
        assert_eq!(store.progress().current_streak, 1);
        assert_eq!(store.progress().longest_streak, 3);
    }

    #[test]
    fn test_current_day_is_clamped_at_thirty() {
        let mut store = store();
        store.complete_lesson_at(30, 120, 80, at(2026, 8, 5, 12));

        assert_eq!(store.progress().current_day, 30);
    }

    #[test]
    fn test_current_day_never_decreases() {
        let mut store = store();
        store.complete_lesson_at(10, 120, 80, at(2026, 8, 5, 10));
        assert_eq!(store.progress().current_day, 11);

        store.complete_lesson_at(2, 120, 80, at(2026, 8, 5, 11));
        assert_eq!(store.progress().current_day, 11);
    }

    #[test]
    fn test_check_achievements_merges_and_settles() {
        let mut store = store();
        let catalog = catalog::achievement_catalog();

        store.complete_lesson_at(1, 120, 100, at(2026, 8, 5, 12));
        let xp_before = store.progress().xp_points;

        let unlocked = store.check_achievements(&catalog);
        assert!(unlocked.iter().any(|a| a.id == "first-steps"));

        let reward_total: u32 = unlocked.iter().map(|a| a.xp_reward).sum();
        assert_eq!(store.progress().xp_points, xp_before + reward_total);

        // Nothing new on the immediate re-check.
        assert!(store.check_achievements(&catalog).is_empty());
    }

    #[test]
    fn test_achievement_merge_leaves_level_stale() {
        let mut store = store();
        let catalog = vec![crate::models::Achievement {
            id: "jackpot".to_string(),
            title: "Jackpot".to_string(),
            description: String::new(),
            icon: "🎰".to_string(),
            rarity: crate::models::Rarity::Legendary,
            category: crate::models::AchievementCategory::Special,
            requirement: crate::models::Requirement::Completion { count: 1 },
            xp_reward: 1000,
        }];

        store.complete_lesson_at(1, 120, 0, at(2026, 8, 5, 12));
        store.check_achievements(&catalog);

        // 100 + 1000 XP is level 3 territory, but the merge path does not
        // recompute the level; the next lesson award catches it up.
        assert_eq!(store.progress().xp_points, 1100);
        assert_eq!(store.progress().level, 1);

        store.complete_lesson_at(2, 120, 0, at(2026, 8, 6, 12));
        assert_eq!(store.progress().level, 3);
    }

    #[test]
    fn test_bookmarks_are_idempotent() {
        let mut store = store();

        store.add_bookmark(4);
        store.add_bookmark(4);
        assert_eq!(store.progress().bookmarks, vec![4]);

        store.remove_bookmark(4);
        store.remove_bookmark(4);
        assert!(store.progress().bookmarks.is_empty());
    }

    #[test]
    fn test_save_note_upserts() {
        let mut store = store();

        store.save_note(7, "attention scales quadratically".to_string());
        store.save_note(7, "attention, revisited".to_string());

        assert_eq!(store.progress().notes.get(&7).unwrap(), "attention, revisited");
    }

    #[test]
    fn test_use_streak_freeze_through_store() {
        let mut store = store();
        assert!(store.use_streak_freeze());
        assert_eq!(store.progress().streak_freezes, 0);

        assert!(!store.use_streak_freeze());
        assert_eq!(store.progress().streak_freezes, 0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = store();
        store.complete_lesson_at(1, 120, 100, at(2026, 8, 5, 12));
        store.add_bookmark(1);

        store.reset();
        assert_eq!(*store.progress(), UserProgress::default());
    }

    #[test]
    fn test_import_progress_sanitizes() {
        let mut store = store();
        store.import_progress(UserProgress {
            current_day: 99,
            level: 0,
            ..UserProgress::default()
        });

        assert_eq!(store.progress().current_day, 30);
        assert_eq!(store.progress().level, 1);
    }

    #[test]
    fn test_import_text_round_trip() {
        let mut store = store();
        store.complete_lesson_at(1, 120, 100, at(2026, 8, 5, 12));
        let exported = store.export();

        let mut other = ProgressStore::new(Box::new(MemoryStorage::new()));
        assert!(other.import_text(&exported));
        assert_eq!(other.progress(), store.progress());

        assert!(!other.import_text("not json at all"));
    }

    #[test]
    fn test_transaction_survives_reload() {
        let shared = MemoryStorage::new();
        let mut store = ProgressStore::new(Box::new(shared.clone()));
        store.complete_lesson_at(1, 120, 100, at(2026, 8, 5, 12));

        let mut reopened = ProgressStore::new(Box::new(shared));
        reopened.load();
        assert_eq!(reopened.progress(), store.progress());
        assert!(reopened.is_loaded());
    }

    #[test]
    fn test_unavailable_storage_keeps_state_in_memory() {
        let mut store = ProgressStore::new(Box::new(MemoryStorage::unavailable()));
        store.load();

        let award = store.complete_lesson_at(1, 120, 100, at(2026, 8, 5, 12));
        assert_eq!(award.earned_xp, 150);
        assert_eq!(store.progress().completed_days, vec![1]);
    }
}

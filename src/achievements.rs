use crate::models::{Achievement, AchievementProgress, Requirement, UserProgress};
use chrono::Timelike;

/// Whether the given progress snapshot satisfies an achievement's
/// requirement. Read-only; unlocking is the store's job.
pub fn is_unlocked(achievement: &Achievement, progress: &UserProgress) -> bool {
    match &achievement.requirement {
        Requirement::Streak { days } => progress.current_streak >= *days,
        Requirement::Completion { count } => progress.completed_days.len() as u32 >= *count,
        Requirement::QuizScore { perfect_count } => perfect_scores(progress) >= *perfect_count,
        Requirement::Speed { minutes } => progress
            .completion_data
            .values()
            .any(|data| data.time_spent <= minutes * 60),
        Requirement::Time {
            start_hour,
            end_hour,
        } => progress.completion_data.values().any(|data| {
            let hour = data.completed_at.hour();
            hour >= *start_hour && hour <= *end_hour
        }),
        // Needs category membership from the lesson catalog, which the
        // evaluator does not receive.
        Requirement::CategoryComplete { .. } => false,
    }
}

/// How close the snapshot is to an achievement, re-derived on every call.
pub fn achievement_progress(
    achievement: &Achievement,
    progress: &UserProgress,
) -> AchievementProgress {
    let (current, required) = match &achievement.requirement {
        Requirement::Streak { days } => (progress.current_streak, *days),
        Requirement::Completion { count } => (progress.completed_days.len() as u32, *count),
        Requirement::QuizScore { perfect_count } => (perfect_scores(progress), *perfect_count),
        Requirement::Speed { minutes } => {
            let under_threshold = progress
                .completion_data
                .values()
                .filter(|data| data.time_spent <= minutes * 60)
                .count() as u32;
            (under_threshold, *minutes)
        }
        Requirement::Time {
            start_hour,
            end_hour,
        } => {
            let in_range = progress
                .completion_data
                .values()
                .filter(|data| {
                    let hour = data.completed_at.hour();
                    hour >= *start_hour && hour <= *end_hour
                })
                .count() as u32;
            // One completion in the window unlocks it.
            (in_range, 1)
        }
        Requirement::CategoryComplete { .. } => (0, 1),
    };

    let percentage = if required == 0 {
        100.0
    } else {
        (f64::from(current) / f64::from(required) * 100.0).min(100.0)
    };

    AchievementProgress {
        current,
        required,
        percentage,
    }
}

/// Catalog entries that are satisfied now and not yet owned, in catalog
/// order.
pub fn check_new_achievements<'a>(
    catalog: &'a [Achievement],
    progress: &UserProgress,
) -> Vec<&'a Achievement> {
    catalog
        .iter()
        .filter(|achievement| {
            !progress.achievements.iter().any(|id| *id == achievement.id)
                && is_unlocked(achievement, progress)
        })
        .collect()
}

fn perfect_scores(progress: &UserProgress) -> u32 {
    progress
        .completion_data
        .values()
        .filter(|data| data.quiz_score == 100)
        .count() as u32
}

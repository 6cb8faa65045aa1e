use crate::achievements;
use crate::models::{Achievement, Lesson, UserProgress};
use crate::streak;
use crate::xp;
use chrono::NaiveDate;

const DAYS_IN_COURSE: u32 = 30;
const GRID_COLUMNS: u32 = 7;
const BAR_WIDTH: usize = 20;

fn bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0 * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One-screen summary: level, streak, the 30-day grid, and what is next.
pub fn render_status(progress: &UserProgress, lessons: &[Lesson], today: NaiveDate) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "Level {} — {} XP ({} to next level)",
        progress.level,
        progress.xp_points,
        xp::xp_to_next_level(progress.xp_points),
    ));
    lines.push(format!(
        "{} {:.0}%",
        bar(xp::xp_progress_percentage(progress.xp_points)),
        xp::xp_progress_percentage(progress.xp_points),
    ));
    lines.push(format!(
        "Streak: {} day(s), longest {}. Freezes left: {}",
        progress.current_streak, progress.longest_streak, progress.streak_freezes,
    ));
    lines.push(format!(
        "Completed: {}/{} lessons",
        progress.completed_days.len(),
        DAYS_IN_COURSE,
    ));

    if streak::should_break_streak(progress.last_completed_date, today) {
        lines.push("More than a day since your last lesson; the streak resets on the next completion.".to_string());
    }

    lines.push(String::new());
    for row_start in (1..=DAYS_IN_COURSE).step_by(GRID_COLUMNS as usize) {
        let mut cells = Vec::new();
        for day in row_start..(row_start + GRID_COLUMNS).min(DAYS_IN_COURSE + 1) {
            let symbol = if progress.completed_days.contains(&day) {
                '■'
            } else if day == progress.current_day {
                '▶'
            } else {
                '□'
            };
            cells.push(format!("{day:>2} {symbol}"));
        }
        lines.push(cells.join("  "));
    }
    lines.push("Legend: ■ done  ▶ next  □ open".to_string());

    if let Some(next) = lessons.iter().find(|l| l.id == progress.current_day) {
        lines.push(String::new());
        lines.push(format!(
            "Next up: Day {} — {} ({}, {}, ~{} min)",
            next.id, next.title, next.category, next.difficulty, next.estimated_time,
        ));
    }

    lines.join("\n")
}

/// Catalog listing with unlock state and progress toward each entry.
pub fn render_achievements(catalog: &[Achievement], progress: &UserProgress) -> String {
    let unlocked_count = catalog
        .iter()
        .filter(|a| progress.achievements.iter().any(|id| *id == a.id))
        .count();

    let mut lines = vec![format!(
        "{unlocked_count} of {} achievements unlocked",
        catalog.len()
    )];
    lines.push(String::new());

    for achievement in catalog {
        let owned = progress.achievements.iter().any(|id| *id == achievement.id);
        let status = if owned {
            "unlocked".to_string()
        } else {
            let toward = achievements::achievement_progress(achievement, progress);
            format!(
                "{} {}/{} ({:.0}%)",
                bar(toward.percentage),
                toward.current,
                toward.required,
                toward.percentage,
            )
        };

        lines.push(format!(
            "{} {} [{}] +{} XP — {}",
            achievement.icon, achievement.title, achievement.rarity, achievement.xp_reward, status,
        ));
        lines.push(format!("   {}", achievement.description));
    }

    lines.join("\n")
}

/// The curriculum with completion, bookmark, and note markers.
pub fn render_lessons(lessons: &[Lesson], progress: &UserProgress) -> String {
    let mut lines = Vec::new();

    for lesson in lessons {
        let done = if progress.completed_days.contains(&lesson.id) {
            '■'
        } else {
            '□'
        };
        let bookmark = if progress.bookmarks.contains(&lesson.id) {
            " ★"
        } else {
            ""
        };
        let note = if progress.notes.contains_key(&lesson.id) {
            " ✎"
        } else {
            ""
        };

        lines.push(format!(
            "{done} Day {:>2}: {} ({}, {}, ~{} min){bookmark}{note}",
            lesson.id, lesson.title, lesson.category, lesson.difficulty, lesson.estimated_time,
        ));
    }

    lines.join("\n")
}

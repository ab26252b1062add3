//! Achievement catalog and the progress/unlock recompute pass.
//!
//! `recompute` is a pure transform: it never touches its inputs and yields a
//! list with the same length and order, changing only `progress` and
//! `unlocked_at`. Unlocking is a one-way latch.

use crate::models::{Achievement, AchievementKind, Habit};
use crate::streak::best_streak_at;
use crate::window::{is_perfect_today, perfect_day_streak};
use chrono::NaiveDate;

const CATALOG: &[(&str, &str, &str, &str, AchievementKind, u32)] = &[
    (
        "first_step",
        "First Step",
        "Complete a habit for the first time",
        "🌱",
        AchievementKind::Total,
        1,
    ),
    (
        "getting_started",
        "Getting Started",
        "Reach 10 total completions",
        "🚀",
        AchievementKind::Total,
        10,
    ),
    (
        "centurion",
        "Centurion",
        "Reach 100 total completions",
        "💯",
        AchievementKind::Total,
        100,
    ),
    (
        "week_warrior",
        "Week Warrior",
        "Keep any habit going for 7 days in a row",
        "🔥",
        AchievementKind::Streak,
        7,
    ),
    (
        "monthly_master",
        "Monthly Master",
        "Keep any habit going for 30 days in a row",
        "🏆",
        AchievementKind::Streak,
        30,
    ),
    (
        "variety_seeker",
        "Variety Seeker",
        "Track 5 different habits",
        "🎨",
        AchievementKind::Variety,
        5,
    ),
    (
        "perfect_day",
        "Perfect Day",
        "Complete every habit in a single day",
        "⭐",
        AchievementKind::PerfectDay,
        1,
    ),
    (
        "perfect_week",
        "Perfect Week",
        "Complete every habit for 7 days straight",
        "👑",
        AchievementKind::PerfectWeek,
        7,
    ),
];

/// The seed list written on first run.
pub fn default_catalog() -> Vec<Achievement> {
    CATALOG
        .iter()
        .map(|(id, title, description, icon, kind, target)| Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            kind: *kind,
            target: *target,
            progress: 0,
            unlocked_at: None,
        })
        .collect()
}

pub fn progress_for(kind: AchievementKind, habits: &[Habit], today: NaiveDate) -> u32 {
    match kind {
        AchievementKind::Total => habits
            .iter()
            .map(Habit::total_completions)
            .fold(0u32, u32::saturating_add),
        AchievementKind::Streak => best_streak_at(habits, today),
        AchievementKind::Variety => habits.len() as u32,
        AchievementKind::PerfectWeek => perfect_day_streak(habits, today),
        AchievementKind::PerfectDay => is_perfect_today(habits, today),
    }
}

pub fn recompute(
    achievements: &[Achievement],
    habits: &[Habit],
    today: NaiveDate,
    now_millis: i64,
) -> Vec<Achievement> {
    achievements
        .iter()
        .map(|achievement| {
            let progress = progress_for(achievement.kind, habits, today);
            let unlocked_at = match achievement.unlocked_at {
                Some(at) => Some(at),
                None if progress >= achievement.target => Some(now_millis),
                None => None,
            };
            Achievement {
                progress,
                unlocked_at,
                ..achievement.clone()
            }
        })
        .collect()
}

/// Achievements whose latch flipped between `before` and `after`.
pub fn newly_unlocked<'a>(before: &[Achievement], after: &'a [Achievement]) -> Vec<&'a Achievement> {
    after
        .iter()
        .filter(|next| {
            next.is_unlocked()
                && !before
                    .iter()
                    .any(|prev| prev.id == next.id && prev.is_unlocked())
        })
        .collect()
}

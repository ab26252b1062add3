use crate::models::{Habit, ProgressSummary};
use chrono::NaiveDate;

pub fn summary(habits: &[Habit], today: NaiveDate) -> ProgressSummary {
    let completed = habits
        .iter()
        .filter(|habit| habit.is_completed_on(today))
        .count() as u32;
    let total = habits.len() as u32;

    ProgressSummary {
        completed,
        total,
        percent: percent(completed, total),
    }
}

pub(crate) fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) / f64::from(whole) * 100.0).round() as u32
}

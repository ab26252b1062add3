use crate::models::Habit;
use chrono::NaiveDate;

pub const PERFECT_WEEK_DAYS: u32 = 7;

/// A day on which every tracked habit was completed. No habits, no perfect day.
pub fn is_perfect_day(habits: &[Habit], day: NaiveDate) -> bool {
    !habits.is_empty() && habits.iter().all(|habit| habit.is_completed_on(day))
}

/// Consecutive perfect days walking back from `reference`, capped at seven.
pub fn perfect_day_streak(habits: &[Habit], reference: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = reference;
    while count < PERFECT_WEEK_DAYS && is_perfect_day(habits, day) {
        count += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    count
}

pub fn is_perfect_today(habits: &[Habit], today: NaiveDate) -> u32 {
    u32::from(is_perfect_day(habits, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::tests::{habit_with, ymd};
    use chrono::Duration;

    fn last_n_days(today: NaiveDate, n: i64) -> Vec<NaiveDate> {
        (0..n).map(|i| today - Duration::days(i)).collect()
    }

    #[test]
    fn perfect_today_boundaries() {
        let today = ymd(2024, 5, 1);
        assert_eq!(is_perfect_today(&[], today), 0);
        assert_eq!(is_perfect_today(&[habit_with("a", &[today])], today), 1);
        assert_eq!(
            is_perfect_today(&[habit_with("a", &[today]), habit_with("b", &[])], today),
            0
        );
    }

    #[test]
    fn two_habits_done_all_week() {
        let today = ymd(2024, 5, 7);
        let days = last_n_days(today, 7);
        let habits = vec![habit_with("a", &days), habit_with("b", &days)];
        assert_eq!(perfect_day_streak(&habits, today), 7);
    }

    #[test]
    fn window_is_capped_at_seven_days() {
        let today = ymd(2024, 5, 30);
        let days = last_n_days(today, 20);
        let habits = vec![habit_with("a", &days)];
        assert_eq!(perfect_day_streak(&habits, today), 7);
    }

    #[test]
    fn one_missed_habit_breaks_the_run() {
        let today = ymd(2024, 5, 7);
        let days = last_n_days(today, 7);
        let mut partial = days.clone();
        partial.retain(|day| *day != today - Duration::days(3));
        let habits = vec![habit_with("a", &days), habit_with("b", &partial)];
        assert_eq!(perfect_day_streak(&habits, today), 3);
    }

    #[test]
    fn empty_habit_set_is_never_perfect() {
        assert_eq!(perfect_day_streak(&[], ymd(2024, 5, 7)), 0);
    }

    #[test]
    fn imperfect_reference_day_is_zero() {
        let today = ymd(2024, 5, 7);
        let days = last_n_days(today - Duration::days(1), 6);
        let habits = vec![habit_with("a", &days)];
        assert_eq!(perfect_day_streak(&habits, today), 0);
    }
}

use crate::calendar::today;
use crate::models::Habit;
use chrono::NaiveDate;

pub fn streak(habit: &Habit) -> u32 {
    streak_at(habit, today())
}

/// Consecutive completed days walking back from `today`, inclusive.
///
/// A single missing or `false` day ends the run, and an incomplete `today`
/// yields 0 even when yesterday closes a long run.
pub fn streak_at(habit: &Habit, today: NaiveDate) -> u32 {
    let mut count = 0u32;
    let mut day = today;
    while habit.is_completed_on(day) {
        count = count.saturating_add(1);
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    count
}

pub fn best_streak_at(habits: &[Habit], today: NaiveDate) -> u32 {
    habits
        .iter()
        .map(|habit| streak_at(habit, today))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::calendar::date_key;
    use crate::models::Frequency;
    use chrono::Duration;
    use std::collections::BTreeMap;

    pub(crate) fn habit_with(id: &str, days: &[NaiveDate]) -> Habit {
        let completions: BTreeMap<String, bool> =
            days.iter().map(|day| (date_key(*day), true)).collect();
        Habit {
            id: id.to_string(),
            name: format!("habit {id}"),
            icon: "🧘".to_string(),
            color: None,
            frequency: Frequency::Daily,
            completions,
            created_at: 0,
            group_id: None,
            reminder: None,
        }
    }

    pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn three_day_run_ending_today() {
        let habit = habit_with("m", &[ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
        assert_eq!(streak_at(&habit, ymd(2024, 1, 3)), 3);
    }

    #[test]
    fn incomplete_today_breaks_the_run() {
        let habit = habit_with("m", &[ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]);
        assert_eq!(streak_at(&habit, ymd(2024, 1, 4)), 0);
    }

    #[test]
    fn empty_completions_is_zero() {
        let habit = habit_with("m", &[]);
        assert_eq!(streak_at(&habit, ymd(2024, 1, 4)), 0);
    }

    #[test]
    fn gap_stops_count_even_with_older_completions() {
        let habit = habit_with(
            "m",
            &[ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 4), ymd(2024, 1, 5)],
        );
        let today = ymd(2024, 1, 5);
        let n = streak_at(&habit, today);
        assert_eq!(n, 2);
        for i in 0..n {
            assert!(habit.is_completed_on(today - Duration::days(i64::from(i))));
        }
        assert!(!habit.is_completed_on(today - Duration::days(i64::from(n))));
    }

    #[test]
    fn explicit_false_counts_as_missing() {
        let mut habit = habit_with("m", &[ymd(2024, 1, 1), ymd(2024, 1, 3)]);
        habit.completions.insert("2024-01-02".to_string(), false);
        assert_eq!(streak_at(&habit, ymd(2024, 1, 3)), 1);
    }

    #[test]
    fn completing_today_never_decreases_streak() {
        let today = ymd(2024, 3, 10);
        let mut habit = habit_with("m", &[ymd(2024, 3, 8), ymd(2024, 3, 9)]);
        let before = streak_at(&habit, today);
        assert_eq!(before, 0);

        habit.completions.insert(date_key(today), true);
        let after = streak_at(&habit, today);
        assert_eq!(after, 3);
        assert!(after >= before);
    }

    #[test]
    fn run_crosses_month_and_year_boundaries() {
        let habit = habit_with("m", &[ymd(2023, 12, 30), ymd(2023, 12, 31), ymd(2024, 1, 1)]);
        assert_eq!(streak_at(&habit, ymd(2024, 1, 1)), 3);
    }

    #[test]
    fn walking_past_the_earliest_date_terminates() {
        let habit = habit_with("m", &[NaiveDate::MIN]);
        assert_eq!(streak_at(&habit, NaiveDate::MIN), 1);
    }

    #[test]
    fn best_streak_takes_the_max() {
        let today = ymd(2024, 1, 3);
        let habits = vec![
            habit_with("a", &[ymd(2024, 1, 3)]),
            habit_with("b", &[ymd(2024, 1, 1), ymd(2024, 1, 2), ymd(2024, 1, 3)]),
        ];
        assert_eq!(best_streak_at(&habits, today), 3);
        assert_eq!(best_streak_at(&[], today), 0);
    }
}

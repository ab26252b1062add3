use crate::calendar::{date_key, today};
use crate::models::{AppData, DailyPoint, MoodEntry, MoodPoint, StatsResponse, WeeklyPoint};
use crate::progress::percent;
use crate::streak::best_streak_at;
use chrono::{Datelike, Duration, NaiveDate};

pub fn build_stats(data: &AppData) -> StatsResponse {
    build_stats_at(today(), data)
}

pub fn build_stats_at(today: NaiveDate, data: &AppData) -> StatsResponse {
    const WEEK_COUNT: usize = 8;

    let habits = &data.habits;
    let total = habits.len() as u32;

    let mut last_7_days = Vec::with_capacity(7);
    let mut mood_trend = Vec::new();
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset as i64);
        last_7_days.push(DailyPoint {
            date: date_key(date),
            completed: completed_on(data, date),
            total,
        });
        if let Some(entry) = mood_for(&data.moods, date) {
            mood_trend.push(MoodPoint {
                date: date_key(date),
                mood: entry.mood,
            });
        }
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut completed = 0u32;
        for day_offset in 0..7 {
            let date = start + Duration::days(day_offset);
            completed = completed.saturating_add(completed_on(data, date));
        }

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: date_key(start),
            end_date: date_key(end),
            completed,
        });
    }

    let total_completions = habits
        .iter()
        .map(|habit| habit.total_completions())
        .fold(0u32, u32::saturating_add);

    StatsResponse {
        last_7_days,
        weekly_totals,
        mood_trend,
        total_completions,
        average_completion: percent(total_completions, total.saturating_mul(7)),
        best_streak: best_streak_at(habits, today),
    }
}

/// Last entry logged for `date`; earlier entries for the same day are shadowed.
pub fn mood_for(moods: &[MoodEntry], date: NaiveDate) -> Option<&MoodEntry> {
    let key = date_key(date);
    moods.iter().rev().find(|entry| entry.date == key)
}

fn completed_on(data: &AppData, date: NaiveDate) -> u32 {
    data.habits
        .iter()
        .filter(|habit| habit.is_completed_on(date))
        .count() as u32
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

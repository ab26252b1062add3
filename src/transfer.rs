//! Export bundles, the habit CSV projection, and union-by-id import merging.

use crate::models::{AppData, ExportData, HabitGroup, ImportReport};
use crate::streak::streak_at;
use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};
use std::collections::HashSet;

pub const EXPORT_VERSION: &str = "1.0";

const CSV_HEADERS: [&str; 6] = [
    "Name",
    "Icon",
    "Frequency",
    "Group",
    "Total Completions",
    "Current Streak",
];

pub fn export_bundle(data: &AppData, now: DateTime<Local>) -> ExportData {
    ExportData {
        version: EXPORT_VERSION.to_string(),
        export_date: now.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
        habits: data.habits.clone(),
        groups: data.groups.clone(),
        moods: data.moods.clone(),
        achievements: data.achievements.clone(),
    }
}

pub fn habits_csv(data: &AppData, today: NaiveDate) -> String {
    let mut lines = Vec::with_capacity(data.habits.len() + 1);
    lines.push(CSV_HEADERS.join(","));

    for habit in &data.habits {
        let group = habit
            .group_id
            .as_deref()
            .and_then(|id| find_group(&data.groups, id))
            .map(|group| group.name.as_str())
            .unwrap_or("None");

        let row = [
            csv_field(&habit.name),
            csv_field(&habit.icon),
            habit.frequency.as_str().to_string(),
            csv_field(group),
            habit.total_completions().to_string(),
            streak_at(habit, today).to_string(),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Appends every incoming entity whose id is not already present.
///
/// Ids already in `data`, or repeated earlier in the same batch, are dropped
/// without any field-level merge, so importing the same bundle twice leaves the
/// store as importing it once.
pub fn merge_import(data: &mut AppData, incoming: ExportData) -> ImportReport {
    ImportReport {
        habits: merge_by_id(&mut data.habits, incoming.habits, |h| &h.id),
        groups: merge_by_id(&mut data.groups, incoming.groups, |g| &g.id),
        moods: merge_by_id(&mut data.moods, incoming.moods, |m| &m.id),
        achievements: merge_by_id(&mut data.achievements, incoming.achievements, |a| &a.id),
    }
}

fn merge_by_id<T>(existing: &mut Vec<T>, incoming: Vec<T>, id: fn(&T) -> &String) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(|item| id(item).clone()).collect();
    let before = existing.len();
    for item in incoming {
        if seen.insert(id(&item).clone()) {
            existing.push(item);
        }
    }
    existing.len() - before
}

fn find_group<'a>(groups: &'a [HabitGroup], id: &str) -> Option<&'a HabitGroup> {
    groups.iter().find(|group| group.id == id)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

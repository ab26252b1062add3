//! Daily habit reminders and the notification sink shared with achievement
//! unlocks.

use crate::models::{Achievement, Habit};
use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const REMINDER_TITLE: &str = "Habit Reminder";

/// Where user-facing alerts go. Delivery is fire-and-forget.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        info!(%title, %body, "notification");
    }
}

pub fn announce_unlocked(notifier: &dyn Notifier, unlocked: &[Achievement]) {
    for achievement in unlocked {
        info!(id = %achievement.id, "achievement unlocked");
        notifier.notify(
            &format!("Achievement unlocked: {} {}", achievement.icon, achievement.title),
            &achievement.description,
        );
    }
}

pub fn reminder_body(habit_name: &str) -> String {
    format!("Time to complete: {habit_name}")
}

pub fn parse_reminder_time(time: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()
}

/// Next wall-clock moment matching `time`: later today, or tomorrow if that
/// moment has already passed.
pub fn next_occurrence(now: DateTime<Local>, time: &str) -> Option<DateTime<Local>> {
    let at = parse_reminder_time(time)?;
    let today = now.date_naive();
    for day in [today, today.checked_add_days(Days::new(1))?, today.checked_add_days(Days::new(2))?] {
        // A local time skipped by a DST jump has no instant; try the next day.
        if let Some(candidate) = Local.from_local_datetime(&day.and_time(at)).earliest() {
            if candidate > now {
                return Some(candidate);
            }
        }
    }
    None
}

/// One background task per habit with an enabled reminder.
pub struct ReminderScheduler {
    enabled: bool,
    notifier: Arc<dyn Notifier>,
    tasks: HashMap<String, JoinHandle<()>>,
}

impl ReminderScheduler {
    pub fn new(enabled: bool, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            enabled,
            notifier,
            tasks: HashMap::new(),
        }
    }

    pub fn scheduled(&self) -> usize {
        self.tasks.len()
    }

    /// Cancels every running reminder and re-arms from `habits`.
    pub fn sync(&mut self, habits: &[Habit]) {
        self.cancel_all();
        if !self.enabled {
            return;
        }

        for habit in habits {
            let Some(reminder) = habit.reminder.as_ref().filter(|r| r.enabled) else {
                continue;
            };
            if parse_reminder_time(&reminder.time).is_none() {
                warn!(habit = %habit.id, time = %reminder.time, "skipping malformed reminder time");
                continue;
            }
            let handle = tokio::spawn(run_reminder(
                Arc::clone(&self.notifier),
                habit.name.clone(),
                reminder.time.clone(),
            ));
            debug!(habit = %habit.id, time = %reminder.time, "reminder armed");
            self.tasks.insert(habit.id.clone(), handle);
        }
        info!(count = self.tasks.len(), "reminders scheduled");
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

async fn run_reminder(notifier: Arc<dyn Notifier>, habit_name: String, time: String) {
    loop {
        let now = Local::now();
        let Some(next) = next_occurrence(now, &time) else {
            warn!(%habit_name, %time, "no future occurrence for reminder");
            return;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        notifier.notify(REMINDER_TITLE, &reminder_body(&habit_name));
    }
}

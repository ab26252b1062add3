//! The application-owned store: the single source of truth for habits, groups,
//! moods and achievements. Every mutation recomputes achievements from scratch
//! and reports which ones flipped to unlocked in that pass.

use crate::achievements::{default_catalog, newly_unlocked, recompute};
use crate::calendar::{date_key, now_millis, today};
use crate::errors::StoreError;
use crate::models::{
    Achievement, AchievementsResponse, AppData, ExportData, GroupView, Habit, HabitGroup,
    HabitUpdate, HabitView, ImportReport, MoodEntry, NewGroup, NewHabit, NewMood, Reminder,
};
use crate::reminders::parse_reminder_time;
use crate::stats::mood_for;
use crate::streak::streak_at;
use crate::transfer::{export_bundle, merge_import};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The local day and wall-clock timestamp a mutation is applied at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub today: NaiveDate,
    pub now_millis: i64,
}

impl Moment {
    pub fn now() -> Self {
        Self {
            today: today(),
            now_millis: now_millis(),
        }
    }
}

#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub unlocked: Vec<Achievement>,
}

impl<T> Outcome<T> {
    /// A change that cannot move any achievement.
    pub fn quiet(value: T) -> Self {
        Self {
            value,
            unlocked: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            unlocked: self.unlocked,
        }
    }
}

pub fn habit_view(habit: Habit, today: NaiveDate) -> HabitView {
    HabitView {
        streak: streak_at(&habit, today),
        done_today: habit.is_completed_on(today),
        habit,
    }
}

#[derive(Debug, Clone, Default)]
pub struct HabitStore {
    data: AppData,
}

impl HabitStore {
    /// Wraps persisted data, seeding the achievement catalog on first run.
    pub fn from_data(mut data: AppData) -> Self {
        if data.achievements.is_empty() {
            data.achievements = default_catalog();
        }
        Self { data }
    }

    pub fn snapshot(&self) -> &AppData {
        &self.data
    }

    pub fn habits(&self) -> &[Habit] {
        &self.data.habits
    }

    pub fn moods(&self) -> &[MoodEntry] {
        &self.data.moods
    }

    pub fn habit_views(&self, today: NaiveDate) -> Vec<HabitView> {
        self.data
            .habits
            .iter()
            .map(|habit| habit_view(habit.clone(), today))
            .collect()
    }

    pub fn group_views(&self) -> Vec<GroupView> {
        self.data
            .groups
            .iter()
            .map(|group| GroupView {
                habit_count: self
                    .data
                    .habits
                    .iter()
                    .filter(|habit| habit.group_id.as_deref() == Some(group.id.as_str()))
                    .count(),
                group: group.clone(),
            })
            .collect()
    }

    pub fn achievements(&self) -> AchievementsResponse {
        AchievementsResponse {
            unlocked: self
                .data
                .achievements
                .iter()
                .filter(|achievement| achievement.is_unlocked())
                .count(),
            total: self.data.achievements.len(),
            achievements: self.data.achievements.clone(),
        }
    }

    pub fn add_habit(&mut self, new: NewHabit, at: Moment) -> Result<Outcome<Habit>, StoreError> {
        let name = validated_name(&new.name)?;
        if let Some(group_id) = new.group_id.as_deref() {
            self.ensure_group(group_id)?;
        }
        validate_reminder(new.reminder.as_ref())?;

        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            name,
            icon: new.icon,
            color: new.color,
            frequency: new.frequency,
            completions: BTreeMap::new(),
            created_at: at.now_millis,
            group_id: new.group_id,
            reminder: new.reminder,
        };
        self.data.habits.push(habit.clone());
        Ok(self.settle(habit, at))
    }

    pub fn update_habit(
        &mut self,
        id: &str,
        update: HabitUpdate,
        at: Moment,
    ) -> Result<Outcome<Habit>, StoreError> {
        let name = update.name.as_deref().map(validated_name).transpose()?;
        if let Some(Some(group_id)) = update.group_id.as_ref() {
            self.ensure_group(group_id)?;
        }
        if let Some(reminder) = update.reminder.as_ref() {
            validate_reminder(reminder.as_ref())?;
        }

        let habit = self.habit_mut(id)?;
        if let Some(name) = name {
            habit.name = name;
        }
        if let Some(icon) = update.icon {
            habit.icon = icon;
        }
        if let Some(color) = update.color {
            habit.color = color;
        }
        if let Some(frequency) = update.frequency {
            habit.frequency = frequency;
        }
        if let Some(group_id) = update.group_id {
            habit.group_id = group_id;
        }
        if let Some(reminder) = update.reminder {
            habit.reminder = reminder;
        }
        let habit = habit.clone();
        Ok(self.settle(habit, at))
    }

    pub fn delete_habit(&mut self, id: &str, at: Moment) -> Result<Outcome<Habit>, StoreError> {
        let index = self
            .data
            .habits
            .iter()
            .position(|habit| habit.id == id)
            .ok_or_else(|| StoreError::HabitNotFound(id.to_string()))?;
        let removed = self.data.habits.remove(index);
        Ok(self.settle(removed, at))
    }

    /// Flips the completion flag for `date`. The key is kept as `false`
    /// rather than removed.
    pub fn toggle_habit(
        &mut self,
        id: &str,
        date: NaiveDate,
        at: Moment,
    ) -> Result<Outcome<Habit>, StoreError> {
        let habit = self.habit_mut(id)?;
        let key = date_key(date);
        let done = habit.completions.get(&key).copied().unwrap_or(false);
        habit.completions.insert(key, !done);
        let habit = habit.clone();
        Ok(self.settle(habit, at))
    }

    pub fn add_group(&mut self, new: NewGroup, at: Moment) -> Result<Outcome<HabitGroup>, StoreError> {
        let group = HabitGroup {
            id: Uuid::new_v4().to_string(),
            name: validated_name(&new.name)?,
            color: new.color,
            icon: new.icon,
            created_at: at.now_millis,
        };
        self.data.groups.push(group.clone());
        Ok(self.settle(group, at))
    }

    /// Removes the group and detaches its habits; the habits themselves stay.
    pub fn delete_group(&mut self, id: &str, at: Moment) -> Result<Outcome<HabitGroup>, StoreError> {
        let index = self
            .data
            .groups
            .iter()
            .position(|group| group.id == id)
            .ok_or_else(|| StoreError::GroupNotFound(id.to_string()))?;
        let removed = self.data.groups.remove(index);
        for habit in &mut self.data.habits {
            if habit.group_id.as_deref() == Some(id) {
                habit.group_id = None;
            }
        }
        Ok(self.settle(removed, at))
    }

    /// Appends a mood for `at.today`. Earlier entries for the same day are kept.
    pub fn add_mood(&mut self, new: NewMood, at: Moment) -> Result<MoodEntry, StoreError> {
        if !(1..=5).contains(&new.mood) {
            return Err(StoreError::InvalidMood(new.mood));
        }
        let entry = MoodEntry {
            id: Uuid::new_v4().to_string(),
            date: date_key(at.today),
            mood: new.mood,
            note: new.note,
            created_at: at.now_millis,
        };
        self.data.moods.push(entry.clone());
        Ok(entry)
    }

    pub fn mood_for(&self, date: NaiveDate) -> Option<&MoodEntry> {
        mood_for(&self.data.moods, date)
    }

    pub fn refresh_achievements(&mut self, at: Moment) -> Vec<Achievement> {
        let next = recompute(&self.data.achievements, &self.data.habits, at.today, at.now_millis);
        let unlocked = newly_unlocked(&self.data.achievements, &next)
            .into_iter()
            .cloned()
            .collect();
        self.data.achievements = next;
        unlocked
    }

    pub fn import(&mut self, bundle: ExportData, at: Moment) -> Outcome<ImportReport> {
        let report = merge_import(&mut self.data, bundle);
        self.settle(report, at)
    }

    pub fn export(&self, now: DateTime<Local>) -> ExportData {
        export_bundle(&self.data, now)
    }

    fn settle<T>(&mut self, value: T, at: Moment) -> Outcome<T> {
        let unlocked = self.refresh_achievements(at);
        Outcome { value, unlocked }
    }

    fn habit_mut(&mut self, id: &str) -> Result<&mut Habit, StoreError> {
        self.data
            .habits
            .iter_mut()
            .find(|habit| habit.id == id)
            .ok_or_else(|| StoreError::HabitNotFound(id.to_string()))
    }

    fn ensure_group(&self, id: &str) -> Result<(), StoreError> {
        if self.data.groups.iter().any(|group| group.id == id) {
            Ok(())
        } else {
            Err(StoreError::GroupNotFound(id.to_string()))
        }
    }
}

fn validated_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn validate_reminder(reminder: Option<&Reminder>) -> Result<(), StoreError> {
    match reminder {
        Some(reminder) if parse_reminder_time(&reminder.time).is_none() => {
            Err(StoreError::InvalidReminderTime(reminder.time.clone()))
        }
        _ => Ok(()),
    }
}

use crate::errors::{AppError, StoreError};
use crate::reminders::{Notifier, ReminderScheduler, announce_unlocked};
use crate::storage::persist_data;
use crate::store::{HabitStore, Moment, Outcome};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub store: Arc<Mutex<HabitStore>>,
    pub notifier: Arc<dyn Notifier>,
    pub reminders: Arc<Mutex<ReminderScheduler>>,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        store: HabitStore,
        notifier: Arc<dyn Notifier>,
        reminders_enabled: bool,
    ) -> Self {
        Self {
            data_path,
            store: Arc::new(Mutex::new(store)),
            reminders: Arc::new(Mutex::new(ReminderScheduler::new(
                reminders_enabled,
                Arc::clone(&notifier),
            ))),
            notifier,
        }
    }

    /// Runs `change` against a copy of the store and persists the copy. The
    /// live store is replaced and unlocks announced only once the save lands;
    /// on any error the live store is left exactly as it was.
    pub async fn apply<T, F>(&self, change: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut HabitStore) -> Result<Outcome<T>, StoreError> + Send,
        T: Send,
    {
        let mut store = self.store.lock().await;
        let mut next = store.clone();
        let outcome = change(&mut next)?;
        self.persist(&next).await?;
        *store = next;
        announce_unlocked(self.notifier.as_ref(), &outcome.unlocked);
        Ok(outcome.value)
    }

    /// Boot-time recompute. Progress changes stay in memory; the document is
    /// only written when something unlocked.
    pub async fn refresh_achievements(&self, at: Moment) -> Result<usize, AppError> {
        let mut store = self.store.lock().await;
        let mut next = store.clone();
        let unlocked = next.refresh_achievements(at);
        if !unlocked.is_empty() {
            self.persist(&next).await?;
        }
        *store = next;
        announce_unlocked(self.notifier.as_ref(), &unlocked);
        Ok(unlocked.len())
    }

    pub async fn rearm_reminders(&self) {
        let store = self.store.lock().await;
        self.reminders.lock().await.sync(store.habits());
    }

    async fn persist(&self, store: &HabitStore) -> Result<(), AppError> {
        persist_data(&self.data_path, store.snapshot())
            .await
            .inspect_err(|err| error!("failed to persist data: {}", err.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use crate::reminders::tests::RecordingNotifier;
    use crate::storage::load_data;
    use crate::streak::tests::{habit_with, ymd};
    use axum::http::StatusCode;

    fn state_at(data_path: PathBuf, notifier: Arc<RecordingNotifier>) -> AppState {
        let store = HabitStore::from_data(AppData {
            habits: vec![habit_with("h1", &[])],
            ..AppData::default()
        });
        AppState::new(data_path, store, notifier, false)
    }

    fn moment() -> Moment {
        Moment {
            today: ymd(2024, 3, 5),
            now_millis: 42,
        }
    }

    fn sent_titles(notifier: &RecordingNotifier) -> Vec<String> {
        notifier
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }

    #[tokio::test]
    async fn failed_save_keeps_store_and_defers_unlock() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        // a directory cannot be written as a file
        let mut state = state_at(dir.path().to_path_buf(), Arc::clone(&notifier));
        let at = moment();

        let err = state
            .apply(|store| store.toggle_habit("h1", at.today, at))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        {
            let store = state.store.lock().await;
            assert!(!store.habits()[0].is_completed_on(at.today));
            assert!(store.snapshot().achievements.iter().all(|a| !a.is_unlocked()));
        }
        assert!(sent_titles(&notifier).is_empty());

        state.data_path = dir.path().join("state.json");
        let habit = state
            .apply(|store| store.toggle_habit("h1", at.today, at))
            .await
            .unwrap();
        assert!(habit.is_completed_on(at.today));

        let titles = sent_titles(&notifier);
        assert_eq!(titles.len(), 2);
        assert!(titles.iter().any(|t| t.ends_with("First Step")));

        let saved = load_data(&state.data_path).await.unwrap();
        assert_eq!(&saved, state.store.lock().await.snapshot());
    }

    #[tokio::test]
    async fn rejected_change_leaves_the_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let state = state_at(path.clone(), Arc::new(RecordingNotifier::default()));
        let at = moment();

        let err = state
            .apply(|store| store.toggle_habit("missing", at.today, at))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn boot_refresh_writes_only_on_unlock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let notifier = Arc::new(RecordingNotifier::default());
        let state = state_at(path.clone(), Arc::clone(&notifier));
        let at = moment();

        assert_eq!(state.refresh_achievements(at).await.unwrap(), 0);
        assert!(!path.exists());

        *state.store.lock().await = HabitStore::from_data(AppData {
            habits: vec![habit_with("h1", &[at.today])],
            ..AppData::default()
        });
        assert_eq!(state.refresh_achievements(at).await.unwrap(), 2);
        assert!(path.exists());
        assert_eq!(sent_titles(&notifier).len(), 2);
    }
}

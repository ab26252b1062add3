use crate::calendar::today;
use crate::errors::AppError;
use crate::models::{
    AchievementsResponse, ExportData, GroupView, Habit, HabitGroup, HabitUpdate, HabitView,
    ImportReport, MoodEntry, NewGroup, NewHabit, NewMood, ProgressSummary, StatsResponse,
};
use crate::progress::summary;
use crate::state::AppState;
use crate::stats::build_stats;
use crate::store::{Moment, Outcome, habit_view};
use crate::transfer::habits_csv;
use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use chrono::Local;
use tracing::info;

pub async fn list_habits(State(state): State<AppState>) -> Json<Vec<HabitView>> {
    let store = state.store.lock().await;
    Json(store.habit_views(today()))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Json(payload): Json<NewHabit>,
) -> Result<Json<Habit>, AppError> {
    let habit = state
        .apply(|store| store.add_habit(payload, Moment::now()))
        .await?;
    state.rearm_reminders().await;
    info!(id = %habit.id, "habit created");
    Ok(Json(habit))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<HabitUpdate>,
) -> Result<Json<Habit>, AppError> {
    let habit = state
        .apply(|store| store.update_habit(&id, payload, Moment::now()))
        .await?;
    state.rearm_reminders().await;
    Ok(Json(habit))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Habit>, AppError> {
    let habit = state
        .apply(|store| store.delete_habit(&id, Moment::now()))
        .await?;
    state.rearm_reminders().await;
    info!(%id, "habit deleted");
    Ok(Json(habit))
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitView>, AppError> {
    let at = Moment::now();
    let view = state
        .apply(|store| {
            let outcome = store.toggle_habit(&id, at.today, at)?;
            Ok(outcome.map(|habit| habit_view(habit, at.today)))
        })
        .await?;
    Ok(Json(view))
}

pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<GroupView>> {
    let store = state.store.lock().await;
    Json(store.group_views())
}

pub async fn create_group(
    State(state): State<AppState>,
    Json(payload): Json<NewGroup>,
) -> Result<Json<HabitGroup>, AppError> {
    let group = state
        .apply(|store| store.add_group(payload, Moment::now()))
        .await?;
    Ok(Json(group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HabitGroup>, AppError> {
    let group = state
        .apply(|store| store.delete_group(&id, Moment::now()))
        .await?;
    Ok(Json(group))
}

pub async fn list_moods(State(state): State<AppState>) -> Json<Vec<MoodEntry>> {
    let store = state.store.lock().await;
    Json(store.moods().to_vec())
}

pub async fn create_mood(
    State(state): State<AppState>,
    Json(payload): Json<NewMood>,
) -> Result<Json<MoodEntry>, AppError> {
    let entry = state
        .apply(|store| store.add_mood(payload, Moment::now()).map(Outcome::quiet))
        .await?;
    Ok(Json(entry))
}

pub async fn get_achievements(State(state): State<AppState>) -> Json<AchievementsResponse> {
    let store = state.store.lock().await;
    Json(store.achievements())
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressSummary> {
    let store = state.store.lock().await;
    Json(summary(store.habits(), today()))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.lock().await;
    Json(build_stats(store.snapshot()))
}

pub async fn export_json(State(state): State<AppState>) -> Json<ExportData> {
    let store = state.store.lock().await;
    Json(store.export(Local::now()))
}

pub async fn export_csv(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.lock().await;
    let filename = format!("habits-{}.csv", today());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        habits_csv(store.snapshot(), today()),
    )
}

pub async fn import(
    State(state): State<AppState>,
    Json(bundle): Json<ExportData>,
) -> Result<Json<ImportReport>, AppError> {
    let report = state
        .apply(|store| Ok(store.import(bundle, Moment::now())))
        .await?;
    state.rearm_reminders().await;
    info!(
        habits = report.habits,
        groups = report.groups,
        moods = report.moods,
        "import merged"
    );
    Ok(Json(report))
}

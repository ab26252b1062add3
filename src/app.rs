use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route(
            "/api/habits/:id",
            put(handlers::update_habit).delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/groups", get(handlers::list_groups).post(handlers::create_group))
        .route("/api/groups/:id", delete(handlers::delete_group))
        .route("/api/moods", get(handlers::list_moods).post(handlers::create_mood))
        .route("/api/achievements", get(handlers::get_achievements))
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/export", get(handlers::export_json))
        .route("/api/export/csv", get(handlers::export_csv))
        .route("/api/import", post(handlers::import))
        .with_state(state)
}

pub mod achievements;
pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod progress;
pub mod reminders;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod streak;
pub mod transfer;
pub mod window;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
pub use store::HabitStore;

use crate::errors::{AppError, LoadError};
use crate::models::AppData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/state.json")
}

/// Reads the persisted document. A missing file is a fresh start; a file that
/// cannot be read or parsed is an error and is left untouched on disk.
pub async fn load_data(path: &Path) -> Result<AppData, LoadError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
            error!("failed to parse data file {}: {source}", path.display());
            LoadError::Parse {
                path: path.to_path_buf(),
                source,
            }
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("no data file at {}, starting fresh", path.display());
            Ok(AppData::default())
        }
        Err(source) => {
            error!("failed to read data file {}: {source}", path.display());
            Err(LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Rewrites the whole document; there are no partial updates.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::default_catalog;
    use crate::streak::tests::{habit_with, ymd};

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = load_data(&dir.path().join("absent.json")).await.unwrap();
        assert_eq!(data, AppData::default());
    }

    #[tokio::test]
    async fn corrupt_file_is_rejected_and_left_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let original = br#"{"habits": [ {"id": "h1", "name": "Meditate", "#;
        fs::write(&path, original).await.unwrap();

        let err = load_data(&path).await.unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(fs::read(&path).await.unwrap(), original.to_vec());
    }

    #[tokio::test]
    async fn unreadable_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_data(dir.path()).await.unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[tokio::test]
    async fn persisted_document_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let data = AppData {
            habits: vec![habit_with("a", &[ymd(2024, 1, 1)])],
            achievements: default_catalog(),
            ..AppData::default()
        };

        persist_data(&path, &data).await.unwrap();
        assert_eq!(load_data(&path).await.unwrap(), data);

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert_eq!(raw["habits"][0]["completions"]["2024-01-01"], true);
        assert_eq!(raw["habits"][0]["createdAt"], 0);
        assert_eq!(raw["achievements"][0]["type"], "total");
    }
}

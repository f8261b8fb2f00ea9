use crate::config::DatabaseConfig;
use std::path::PathBuf;

/// Returns the path to the callsheet database
///
/// An explicit `database.path` in the config wins. Otherwise:
///
/// - **macOS**: `~/Library/Application Support/callsheet/db.sqlite`
/// - **Linux**: `~/.local/share/callsheet/db.sqlite`
/// - **Windows**: `%LOCALAPPDATA%\callsheet\db.sqlite`
pub fn get_db_path(config: &DatabaseConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &config.path {
        return Ok(path.clone());
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("callsheet").join("db.sqlite"))
}

/// Initialize the database connection
pub fn initialize_database(
    config: &DatabaseConfig,
) -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = get_db_path(config)?;
    tracing::info!("Using database at {}", db_path.display());

    let db = crate::database::Database::new(&db_path)?;
    Ok(std::sync::Arc::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::admins;

    #[test]
    fn test_explicit_path_wins() {
        let config = DatabaseConfig {
            path: Some(PathBuf::from("/tmp/callsheet-test.sqlite")),
        };
        assert_eq!(
            get_db_path(&config).unwrap(),
            PathBuf::from("/tmp/callsheet-test.sqlite")
        );
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_data() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: Some(dir.path().join("nested").join("db.sqlite")),
        };

        let db = initialize_database(&config).unwrap();
        admins::insert_admin(db.async_connection.clone(), "keep@example.com", "hash")
            .await
            .unwrap();
        drop(db);

        let db = initialize_database(&config).unwrap();
        let found = admins::find_admin_by_email(db.async_connection.clone(), "keep@example.com")
            .await
            .unwrap();
        assert!(found.is_some());
    }
}

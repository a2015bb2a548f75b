//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::{Path, PathBuf};

use tracing::info;

/// Filesystem path of a file-backed SQLite URL, `None` for in-memory or
/// non-SQLite URLs.
pub fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") || url.contains("mode=memory") {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Create the parent directory of a file-backed SQLite database.
pub async fn ensure_database_dir(url: &str) -> anyhow::Result<()> {
    let Some(file) = sqlite_file_path(url) else { return Ok(()) };
    let Some(dir) = file.parent().filter(|d| !d.as_os_str().is_empty()) else { return Ok(()) };
    if tokio::fs::metadata(dir).await.is_err() {
        create_dir(dir).await?;
        info!(dir = %dir.display(), "created database directory");
    }
    Ok(())
}

async fn create_dir(dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_urls_resolve_to_paths() {
        assert_eq!(
            sqlite_file_path("sqlite://data/school.db?mode=rwc"),
            Some(PathBuf::from("data/school.db"))
        );
        assert_eq!(sqlite_file_path("sqlite:school.db"), Some(PathBuf::from("school.db")));
    }

    #[test]
    fn memory_and_postgres_urls_have_no_path() {
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("sqlite://shared?mode=memory"), None);
        assert_eq!(sqlite_file_path("postgres://u:p@localhost/db"), None);
    }

    #[tokio::test]
    async fn creates_missing_parent_directory() {
        let dir = std::env::temp_dir().join(format!("school_tracker_env_{}", std::process::id()));
        let url = format!("sqlite://{}/nested/school.db?mode=rwc", dir.display());
        ensure_database_dir(&url).await.unwrap();
        assert!(dir.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}

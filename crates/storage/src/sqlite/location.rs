use std::path::{Path, PathBuf};

use super::SqliteInitError;

/// Turns a file path or relative `sqlite:` URL into an absolute
/// `sqlite://` URL, so every binary resolves the same database file.
///
/// `sqlite::memory:`, `sqlite:file:` URIs and URLs that are already
/// `sqlite://` pass through unchanged.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Creates the database file (and its parent directories) for a normalized
/// `sqlite://` URL. In-memory URLs need nothing.
///
/// # Errors
///
/// Returns `SqliteInitError::InvalidUrl` for URLs without a file path and
/// `SqliteInitError::Io` if the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), SqliteInitError> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let invalid = || SqliteInitError::InvalidUrl {
        raw: db_url.to_string(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_made_absolute() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/a.db"), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/a.db"), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url(" /tmp/a.db "), "sqlite:///tmp/a.db");

        let cwd = std::env::current_dir().unwrap();
        let expected = format!("sqlite://{}", cwd.join("dev.sqlite3").display());
        assert_eq!(normalize_sqlite_url("dev.sqlite3"), expected);
        assert_eq!(normalize_sqlite_url("sqlite:dev.sqlite3"), expected);
    }

    #[test]
    fn shared_memory_uris_pass_through() {
        let uri = "sqlite:file:memdb_x?mode=memory&cache=shared";
        assert_eq!(normalize_sqlite_url(uri), uri);
        assert!(prepare_sqlite_file(uri).is_ok());
    }

    #[test]
    fn prepare_rejects_urls_without_a_file() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(matches!(
            prepare_sqlite_file("postgres://db"),
            Err(SqliteInitError::InvalidUrl { .. })
        ));
        assert!(matches!(
            prepare_sqlite_file("sqlite://"),
            Err(SqliteInitError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn prepare_creates_missing_file() {
        let dir = std::env::temp_dir().join(format!("course-store-{}", std::process::id()));
        let file = dir.join("nested").join("courses.sqlite3");
        let url = normalize_sqlite_url(&file.display().to_string());

        prepare_sqlite_file(&url).unwrap();
        assert!(file.exists());
        prepare_sqlite_file(&url).unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

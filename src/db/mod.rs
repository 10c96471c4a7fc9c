//! Media store: registration of staged artifacts.
//!
//! Uses SQLx with SQLite. One table, `media`, maps an opaque link (the
//! artifact's UUID) to the relative storage key it was written under.
//!
//! # Example
//!
//! ```ignore
//! use sonora::db::{init_db, db_url, insert_media};
//!
//! let pool = init_db(&db_url(Some(Path::new("media.db")))).await?;
//! let id = insert_media(&pool, &link, "ab/cd/song.mp3").await?;
//! ```

use chrono::{DateTime, Utc};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "sonora_media.db";

/// A registered artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub id: i64,
    pub link: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct MediaRow {
    id: i64,
    link: String,
    key: String,
    created_at: String,
    updated_at: String,
}

impl From<MediaRow> for MediaRecord {
    fn from(row: MediaRow) -> Self {
        Self {
            id: row.id,
            link: row.link,
            key: row.key,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist.
///
/// # Errors
///
/// Returns an error if creation, connection, or migration fails.
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Register an artifact; returns the row id.
///
/// Both `link` and `key` are unique: registering either twice is an error.
pub async fn insert_media(pool: &SqlitePool, link: &str, key: &str) -> sqlx::Result<i64> {
    let now = Utc::now().to_rfc3339();

    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO media (link, key, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(link)
    .bind(key)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Look up an artifact by its link.
pub async fn get_media(pool: &SqlitePool, link: &str) -> sqlx::Result<Option<MediaRecord>> {
    let row: Option<MediaRow> = sqlx::query_as("SELECT * FROM media WHERE link = ?")
        .bind(link)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::temp_db;
    use std::path::Path;

    #[test]
    fn test_db_url() {
        assert_eq!(db_url(Some(Path::new("/tmp/m.db"))), "sqlite:/tmp/m.db");
        assert_eq!(db_url(None), "sqlite:sonora_media.db");
    }

    #[tokio::test]
    async fn test_insert_and_get_media() {
        let (pool, _dir) = temp_db().await;

        let id = insert_media(&pool, "0f1e2d3c", "0f/1e/song.mp3").await.unwrap();
        assert!(id > 0);

        let record = get_media(&pool, "0f1e2d3c").await.unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.key, "0f/1e/song.mp3");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected() {
        let (pool, _dir) = temp_db().await;

        insert_media(&pool, "link-a", "aa/bb/x.mp3").await.unwrap();
        assert!(insert_media(&pool, "link-b", "aa/bb/x.mp3").await.is_err());
        assert!(insert_media(&pool, "link-a", "aa/bb/y.mp3").await.is_err());
    }

    #[tokio::test]
    async fn test_get_missing_media() {
        let (pool, _dir) = temp_db().await;
        assert!(get_media(&pool, "missing").await.unwrap().is_none());
    }
}

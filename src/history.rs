//! Saved tag generations.
//!
//! The pipeline itself holds no database handle; callers hand the final tag
//! list to [`TagHistory`] together with the query and an owner.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::OptionalExtension;
use rusqlite::types::Type;
use time::OffsetDateTime;

use crate::{Database, GenerationId, TagGeneration};

/// Number of generations returned when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Gets the cross-platform history database path.
///
/// Returns the path as `{data_dir}/beattag/history.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn get_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("beattag").join("history.db"))
}

/// Creates the parent directory of the database file if needed.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

/// Service for recording and browsing tag generations.
///
/// # Examples
///
/// ```
/// use beattag::{Database, TagHistory};
///
/// # fn main() -> anyhow::Result<()> {
/// let history = TagHistory::new(Database::in_memory()?);
///
/// let tags = vec!["drake type beat".to_string(), "drake instrumental".to_string()];
/// let saved = history.record("producer-1", "drake", &tags)?;
///
/// let recent = history.recent("producer-1", 10)?;
/// assert_eq!(recent[0].id(), saved.id());
/// assert_eq!(recent[0].tags(), tags.as_slice());
/// # Ok(())
/// # }
/// ```
pub struct TagHistory {
    db: Database,
}

impl TagHistory {
    /// Creates a history service that owns the given database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Saves the selected tags for a query.
    ///
    /// # Errors
    ///
    /// Returns an error if `owner` or `query` is blank, or the insert fails.
    pub fn record(&self, owner: &str, query: &str, tags: &[String]) -> Result<TagGeneration> {
        let owner = owner.trim();
        let query = query.trim();
        if owner.is_empty() {
            anyhow::bail!("Owner cannot be empty");
        }
        if query.is_empty() {
            anyhow::bail!("Query cannot be empty");
        }

        let now = OffsetDateTime::now_utc();
        let now = now
            .replace_nanosecond(0)
            .context("Failed to truncate timestamp")?;
        let tags_json = serde_json::to_string(tags).context("Failed to encode tags")?;

        self.db
            .connection()
            .execute(
                "INSERT INTO tag_generations (owner, query, tags, created_at) VALUES (?1, ?2, ?3, ?4)",
                (owner, query, &tags_json, now.unix_timestamp()),
            )
            .context("Failed to save tag generation")?;

        let id = self.db.connection().last_insert_rowid();
        tracing::debug!(id, owner, query, tags = tags.len(), "recorded tag generation");

        Ok(TagGeneration::new(
            GenerationId::new(id),
            owner,
            query,
            tags.to_vec(),
            now,
        ))
    }

    /// Lists an owner's generations, newest first.
    ///
    /// Generations saved within the same second are ordered by id, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored row is corrupt.
    pub fn recent(&self, owner: &str, limit: usize) -> Result<Vec<TagGeneration>> {
        let conn = self.db.connection();
        let mut stmt = conn
            .prepare(
                "SELECT id, owner, query, tags, created_at
                 FROM tag_generations
                 WHERE owner = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2",
            )
            .context("Failed to prepare history query")?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map((owner.trim(), limit), row_to_generation)
            .context("Failed to query history")?;

        let mut generations = Vec::new();
        for row in rows {
            generations.push(row.context("Failed to read tag generation")?);
        }
        Ok(generations)
    }

    /// Fetches one generation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is corrupt.
    pub fn get(&self, id: GenerationId) -> Result<Option<TagGeneration>> {
        self.db
            .connection()
            .query_row(
                "SELECT id, owner, query, tags, created_at FROM tag_generations WHERE id = ?1",
                [id.get()],
                row_to_generation,
            )
            .optional()
            .with_context(|| format!("Failed to load tag generation {id}"))
    }

    /// Deletes a generation. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete(&self, id: GenerationId) -> Result<bool> {
        let removed = self
            .db
            .connection()
            .execute("DELETE FROM tag_generations WHERE id = ?1", [id.get()])
            .with_context(|| format!("Failed to delete tag generation {id}"))?;
        Ok(removed > 0)
    }
}

fn row_to_generation(row: &rusqlite::Row<'_>) -> rusqlite::Result<TagGeneration> {
    let id: i64 = row.get(0)?;
    let owner: String = row.get(1)?;
    let query: String = row.get(2)?;
    let tags_json: String = row.get(3)?;
    let created_at: i64 = row.get(4)?;

    let tags: Vec<String> = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    let created_at = OffsetDateTime::from_unix_timestamp(created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e)))?;

    Ok(TagGeneration::new(
        GenerationId::new(id),
        owner,
        query,
        tags,
        created_at,
    ))
}

/// Schema for the tag history database.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
pub const INITIAL_SCHEMA: &str = r#"
-- One row per saved generation; tags is a JSON array in selection order
CREATE TABLE IF NOT EXISTS tag_generations (
    id INTEGER PRIMARY KEY,
    owner TEXT NOT NULL,
    query TEXT NOT NULL,
    tags TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

-- Index for listing an owner's history newest first
CREATE INDEX IF NOT EXISTS idx_tag_generations_owner_created
    ON tag_generations(owner, created_at);
"#;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::GenerationId;

/// A persisted tag generation: the final tag list for one query and owner.
///
/// Individual candidates are never stored, only the selected tags in
/// selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagGeneration {
    id: GenerationId,
    owner: String,
    query: String,
    tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl TagGeneration {
    /// Creates a generation record.
    ///
    /// # Examples
    ///
    /// ```
    /// use beattag::{GenerationId, TagGeneration};
    /// use time::OffsetDateTime;
    ///
    /// let generation = TagGeneration::new(
    ///     GenerationId::new(1),
    ///     "producer-1",
    ///     "drake type beat",
    ///     vec!["drake type beat".to_string()],
    ///     OffsetDateTime::UNIX_EPOCH,
    /// );
    /// assert_eq!(generation.tags().len(), 1);
    /// assert_eq!(generation.tag_field(), "drake type beat");
    /// ```
    pub fn new(
        id: GenerationId,
        owner: impl Into<String>,
        query: impl Into<String>,
        tags: Vec<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            owner: owner.into(),
            query: query.into(),
            tags,
            created_at,
        }
    }

    pub fn id(&self) -> GenerationId {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Tags in selection order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Tags joined with commas, the format the upload tag field expects.
    pub fn tag_field(&self) -> String {
        self.tags.join(",")
    }

    /// Characters the tag field occupies, separators included.
    pub fn char_count(&self) -> usize {
        let letters: usize = self.tags.iter().map(|t| t.chars().count()).sum();
        letters + self.tags.len().saturating_sub(1)
    }
}

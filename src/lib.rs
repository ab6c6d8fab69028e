pub mod config;
pub mod db;
pub mod history;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod suggest;

pub use config::{ConfigError, GeneratorConfig};
pub use db::Database;
pub use history::TagHistory;
pub use models::{CandidateSource, GenerationId, RawCandidate, TagCandidate, TagGeneration};
pub use pipeline::{GenerationRun, TagGenerator, TagGeneratorBuilder, generate_tags};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_accessible_from_crate_root() {
        let db = Database::in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let source = CandidateSource::Autocomplete;
        assert_eq!(format!("{}", source), "autocomplete");

        let candidate = TagCandidate::new("drake type beat", source).with_score(0.5);
        assert_eq!(candidate.key(), "drake type beat");

        let raw = RawCandidate::new("drake", CandidateSource::Template);
        assert_eq!(raw.source, CandidateSource::Template);

        let config = GeneratorConfig::default();
        let generator = TagGeneratorBuilder::new().config(config).build();
        assert_eq!(generator.config().char_budget, 495);
    }
}

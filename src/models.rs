mod candidate_source;
mod ids;
mod tag_candidate;
mod tag_generation;

pub use candidate_source::CandidateSource;
pub use ids::GenerationId;
pub use tag_candidate::{RawCandidate, TagCandidate};
pub use tag_generation::TagGeneration;

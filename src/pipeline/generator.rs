//! End-to-end tag generation for one query.

use std::sync::Arc;
use std::thread;

use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::llm::GenerativeProvider;
use crate::models::TagCandidate;
use crate::sources::{LiveSuggestions, generated_candidates, template_candidates};
use crate::suggest::{SuggestionProvider, YouTubeSuggestClientBuilder};

use super::merge::merge_candidates;
use super::scorer::Scorer;
use super::selector::select_with;
use super::similarity::token_set;

/// Everything a generation run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationRun {
    pub query: String,
    /// Normalized live suggestions.
    pub suggestions: Vec<String>,
    /// Scored merged pool, in merge order.
    pub candidates: Vec<TagCandidate>,
    /// Selected tags in selection order.
    pub tags: Vec<String>,
    /// Tag lengths plus one separator between tags.
    pub total_chars: usize,
}

/// Builder for [`TagGenerator`].
///
/// Both providers are optional; a missing provider contributes no candidates.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use beattag::llm::OllamaClientBuilder;
/// use beattag::pipeline::TagGeneratorBuilder;
/// use beattag::suggest::YouTubeSuggestClientBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = TagGeneratorBuilder::new()
///     .generative(Arc::new(OllamaClientBuilder::new().build()?))
///     .suggestions(Arc::new(YouTubeSuggestClientBuilder::new().build()?))
///     .build();
///
/// let tags = generator.generate_tags("drake");
/// println!("{}", tags.join(","));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct TagGeneratorBuilder {
    generative: Option<Arc<dyn GenerativeProvider>>,
    suggestions: Option<Arc<dyn SuggestionProvider>>,
    config: GeneratorConfig,
}

impl TagGeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language-model provider for generated candidates.
    pub fn generative(mut self, provider: Arc<dyn GenerativeProvider>) -> Self {
        self.generative = Some(provider);
        self
    }

    /// Sets the live autocomplete provider.
    pub fn suggestions(mut self, provider: Arc<dyn SuggestionProvider>) -> Self {
        self.suggestions = Some(provider);
        self
    }

    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn build(self) -> TagGenerator {
        TagGenerator {
            generative: self.generative,
            suggestions: self.suggestions,
            config: self.config,
        }
    }
}

/// Turns a seed query into a budget-constrained, diverse tag list.
///
/// Never fails: provider errors degrade the run to fewer candidate sources.
pub struct TagGenerator {
    generative: Option<Arc<dyn GenerativeProvider>>,
    suggestions: Option<Arc<dyn SuggestionProvider>>,
    config: GeneratorConfig,
}

impl TagGenerator {
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs the full pipeline and returns the selected tags.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails [`GeneratorConfig::validate`].
    pub fn generate_tags(&self, query: &str) -> Vec<String> {
        self.run(query).tags
    }

    /// Runs the full pipeline and returns every intermediate result.
    ///
    /// The autocomplete fetch and the generative call run concurrently;
    /// merging waits for both and applies the fixed priority order
    /// generated, then template, then autocomplete.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails [`GeneratorConfig::validate`].
    pub fn run(&self, query: &str) -> GenerationRun {
        let config = &self.config;
        let query = query.trim();

        let (live, generated) = thread::scope(|scope| {
            let suggest = scope.spawn(|| {
                LiveSuggestions::fetch(self.suggestions.as_deref(), query, &config.language)
            });

            let generated = generated_candidates(
                self.generative.as_deref(),
                query,
                config.generated_limit,
                config.fallback_limit,
            );

            let live = suggest.join().unwrap_or_else(|_| {
                tracing::warn!(query, "autocomplete worker panicked, continuing without suggestions");
                LiveSuggestions::default()
            });

            (live, generated)
        });

        let template = template_candidates(query, config.template_year());
        let generated_count = generated.len();
        let template_count = template.len();

        let (mut candidates, stats) = merge_candidates([generated, template, live.candidates()]);

        let scorer = Scorer::new(token_set(query), live.lookup_set())
            .with_years(config.current_years.clone());
        scorer.score_all(&mut candidates);

        let selection = select_with(candidates.clone(), config.selection_params());

        tracing::info!(
            query,
            suggestions = live.len(),
            generated = generated_count,
            template = template_count,
            merged = candidates.len(),
            dropped_spam = stats.spam,
            dropped_duplicate = stats.duplicate,
            selected = selection.tags.len(),
            chars = selection.total_chars,
            "tag generation complete"
        );

        if selection.tags.len() < config.min_tag_count {
            tracing::warn!(
                query,
                selected = selection.tags.len(),
                target = config.min_tag_count,
                "selected fewer tags than the target count"
            );
        }

        GenerationRun {
            query: query.to_string(),
            suggestions: live.as_slice().to_vec(),
            candidates,
            tags: selection.tags,
            total_chars: selection.total_chars,
        }
    }
}

/// Generates tags for `query` with default settings.
///
/// Live suggestions come from the default YouTube suggest client; if it cannot
/// be constructed the run continues without them.
pub fn generate_tags(query: &str, provider: Option<Arc<dyn GenerativeProvider>>) -> Vec<String> {
    let mut builder = TagGeneratorBuilder::new();

    match YouTubeSuggestClientBuilder::new().build() {
        Ok(client) => builder = builder.suggestions(Arc::new(client)),
        Err(e) => tracing::warn!(error = %e, "suggest client unavailable, continuing without suggestions"),
    }

    if let Some(provider) = provider {
        builder = builder.generative(provider);
    }

    builder.build().generate_tags(query)
}

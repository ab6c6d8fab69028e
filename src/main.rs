use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use beattag::history::{DEFAULT_HISTORY_LIMIT, ensure_database_directory, get_database_path};
use beattag::llm::OllamaClientBuilder;
use beattag::suggest::YouTubeSuggestClientBuilder;
use beattag::{
    ConfigError, Database, GenerationId, GenerationRun, GeneratorConfig, TagCandidate,
    TagGeneration, TagGeneratorBuilder, TagHistory,
};
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Owner recorded when none is given.
const DEFAULT_OWNER: &str = "local";

/// beattag - YouTube type beat tag generator
#[derive(Parser)]
#[command(name = "beattag")]
#[command(about = "Generate diverse, budget-constrained YouTube tags for type beats")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Generate tags for a seed query
    Generate(GenerateCommand),
    /// List saved generations, newest first
    History(HistoryCommand),
    /// Show one saved generation
    Show(ShowCommand),
    /// Delete one saved generation
    Delete(DeleteCommand),
}

/// Generate tags for a seed query
#[derive(Parser)]
struct GenerateCommand {
    /// Seed query, usually an artist or style (e.g. "lil uzi vert")
    #[arg(value_name = "QUERY")]
    query: String,

    /// Owner the generation is saved under
    #[arg(long, value_name = "NAME", default_value = DEFAULT_OWNER)]
    owner: String,

    /// Do not save the generation to history
    #[arg(long)]
    no_save: bool,

    /// Print JSON instead of the comma-separated tag field
    #[arg(long)]
    json: bool,

    /// Also print every scored candidate
    #[arg(long)]
    explain: bool,

    /// Weight of score versus redundancy, within [0, 1]
    #[arg(long, value_name = "F")]
    diversity: Option<f64>,

    /// Character budget for the tag field
    #[arg(long, value_name = "N")]
    budget: Option<usize>,

    /// Skip autocomplete and the language model (template-only run)
    #[arg(long)]
    offline: bool,
}

/// List saved generations
#[derive(Parser)]
struct HistoryCommand {
    /// Owner whose history to list
    #[arg(long, value_name = "NAME", default_value = DEFAULT_OWNER)]
    owner: String,

    /// Maximum number of generations to list
    #[arg(long, value_name = "N", default_value_t = DEFAULT_HISTORY_LIMIT)]
    limit: usize,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

/// Show one saved generation
#[derive(Parser)]
struct ShowCommand {
    /// Generation id
    #[arg(value_name = "ID")]
    id: GenerationId,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

/// Delete one saved generation
#[derive(Parser)]
struct DeleteCommand {
    /// Generation id
    #[arg(value_name = "ID")]
    id: GenerationId,
}

fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Generate(cmd) => handle_generate(cmd),
        Commands::History(cmd) => handle_history(cmd),
        Commands::Show(cmd) => handle_show(cmd),
        Commands::Delete(cmd) => handle_delete(cmd),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are invalid input: empty values, out-of-range settings,
/// unknown ids. Everything else (database, I/O) is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    if error.chain().any(|e| e.downcast_ref::<ConfigError>().is_some()) {
        return true;
    }
    let error_msg = error.to_string();
    error_msg.contains("cannot be empty") || error_msg.contains("not found")
}

/// Opens the history database, creating its directory if needed.
fn open_history() -> Result<TagHistory> {
    let db_path = get_database_path()?;
    ensure_database_directory(&db_path)?;
    let db = Database::open(&db_path).context("Failed to open database")?;
    Ok(TagHistory::new(db))
}

/// Resolves generator settings from the environment and command-line overrides.
fn resolve_config(cmd: &GenerateCommand) -> Result<GeneratorConfig> {
    let mut config = GeneratorConfig::from_env()?;
    if let Some(diversity) = cmd.diversity {
        config.diversity_weight = diversity;
    }
    if let Some(budget) = cmd.budget {
        config.char_budget = budget;
    }
    config.validate()?;
    Ok(config)
}

/// Handles the generate command.
fn handle_generate(cmd: &GenerateCommand) -> Result<()> {
    if cmd.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }
    if !cmd.no_save && cmd.owner.trim().is_empty() {
        anyhow::bail!("Owner cannot be empty");
    }

    let config = resolve_config(cmd)?;
    let mut builder = TagGeneratorBuilder::new().config(config);

    if !cmd.offline {
        match OllamaClientBuilder::new().build() {
            Ok(client) => builder = builder.generative(Arc::new(client)),
            Err(e) => tracing::warn!(error = %e, "language model unavailable, continuing without it"),
        }
        match YouTubeSuggestClientBuilder::new().build() {
            Ok(client) => builder = builder.suggestions(Arc::new(client)),
            Err(e) => tracing::warn!(error = %e, "suggest client unavailable, continuing without it"),
        }
    }

    let run = builder.build().run(&cmd.query);

    let history = if cmd.no_save {
        None
    } else {
        Some(open_history()?)
    };

    print!(
        "{}",
        execute_generate(&run, history.as_ref(), &cmd.owner, cmd.json, cmd.explain)?
    );
    Ok(())
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<GenerationId>,
    query: &'a str,
    tags: &'a [String],
    total_chars: usize,
    suggestions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<Vec<&'a TagCandidate>>,
}

/// Saves the run if a history is given and renders the output.
///
/// Separated from `handle_generate` so it can be tested with in-memory databases.
fn execute_generate(
    run: &GenerationRun,
    history: Option<&TagHistory>,
    owner: &str,
    json: bool,
    explain: bool,
) -> Result<String> {
    let id = match history {
        Some(history) if !run.tags.is_empty() => Some(
            history
                .record(owner, &run.query, &run.tags)
                .context("Failed to save tag generation")?
                .id(),
        ),
        _ => None,
    };

    if json {
        let output = GenerateOutput {
            id,
            query: &run.query,
            tags: &run.tags,
            total_chars: run.total_chars,
            suggestions: &run.suggestions,
            candidates: explain.then(|| ranked(&run.candidates)),
        };
        let mut out = serde_json::to_string_pretty(&output)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    if explain {
        for candidate in ranked(&run.candidates) {
            let selected = if run.tags.contains(&candidate.text) {
                "*"
            } else {
                " "
            };
            writeln!(
                out,
                "{selected} {:>6.3}  {:<12}  {}",
                candidate.score, candidate.source, candidate.text
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", run.tags.join(","))?;
    match id {
        Some(id) => writeln!(
            out,
            "{} tags, {} characters (saved as {id})",
            run.tags.len(),
            run.total_chars
        )?,
        None => writeln!(out, "{} tags, {} characters", run.tags.len(), run.total_chars)?,
    }
    Ok(out)
}

/// Candidates by descending score, merge order breaking ties.
fn ranked(candidates: &[TagCandidate]) -> Vec<&TagCandidate> {
    let mut ranked: Vec<&TagCandidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Handles the history command.
fn handle_history(cmd: &HistoryCommand) -> Result<()> {
    let history = open_history()?;
    print!("{}", execute_history(&history, &cmd.owner, cmd.limit, cmd.json)?);
    Ok(())
}

fn execute_history(history: &TagHistory, owner: &str, limit: usize, json: bool) -> Result<String> {
    let generations = history.recent(owner, limit)?;

    if json {
        let mut out = serde_json::to_string_pretty(&generations)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    if generations.is_empty() {
        writeln!(out, "No saved generations for {owner}")?;
    }
    for generation in &generations {
        writeln!(
            out,
            "{:>5}  {}  {}  ({} tags)",
            generation.id(),
            format_timestamp(generation),
            generation.query(),
            generation.tags().len()
        )?;
    }
    Ok(out)
}

/// Handles the show command.
fn handle_show(cmd: &ShowCommand) -> Result<()> {
    let history = open_history()?;
    print!("{}", execute_show(&history, cmd.id, cmd.json)?);
    Ok(())
}

fn execute_show(history: &TagHistory, id: GenerationId, json: bool) -> Result<String> {
    let generation = history
        .get(id)?
        .ok_or_else(|| anyhow::anyhow!("Generation {id} not found"))?;

    if json {
        let mut out = serde_json::to_string_pretty(&generation)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    writeln!(out, "Query:   {}", generation.query())?;
    writeln!(out, "Owner:   {}", generation.owner())?;
    writeln!(out, "Created: {}", format_timestamp(&generation))?;
    writeln!(
        out,
        "Tags:    {} ({} characters)",
        generation.tags().len(),
        generation.char_count()
    )?;
    writeln!(out)?;
    writeln!(out, "{}", generation.tag_field())?;
    Ok(out)
}

/// Handles the delete command.
fn handle_delete(cmd: &DeleteCommand) -> Result<()> {
    let history = open_history()?;
    if !history.delete(cmd.id)? {
        anyhow::bail!("Generation {} not found", cmd.id);
    }
    println!("Deleted generation {}", cmd.id);
    Ok(())
}

fn format_timestamp(generation: &TagGeneration) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]");
    generation
        .created_at()
        .format(&format)
        .unwrap_or_else(|_| generation.created_at().unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> TagHistory {
        TagHistory::new(Database::in_memory().expect("failed to create in-memory database"))
    }

    fn offline_run(query: &str) -> GenerationRun {
        TagGeneratorBuilder::new().build().run(query)
    }

    fn generate_command(query: &str) -> GenerateCommand {
        GenerateCommand {
            query: query.to_string(),
            owner: DEFAULT_OWNER.to_string(),
            no_save: true,
            json: false,
            explain: false,
            diversity: None,
            budget: None,
            offline: true,
        }
    }

    #[test]
    fn query_validation_rejects_empty_string() {
        let result = handle_generate(&generate_command(""));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn query_validation_rejects_whitespace_only() {
        let result = handle_generate(&generate_command("   \n\t  "));
        let err = result.unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn out_of_range_diversity_is_a_user_error() {
        let mut cmd = generate_command("drake");
        cmd.diversity = Some(1.5);

        let err = resolve_config(&cmd).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn zero_budget_is_a_user_error() {
        let mut cmd = generate_command("drake");
        cmd.budget = Some(0);

        let err = resolve_config(&cmd).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn database_errors_are_internal() {
        let err = anyhow::anyhow!("disk I/O error").context("Failed to open database");
        assert!(!is_user_error(&err));
    }

    #[test]
    fn generate_prints_tag_field_and_saves() {
        let history = history();
        let run = offline_run("lil uzi vert");

        let out = execute_generate(&run, Some(&history), "producer-1", false, false).unwrap();

        let first_line = out.lines().next().unwrap();
        assert_eq!(first_line, run.tags.join(","));
        assert!(out.contains("saved as"));
        assert_eq!(history.recent("producer-1", 10).unwrap().len(), 1);
    }

    #[test]
    fn generate_without_history_does_not_save() {
        let run = offline_run("lil uzi vert");
        let out = execute_generate(&run, None, "producer-1", false, false).unwrap();
        assert!(!out.contains("saved as"));
    }

    #[test]
    fn generate_json_includes_candidates_only_when_explaining() {
        let run = offline_run("drake");

        let plain: serde_json::Value =
            serde_json::from_str(&execute_generate(&run, None, "a", true, false).unwrap()).unwrap();
        assert!(plain.get("candidates").is_none());
        assert!(plain.get("id").is_none());
        assert_eq!(plain["query"], "drake");

        let explained: serde_json::Value =
            serde_json::from_str(&execute_generate(&run, None, "a", true, true).unwrap()).unwrap();
        assert_eq!(explained["candidates"].as_array().unwrap().len(), 12);
    }

    #[test]
    fn explain_marks_selected_candidates() {
        let run = offline_run("drake");
        let out = execute_generate(&run, None, "a", false, true).unwrap();
        assert!(out.lines().any(|l| l.starts_with('*')));
    }

    #[test]
    fn history_lists_saved_generations() {
        let history = history();
        history
            .record("producer-1", "drake", &["drake type beat".to_string()])
            .unwrap();

        let out = execute_history(&history, "producer-1", 10, false).unwrap();
        assert!(out.contains("drake"));
        assert!(out.contains("(1 tags)"));

        let empty = execute_history(&history, "someone-else", 10, false).unwrap();
        assert!(empty.contains("No saved generations"));
    }

    #[test]
    fn show_missing_generation_is_a_user_error() {
        let err = execute_show(&history(), GenerationId::new(42), false).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn show_prints_tag_field() {
        let history = history();
        let saved = history
            .record(
                "producer-1",
                "drake",
                &["drake type beat".to_string(), "toronto rnb".to_string()],
            )
            .unwrap();

        let out = execute_show(&history, saved.id(), false).unwrap();
        assert!(out.contains("drake type beat,toronto rnb"));
        assert!(out.contains("Owner:   producer-1"));
    }
}

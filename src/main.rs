use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

use vocab_srs::config::Config;
use vocab_srs::logging::init_tracing;
use vocab_srs::scheduler::{
    format_interval, item_stats, mastery_report, Candidate, PracticeStats, Selection,
};
use vocab_srs::storage::{JsonCatalog, JsonProgressStore};
use vocab_srs::{ProgressRecorder, ProgressStore, VocabularyCatalog};

#[derive(Parser)]
#[command(name = "vocab-srs", about = "Spaced-repetition scheduler for vocabulary flashcards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select the next item to practise
    Next,
    /// Record the answer given for an item
    Answer { item_id: String, result: AnswerResult },
    /// Show practice statistics
    Stats {
        /// One row per answered item
        #[arg(long)]
        items: bool,
    },
    /// Remove progress records whose id is not in the vocabulary
    Clean {
        #[arg(long)]
        no_backup: bool,
    },
    /// Clear all progress
    Reset {
        #[arg(long)]
        no_backup: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AnswerResult {
    Correct,
    Wrong,
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = init_tracing(&config.log);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonProgressStore::with_params(&config.progress_file, config.params.clone());
    let mut recorder = ProgressRecorder::open(store, config.params.clone())?;
    let now = Utc::now();

    match command {
        Command::Next => {
            let catalog = JsonCatalog::new(&config.catalog_file).list_items()?;
            match recorder.next_item(&catalog, now)? {
                Selection::NoItemAvailable => {
                    println!("Nothing to review right now, try again later.");
                }
                Selection::New(candidate) => show_candidate(&recorder, &candidate, " (new word)", now),
                Selection::Review(candidate) => show_candidate(&recorder, &candidate, "", now),
            }
        }
        Command::Answer { item_id, result } => {
            let catalog = JsonCatalog::new(&config.catalog_file).list_items()?;
            let success = matches!(result, AnswerResult::Correct);
            let outcome = recorder.answer(&catalog, &item_id, success, now)?;
            println!(
                "{item_id}: {} - next review in {} (easiness {:.1})",
                if success { "correct" } else { "wrong" },
                format_interval(outcome.interval),
                outcome.easiness_factor
            );
            if recorder.has_pending_save() {
                println!("warning: progress could not be saved and is held in memory only");
            }
        }
        Command::Stats { items: true } => {
            let catalog = JsonCatalog::new(&config.catalog_file).list_items()?;
            let rows = item_stats(&catalog, recorder.progress(), now, recorder.params());
            if rows.is_empty() {
                println!("No items attempted yet.");
            }
            println!(
                "{:>8}  {:>9}  {:>8}  {:>6}  {:>8}  {:<8}  history",
                "id", "successes", "attempts", "raw", "weighted", "status"
            );
            for row in rows {
                let status = if row.report.is_mastered() { "mastered" } else { "learning" };
                let orphan = if row.in_catalog { "" } else { " (not in vocabulary)" };
                println!(
                    "{:>8}  {:>9}  {:>8}  {:>5.1}%  {:>7.1}%  {:<8}  {}{orphan}",
                    row.item_id,
                    row.report.successes,
                    row.report.attempts,
                    row.report.raw_success_rate * 100.0,
                    row.report.weighted_success_rate * 100.0,
                    status,
                    row.history
                );
            }
        }
        Command::Stats { items: false } => {
            let catalog = JsonCatalog::new(&config.catalog_file).list_items()?;
            let stats = PracticeStats::compute(&catalog, recorder.progress(), now, recorder.params());
            println!("words:     {}", stats.total_words);
            println!("started:   {}", stats.words_started);
            println!("active:    {}", stats.words_active);
            println!("mastered:  {}", stats.words_mastered);
            println!("due:       {}", stats.words_due);
            println!(
                "attempts:  {} ({} correct, {:.1}%)",
                stats.total_attempts,
                stats.total_successes,
                stats.success_rate * 100.0
            );
        }
        Command::Clean { no_backup } => {
            let catalog = JsonCatalog::new(&config.catalog_file).list_items()?;
            let outcome = recorder.prune_orphans(&catalog, !no_backup)?;
            if outcome.removed.is_empty() {
                println!("No orphan records found.");
            }
            for id in &outcome.removed {
                println!("removed {id}");
            }
            if let Some(backup) = outcome.backup {
                println!("Backup written to {}", backup.display());
            }
            println!("{} records remaining", recorder.progress().len());
        }
        Command::Reset { no_backup } => match recorder.reset(!no_backup)? {
            Some(backup) => println!("Progress reset, backup written to {}", backup.display()),
            None => println!("Progress reset"),
        },
    }
    Ok(())
}

fn show_candidate<S: ProgressStore>(
    recorder: &ProgressRecorder<S>,
    candidate: &Candidate,
    label: &str,
    now: DateTime<Utc>,
) {
    println!("{} [{}]", candidate.item.text, candidate.item.id);
    println!("- priority: {:.1}{label}", candidate.priority);
    let Some(record) = recorder.record(&candidate.item.id) else {
        return;
    };
    let report = mastery_report(record, now, recorder.params());
    println!(
        "- success rate: {:.0}% raw, {:.0}% weighted ({}/{})",
        report.raw_success_rate * 100.0,
        report.weighted_success_rate * 100.0,
        record.successes,
        record.attempts
    );
    println!("- easiness factor: {:.1}", record.easiness_factor);
    println!("- optimal interval: {}", format_interval(record.interval));
    println!("- mastery status: {}", report.describe());
}

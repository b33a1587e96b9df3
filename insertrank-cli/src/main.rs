mod config;
mod error;
mod items;
mod logging;
mod output;
mod prompt;
mod sheet;

use clap::Parser;
use insertrank_core::{run_ranking, RankError, RankedStore, RankingEngine};
use std::io::{self, IsTerminal};
use tracing::{info, warn};

use crate::config::{IoArgs, Settings};
use crate::error::AdapterError;
use crate::items::FileItemSource;
use crate::output::ProgressReporter;
use crate::prompt::TerminalComparator;
use crate::sheet::SheetStore;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "insertrank", version, about = "Rank items by answering \"which of these two?\" questions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start or resume ranking the input items
    Rank(RankArgs),
    /// Show the ranking so far without asking anything
    Status(RankArgs),
    /// Create a default config file at ~/.config/insertrank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Status(args) => run_status(args),
        Commands::Init => {
            let path = config::config_path().unwrap_or_else(|e| bail(e));
            config::create_default_config(&path).unwrap_or_else(|e| bail(e));
            println!("Created config at {}", path.display());
            println!("Edit it to set your input file, sheet and columns.");
        }
    }
}

/// Load config file, merge with CLI args (CLI wins).
fn load_settings(io: &IoArgs) -> Settings {
    let config_path = match &io.config {
        Some(path) => path.clone(),
        None => config::config_path().unwrap_or_else(|e| bail(e)),
    };
    let cfg = config::load_config(&config_path).unwrap_or_else(|e| bail(e));
    let settings = Settings::resolve(io, cfg);
    info!(
        input = %settings.input.display(),
        sheet = %settings.input_sheet,
        columns = ?settings.columns,
        output = %settings.output.display(),
        "resolved settings"
    );
    settings
}

/// Read the item source and the store, and check they still belong together.
fn open_session(settings: &Settings) -> (RankingEngine, SheetStore) {
    let source = FileItemSource::new(
        settings.input.clone(),
        settings.input_sheet.clone(),
        settings.columns.clone(),
        settings.separator.clone(),
    );
    let store = SheetStore::new(
        settings.output.clone(),
        settings.output_sheet.clone(),
        settings.output_column.clone(),
    );

    let engine = RankingEngine::open(&source, &store).unwrap_or_else(|e| match e {
        RankError::NoItems => bail(format!("No items found in {}", source.path().display())),
        other => bail(other),
    });

    let unexpected = engine.unexpected_ranked_items();
    if !unexpected.is_empty() {
        warn!(
            store = %store.path().display(),
            count = unexpected.len(),
            items = ?unexpected,
            "ranking contains items that are not in the matching part of the input; was the input edited?"
        );
    }

    (engine, store)
}

fn run_rank(args: RankArgs) {
    let settings = load_settings(&args.io);
    let (engine, mut store) = open_session(&settings);
    let total = engine.total_items();
    let resumed_from = engine.resumed_from();

    if engine.bootstrapped() {
        eprintln!(
            "Ranking {} items from {} into {}",
            total,
            settings.input.display(),
            store.path().display(),
        );
    } else if !engine.is_complete() {
        eprintln!(
            "Resuming: {}/{} items already ranked in {}",
            resumed_from,
            total,
            store.path().display(),
        );
    }
    if !engine.is_complete() {
        eprintln!(
            "At most {} comparisons to go. Answer q at any time to stop; progress is kept.",
            engine.remaining_comparisons_upper_bound(),
        );
    }

    let stdin = io::stdin();
    if !engine.is_complete() && !stdin.is_terminal() {
        info!("reading answers from non-interactive stdin");
    }

    let mut judge = TerminalComparator::new(stdin.lock(), io::stderr());
    let mut reporter = ProgressReporter::new(resumed_from, total);

    match run_ranking(engine, &mut store, &mut judge, &mut reporter) {
        Ok(outcome) => {
            info!(
                inserted = outcome.inserted,
                comparisons = outcome.comparisons,
                "session finished"
            );
            if args.json {
                output::print_json(&outcome.ranked, total, 0);
            } else {
                output::print_table(&outcome.ranked, total, 0);
            }
        }
        Err(RankError::Comparator(e))
            if matches!(e.downcast_ref::<AdapterError>(), Some(AdapterError::Aborted)) =>
        {
            eprintln!(
                "\nStopped after {} answers. {}/{} items ranked and saved to {}; run again to continue.",
                judge.asked(),
                reporter.ranked(),
                total,
                store.path().display(),
            );
        }
        Err(e) => bail(e),
    }
}

fn run_status(args: RankArgs) {
    let settings = load_settings(&args.io);
    let (engine, store) = open_session(&settings);

    if !store.exists() {
        eprintln!("No ranking at {} yet; showing the starting point.", store.path().display());
    }

    let remaining = engine.remaining_comparisons_upper_bound();
    if args.json {
        output::print_json(engine.ranked(), engine.total_items(), remaining);
    } else {
        output::print_table(engine.ranked(), engine.total_items(), remaining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insertrank_core::{Comparator, Side};
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    /// Prefers the alphabetically earlier label and stops like a user typing
    /// `q` once `budget` answers have been given.
    struct Alphabetical {
        budget: usize,
    }

    impl Comparator for Alphabetical {
        type Error = AdapterError;

        fn ask(&mut self, incumbent: &str, candidate: &str) -> Result<Side, AdapterError> {
            if self.budget == 0 {
                return Err(AdapterError::Aborted);
            }
            self.budget -= 1;
            Ok(if incumbent <= candidate { Side::Incumbent } else { Side::Candidate })
        }
    }

    fn settings_in(dir: &std::path::Path) -> Settings {
        let input = dir.join("input.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Name").unwrap();
        for (row, name) in ["kiwi", "fig", "plum", "apple", "pear"].iter().enumerate() {
            sheet.write_string(row as u32 + 1, 0, *name).unwrap();
        }
        workbook.save(&input).unwrap();

        Settings {
            input,
            input_sheet: "Sheet1".into(),
            columns: vec!["Name".into()],
            separator: " ".into(),
            output: dir.join("output.xlsx"),
            output_sheet: "Sheet1".into(),
            output_column: "Name".into(),
        }
    }

    #[test]
    fn test_interrupted_spreadsheet_session_resumes() {
        let dir = tempdir().unwrap();
        let settings = settings_in(dir.path());

        let (engine, mut store) = open_session(&settings);
        assert!(engine.bootstrapped());
        let err = run_ranking(engine, &mut store, &mut Alphabetical { budget: 3 }, &mut ())
            .unwrap_err();
        assert!(matches!(
            err,
            RankError::Comparator(ref e) if matches!(e.downcast_ref::<AdapterError>(), Some(AdapterError::Aborted))
        ));

        let saved = store.load().unwrap();
        assert!(saved.len() > 1 && saved.len() < 5, "saved {saved:?}");

        let (engine, mut store) = open_session(&settings);
        assert!(!engine.bootstrapped());
        assert_eq!(engine.resumed_from(), saved.len());
        assert!(engine.unexpected_ranked_items().is_empty());

        let outcome = run_ranking(engine, &mut store, &mut Alphabetical { budget: usize::MAX }, &mut ())
            .unwrap();
        let sorted = vec!["apple", "fig", "kiwi", "pear", "plum"];
        assert_eq!(outcome.ranked, sorted);
        assert_eq!(store.load().unwrap(), sorted);
    }
}

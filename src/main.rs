use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use sator::search::{self, SearchConfig, SearchError, SearchStatus};
use sator::word_index::WordIndex;
use sator::word_list::WordList;

/// Sator square generator
#[derive(Parser, Debug)]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about,
    long_about = None
)]
struct Cli {
    /// Path to the word list (one word per line, optionally `word;score`)
    word_list: String,

    /// Grid side; every length from 2 to the longest word when omitted
    #[arg(short, long)]
    length: Option<usize>,

    /// Number of inner rings that may be left unfilled
    #[arg(short = 'k', long, default_value_t = 0)]
    near_miss: usize,

    /// Maximum number of grids to print per length
    #[arg(short = 'n', long)]
    num_results: Option<usize>,

    /// Minimum score filter for `word;score` lines
    #[arg(short = 'm', long, default_value_t = 0)]
    min_score: i32,

    /// Time budget per length, in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

/// Entry point of the Sator CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    let debug_enabled = std::env::var("SATOR_DEBUG").is_ok();
    sator::log::init_logger(debug_enabled);

    log::info!("Starting Sator generator");

    if let Err(e) = try_main() {
        if let Some(search_err) = e.downcast_ref::<SearchError>() {
            eprintln!("Error: {}", search_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Core application logic.
///
/// Steps:
/// 1. Parse CLI arguments with Clap.
/// 2. Load the word list from disk.
/// 3. For each requested length, index the words of that length and print every grid found.
/// 4. Print timings and counts on stderr.
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let t_load = Instant::now();
    let word_list = WordList::load_from_path(&cli.word_list, cli.min_score)?;
    let load_secs = t_load.elapsed().as_secs_f64();
    eprintln!("Loaded {} words in {:.3}s", word_list.len(), load_secs);

    let lengths = match cli.length {
        Some(length) => length..=length,
        None => {
            let max_length = word_list.max_length();
            eprintln!("max_length {max_length}");
            2..=max_length
        }
    };

    for length in lengths {
        let t_solve = Instant::now();
        let index = WordIndex::build(&word_list.words, Some(length));

        let mut config = SearchConfig::new(length).with_near_miss(cli.near_miss);
        if let Some(secs) = cli.timeout {
            config = config.with_time_budget(Duration::from_secs(secs));
        }

        let result = search::generate(&index, &config, cli.num_results)?;
        let solve_secs = t_solve.elapsed().as_secs_f64();

        for (i, grid) in result.grids.iter().enumerate() {
            println!("\n{}\nlength {length} (#{i})", grid.display(&index));
        }

        match result.status {
            SearchStatus::TimedOut { elapsed } => {
                eprintln!("⚠️  length {length}: timed out after {:.1}s; some grids may be missing", elapsed.as_secs_f64());
            }
            SearchStatus::FoundEnough => {
                eprintln!("✓ length {length}: stopped after {} grids", result.grids.len());
            }
            SearchStatus::Exhausted => {
                eprintln!("✓ length {length}: {} grids from {} words in {solve_secs:.3}s", result.grids.len(), index.len());
            }
        }
        if result.abandoned_seeds > 0 {
            eprintln!("  {} seed(s) abandoned, see log", result.abandoned_seeds);
        }
    }

    Ok(())
}

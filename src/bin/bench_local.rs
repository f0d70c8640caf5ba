//! `bench_local.rs`: quick local timing runner (no Criterion)
//!
//! PURPOSE
//! -------
//! - Fast, ad-hoc timing of square generation on *your* machine.
//! - Loads the word list once, then runs each case several times and reports the median.
//! - Index construction is timed together with the search, as the CLI does it once per length.
//!
//! HOW TO RUN
//! ----------
//! - Optimized build:                `cargo run --bin bench_local --release`
//! - Multiple repeats:               `cargo run --bin bench_local --release -- -r 5`
//! - Print a few grids:              `cargo run --bin bench_local --release -- -p 2`
//! - See all flags:                  `cargo run --bin bench_local -- --help`

use clap::Parser;
use std::hint::black_box;
use std::time::Instant;
use sator::grid::Grid;
use sator::search::{self, SearchConfig};
use sator::word_index::WordIndex;
use sator::word_list::WordList;

/// Simple local benchmark runner: load the word list once, time several lengths.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the word list file (one word per line)
    #[arg(
        short,
        long,
        default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sator_words.txt")
    )]
    word_list: String,

    /// Minimum score filter
    #[arg(short = 'm', long, default_value_t = 0)]
    min_score: i32,

    /// Number of repeats per case (use >1 to reduce noise; median is reported)
    #[arg(short = 'r', long = "repeats", default_value_t = 1)]
    num_repeats: usize,

    /// Print up to this many grids per case (0 = print none)
    #[arg(short = 'p', long = "print", default_value_t = 0)]
    print_limit: usize,
}

/// A benchmark case: grid length and near-miss tolerance.
#[derive(Clone)]
struct Case {
    length: usize,
    near_miss: usize,
}

/// Edit/add new cases here.
fn get_cases() -> Vec<Case> {
    vec![
        Case { length: 2, near_miss: 0 },
        Case { length: 3, near_miss: 0 },
        Case { length: 4, near_miss: 0 },
        Case { length: 4, near_miss: 1 },
        Case { length: 5, near_miss: 0 },
        Case { length: 5, near_miss: 1 },
        Case { length: 6, near_miss: 2 },
    ]
}

/// Small helper: robust central tendency for small samples.
fn median(mut xs: Vec<f64>) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len();
    if n % 2 == 1 {
        xs[n / 2]
    } else {
        0.5 * (xs[n / 2 - 1] + xs[n / 2])
    }
}

fn pluralizer(count: usize, singular: &str) -> String {
    if count == 1 {
        singular.to_string()
    } else {
        format!("{singular}s")
    }
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    eprintln!("Loading word list from: {}", cli.word_list);
    let t_load = Instant::now();
    let wl = WordList::load_from_path(&cli.word_list, cli.min_score)?;
    eprintln!("Loaded {} words in {:.3}s", wl.len(), t_load.elapsed().as_secs_f64());

    let mut summary: Vec<(String, f64, usize)> = Vec::new();

    for (idx, case) in get_cases().iter().enumerate() {
        let name = format!("length {} / near-miss {}", case.length, case.near_miss);
        eprintln!("\n[{:02}] {}", idx + 1, name);
        let config = SearchConfig::new(case.length).with_near_miss(case.near_miss);

        let mut times = Vec::with_capacity(cli.num_repeats);
        let mut last: Option<(WordIndex, Vec<Grid>)> = None;

        for rep in 0..cli.num_repeats {
            let t_run = Instant::now();
            let index = WordIndex::build(black_box(&wl.words), Some(case.length));
            let result = match search::generate(&index, &config, None) {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("  ✗ Run {}/{} failed: {}", rep + 1, cli.num_repeats, e.display_detailed());
                    continue;
                }
            };
            let secs = t_run.elapsed().as_secs_f64();
            let _keep = black_box(result.grids.len());

            eprintln!(
                "  run {:>2}/{:>2}: {:.3}s ({} {})",
                rep + 1,
                cli.num_repeats,
                secs,
                result.grids.len(),
                pluralizer(result.grids.len(), "grid")
            );
            times.push(secs);
            last = Some((index, result.grids));
        }

        let med = median(times);
        let count = last.as_ref().map_or(0, |(_, grids)| grids.len());

        if let Some((index, grids)) = &last {
            for grid in grids.iter().take(cli.print_limit) {
                println!("{}\n", grid.display(index));
            }
        }

        eprintln!("  → median {med:.3}s over {} run(s)", cli.num_repeats);
        summary.push((name, med, count));
    }

    eprintln!("\n==== Summary ====");
    eprintln!("{:<28} | {:>10} | {:>7}", "case", "median (s)", "# grids");
    eprintln!("{:-<28}-+-{:-<10}-+-{:-<7}", "", "", "");
    for (name, med, count) in &summary {
        eprintln!("{name:<28} | {med:>10.3} | {count:>7}");
    }

    Ok(())
}

//! The Sator square generator.
//!
//! # Algorithm
//!
//! For a grid of side `N`, every admissible seed word is placed on the middle row
//! (`ceil(N/2) - 1`), its partner on the mirrored row. The search then works outward one ring
//! at a time: at row `pos`, the letters of column `pos - 1` across the rows already placed
//! (`pos .. N - pos`) must reappear, in order, in the word placed on row `pos - 1` starting at
//! column `pos`. That word's partner goes on row `N - pos`, and the search recurses until row
//! `0` is filled.
//!
//! - With an odd `N`, only self-symmetrical words can seed (the centre row has no mirror).
//! - When no word satisfies a ring and `near_miss >= pos`, the partial grid is reported anyway.
//! - Grids holding the same set of words are reported once per run.
//!
//! # Error Handling
//!
//! The generator uses [`SearchError`] with three variants:
//!
//! - S001: `Grid` (Contract fault while placing words (wraps [`GridError`]))
//! - S002: `InvalidLength` (Grid length of zero)
//! - S003: `MismatchedLength` (Index built for a different length)
//!
//! S002 and S003 are returned before the search starts. A grid fault during one seed's
//! exploration is logged and that seed is abandoned; the run goes on with the next seed.
//!
//! # Examples
//!
//! ```
//! use sator::search::{self, SearchConfig};
//! use sator::word_index::WordIndex;
//!
//! let words = ["sator", "arepo", "tenet", "opera", "rotas"];
//! let index = WordIndex::build(&words, Some(5));
//! let result = search::generate(&index, &SearchConfig::new(5), None)?;
//!
//! assert_eq!(result.grids.len(), 1);
//! println!("{}", result.grids[0].display(&index));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::HashSet;
use std::time::Duration;

use instant::Instant;
use log::{debug, error, warn};

use crate::errors::GridError;
use crate::grid::{Grid, GridKey};
use crate::word::{Word, WordId};
use crate::word_index::WordIndex;

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Side of the grid.
    pub length: usize,
    /// How many inner rings may be left unfilled (0 = exact squares only).
    pub near_miss: usize,
    /// Wall-clock limit for the run, if any.
    pub time_budget: Option<Duration>,
}

impl SearchConfig {
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self { length, near_miss: 0, time_budget: None }
    }

    #[must_use]
    pub fn with_near_miss(mut self, near_miss: usize) -> Self {
        self.near_miss = near_miss;
        self
    }

    #[must_use]
    pub fn with_time_budget(mut self, limit: Duration) -> Self {
        self.time_budget = Some(limit);
        self
    }

    /// Row the seed word is placed on.
    #[must_use]
    pub fn middle_pos(&self) -> usize {
        self.length.div_ceil(2).saturating_sub(1)
    }
}

/// Unified error type for the generator.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A placement broke the grid contract.
    #[error("grid fault: {0}")]
    Grid(#[from] GridError),

    /// A grid needs at least one row.
    #[error("invalid grid length: {length}")]
    InvalidLength { length: usize },

    /// The index was filtered to a different word length than the grid side.
    #[error("index built for length {index}, but length {requested} was requested")]
    MismatchedLength { index: usize, requested: usize },
}

impl SearchError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::Grid(_) => "S001",
            SearchError::InvalidLength { .. } => "S002",
            SearchError::MismatchedLength { .. } => "S003",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            SearchError::Grid(_) => "Contract fault while placing words",
            SearchError::InvalidLength { .. } => "Grid length of zero",
            SearchError::MismatchedLength { .. } => "Index built for a different length",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            SearchError::Grid(_) => "A grid placement failed. This wraps an underlying GridError (see Grid Errors section for specific error codes). During a run these are logged and the seed is abandoned.",
            SearchError::InvalidLength { .. } => "The grid side must be at least 1.",
            SearchError::MismatchedLength { .. } => "The word index was built with a fixed length, and the generator was asked for squares of another length. Such an index holds no usable words.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            SearchError::InvalidLength { .. } => Some("Use a length of 2 or more, e.g. '--length 5'"),
            SearchError::MismatchedLength { .. } => Some("Build the index with the same length, or with no fixed length"),
            SearchError::Grid(_) => None, // GridError has its own help
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        match self {
            SearchError::Grid(ge) => {
                // delegate to GridError's detailed display
                format!("{}\n  caused by: {}", self.code(), ge.display_detailed())
            }
            _ => {
                crate::errors::format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
            }
        }
    }
}

/// Status of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// Every seed was explored.
    Exhausted,

    /// Stopped early because the requested number of grids was found.
    FoundEnough,

    /// Stopped because the time budget expired. Contains the elapsed time.
    TimedOut { elapsed: Duration },
}

/// A finished (possibly truncated) run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Grids in discovery order, without duplicates.
    pub grids: Vec<Grid>,
    pub status: SearchStatus,
    /// Seeds dropped because of a grid fault.
    pub abandoned_seeds: usize,
}

impl IntoIterator for SearchResult {
    type Item = Grid;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.grids.into_iter()
    }
}

/// Simple helper to enforce a wall-clock time limit.
#[derive(Debug)]
struct TimeBudget {
    start: Instant,  // when the budget began
    limit: Duration, // maximum allowed elapsed time
}

impl TimeBudget {
    fn new(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    /// Returns true if the allowed time has fully elapsed.
    fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// One level of the depth-first search: a grid filled down to row `pos`, and the words that
/// may go on row `pos - 1`.
#[derive(Debug)]
struct Frame {
    grid: Grid,
    pos: usize,
    candidates: Vec<WordId>,
    next: usize,
}

/// Outcome of placing one word.
enum Node {
    /// Row 0 is filled.
    Complete(Grid),
    /// More rings to go.
    Open(Frame),
}

/// Place `word` on row `pos` of `grid` and collect the candidates for row `pos - 1`.
fn expand(index: &WordIndex, grid: &Grid, word: &Word, pos: usize) -> Result<Node, GridError> {
    let grid = grid.with_word_at(word, pos)?;
    if pos == 0 {
        return Ok(Node::Complete(grid));
    }

    let length = grid.length();
    let required = grid.column_letters(index, pos - 1, pos..length - pos)?;
    let candidates = index
        .words_matching_at(&required, pos, Some(length))
        .filter(|w| w.has_partner())
        .map(Word::id)
        .collect();

    Ok(Node::Open(Frame { grid, pos, candidates, next: 0 }))
}

/// Lazy, pull-based stream of Sator squares for one length.
///
/// Work happens only inside [`Iterator::next`]; dropping the iterator stops the search.
/// Results are deduplicated by [`Grid::key`] across the whole run.
pub struct Squares<'a> {
    index: &'a WordIndex,
    config: SearchConfig,
    seeds: Box<dyn Iterator<Item = &'a Word> + 'a>,
    current_seed: Option<&'a Word>,
    stack: Vec<Frame>,
    seen: HashSet<GridKey>,
    started: Instant,
    budget: Option<TimeBudget>,
    timed_out: bool,
    abandoned: usize,
}

impl<'a> Squares<'a> {
    /// Prepare a run over `index`.
    ///
    /// # Errors
    /// - [`SearchError::InvalidLength`] if `config.length == 0`.
    /// - [`SearchError::MismatchedLength`] if `index` was built for another length.
    pub fn new(index: &'a WordIndex, config: SearchConfig) -> Result<Self, SearchError> {
        let length = config.length;
        if length == 0 {
            return Err(SearchError::InvalidLength { length });
        }
        if let Some(index_length) = index.length() {
            if index_length != length {
                return Err(SearchError::MismatchedLength { index: index_length, requested: length });
            }
        }

        let odd = length % 2 == 1;
        let seeds = index
            .words_of_length(length)
            .filter(move |w| !odd || w.is_symmetrical());

        Ok(Squares {
            index,
            budget: config.time_budget.map(TimeBudget::new),
            config,
            seeds: Box::new(seeds),
            current_seed: None,
            stack: Vec::new(),
            seen: HashSet::new(),
            started: Instant::now(),
            timed_out: false,
            abandoned: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// True once the time budget stopped the run.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Number of seeds dropped because of a grid fault.
    #[must_use]
    pub fn abandoned_seeds(&self) -> usize {
        self.abandoned
    }

    /// Time since the run was prepared.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn handle(&mut self, step: Result<Node, GridError>) -> Option<Grid> {
        match step {
            Ok(Node::Complete(grid)) => self.emit(grid),
            Ok(Node::Open(frame)) => {
                self.stack.push(frame);
                None
            }
            Err(e) => {
                self.abandon(&e);
                None
            }
        }
    }

    /// Report `grid` unless an equivalent grid was already reported.
    fn emit(&mut self, grid: Grid) -> Option<Grid> {
        if self.seen.insert(grid.key(self.index)) {
            Some(grid)
        } else {
            debug!("skipping duplicate grid:\n{}", grid.display(self.index));
            None
        }
    }

    /// Drop the rest of the current seed's exploration.
    fn abandon(&mut self, e: &GridError) {
        let seed = self.current_seed.map_or("?", Word::original);
        let state = self
            .stack
            .last()
            .map(|frame| frame.grid.render(self.index))
            .unwrap_or_default();
        error!(
            "abandoning seed '{seed}': {}\ngrid when the error occurred:\n{state}",
            e.display_detailed()
        );
        self.stack.clear();
        self.abandoned += 1;
    }

    fn budget_expired(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if self.budget.as_ref().is_some_and(TimeBudget::expired) {
            warn!(
                "time budget expired after {:.1}s; stopping the search for length {}",
                self.elapsed().as_secs_f64(),
                self.config.length
            );
            self.timed_out = true;
            self.stack.clear();
        }
        self.timed_out
    }
}

impl Iterator for Squares<'_> {
    type Item = Grid;

    fn next(&mut self) -> Option<Grid> {
        let index = self.index;
        loop {
            if self.budget_expired() {
                return None;
            }

            let Some(frame) = self.stack.last_mut() else {
                // start the next seed, or finish
                let seed = self.seeds.next()?;
                debug!("seed '{seed}'");
                self.current_seed = Some(seed);
                let empty = Grid::new(self.config.length);
                let step = expand(index, &empty, seed, self.config.middle_pos());
                if let Some(grid) = self.handle(step) {
                    return Some(grid);
                }
                continue;
            };

            let candidate = frame.candidates.get(frame.next).copied();
            match candidate {
                Some(candidate) => {
                    frame.next += 1;
                    let step = expand(index, &frame.grid, index.word(candidate), frame.pos - 1);
                    if let Some(grid) = self.handle(step) {
                        return Some(grid);
                    }
                }
                None => {
                    let Some(frame) = self.stack.pop() else { continue };
                    // dead end: report the partial grid if the hole is small enough
                    if frame.candidates.is_empty() && self.config.near_miss >= frame.pos {
                        if let Some(grid) = self.emit(frame.grid) {
                            return Some(grid);
                        }
                    }
                }
            }
        }
    }
}

/// Collect Sator squares from `index`.
///
/// Stops after `max_results` grids (`None` = exhaustive), or when the configured time budget
/// expires. Grids found before a timeout are kept.
///
/// # Errors
/// Returns a [`SearchError`] if the configuration does not fit the index. Faults inside the
/// search itself are logged and counted in [`SearchResult::abandoned_seeds`].
pub fn generate(
    index: &WordIndex,
    config: &SearchConfig,
    max_results: Option<usize>,
) -> Result<SearchResult, SearchError> {
    let mut squares = Squares::new(index, config.clone())?;
    let limit = max_results.unwrap_or(usize::MAX);
    let mut grids = Vec::new();

    let status = loop {
        if grids.len() >= limit {
            break SearchStatus::FoundEnough;
        }
        match squares.next() {
            Some(grid) => grids.push(grid),
            None if squares.timed_out() => {
                break SearchStatus::TimedOut { elapsed: squares.elapsed() };
            }
            None => break SearchStatus::Exhausted,
        }
    };

    debug!(
        "length {}: {} grid(s), status {:?}, {:.3}s",
        config.length,
        grids.len(),
        status,
        squares.elapsed().as_secs_f64()
    );

    Ok(SearchResult { grids, status, abandoned_seeds: squares.abandoned_seeds() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SATOR: [&str; 5] = ["sator", "arepo", "tenet", "opera", "rotas"];

    fn rows(grid: &Grid, index: &WordIndex) -> Vec<String> {
        grid.rows(index)
            .into_iter()
            .map(|w| w.map_or_else(|| "-".repeat(grid.length()), |w| w.normalized().to_string()))
            .collect()
    }

    #[test]
    fn test_middle_pos() {
        assert_eq!(SearchConfig::new(1).middle_pos(), 0);
        assert_eq!(SearchConfig::new(2).middle_pos(), 0);
        assert_eq!(SearchConfig::new(4).middle_pos(), 1);
        assert_eq!(SearchConfig::new(5).middle_pos(), 2);
        assert_eq!(SearchConfig::new(6).middle_pos(), 2);
    }

    #[test]
    fn test_config_builders() {
        let config = SearchConfig::new(5)
            .with_near_miss(2)
            .with_time_budget(Duration::from_secs(3));
        assert_eq!(config.length, 5);
        assert_eq!(config.near_miss, 2);
        assert_eq!(config.time_budget, Some(Duration::from_secs(3)));
        assert_eq!(SearchConfig::new(4).near_miss, 0);
    }

    #[test]
    fn test_classic_sator_square() {
        let index = WordIndex::build(&SATOR, Some(5));
        let result = generate(&index, &SearchConfig::new(5), None).unwrap();

        assert_eq!(result.status, SearchStatus::Exhausted);
        assert_eq!(result.grids.len(), 1);
        assert_eq!(rows(&result.grids[0], &index), vec!["sator", "arepo", "tenet", "opera", "rotas"]);
    }

    #[test]
    fn test_odd_length_needs_symmetrical_seed() {
        // no palindrome of length 5: nothing can sit on the centre row
        let index = WordIndex::build(&["sator", "rotas", "arepo", "opera"], Some(5));
        let result = generate(&index, &SearchConfig::new(5).with_near_miss(2), None).unwrap();
        assert!(result.grids.is_empty());
    }

    #[test]
    fn test_exact_search_without_candidates_yields_nothing() {
        let index = WordIndex::build(&["anna", "anani"], Some(4));
        let result = generate(&index, &SearchConfig::new(4), None).unwrap();
        assert!(result.grids.is_empty());
        assert_eq!(result.status, SearchStatus::Exhausted);
    }

    #[test]
    fn test_near_miss_yields_partial_grid() {
        let index = WordIndex::build(&["anna", "anani"], Some(4));
        let result = generate(&index, &SearchConfig::new(4).with_near_miss(1), None).unwrap();
        assert_eq!(result.grids.len(), 1);
        assert_eq!(rows(&result.grids[0], &index), vec!["----", "anna", "anna", "----"]);
        assert!(!result.grids[0].is_complete());
    }

    #[test]
    fn test_two_by_two() {
        let index = WordIndex::build(&["ab", "ba", "cd"], Some(2));
        let result = generate(&index, &SearchConfig::new(2), None).unwrap();
        // [ab, ba] and [ba, ab] hold the same words
        assert_eq!(result.grids.len(), 1);
        assert_eq!(rows(&result.grids[0], &index), vec!["ab", "ba"]);
    }

    #[test]
    fn test_single_letter_grid() {
        let index = WordIndex::build(&["a", "b"], Some(1));
        let result = generate(&index, &SearchConfig::new(1), None).unwrap();
        assert_eq!(result.grids.len(), 2);
    }

    #[test]
    fn test_max_results() {
        let index = WordIndex::build(&["a", "b", "c"], Some(1));
        let result = generate(&index, &SearchConfig::new(1), Some(2)).unwrap();
        assert_eq!(result.grids.len(), 2);
        assert_eq!(result.status, SearchStatus::FoundEnough);
    }

    #[test]
    fn test_zero_time_budget_times_out() {
        let index = WordIndex::build(&SATOR, Some(5));
        let config = SearchConfig::new(5).with_time_budget(Duration::ZERO);
        let result = generate(&index, &config, None).unwrap();
        assert!(result.grids.is_empty());
        assert!(matches!(result.status, SearchStatus::TimedOut { .. }));
    }

    #[test]
    fn test_invalid_length() {
        let index = WordIndex::build(&SATOR, None);
        let err = generate(&index, &SearchConfig::new(0), None).unwrap_err();
        assert!(matches!(err, SearchError::InvalidLength { length: 0 }));
        assert_eq!(err.code(), "S002");
    }

    #[test]
    fn test_mismatched_length() {
        let index = WordIndex::build(&SATOR, Some(5));
        let err = generate(&index, &SearchConfig::new(4), None).unwrap_err();
        assert!(matches!(err, SearchError::MismatchedLength { index: 5, requested: 4 }));
    }

    #[test]
    fn test_unfixed_index_is_accepted() {
        let mut words = SATOR.to_vec();
        words.extend(["ab", "ba", "level"]);
        let index = WordIndex::build(&words, None);
        let result = generate(&index, &SearchConfig::new(5), None).unwrap();
        assert_eq!(result.grids.len(), 1);
    }

    #[test]
    fn test_grid_fault_abandons_seed_and_continues() {
        let index = WordIndex::build(&["a", "b", "lemon"], None);
        let mut squares = Squares::new(&index, SearchConfig::new(1)).unwrap();

        // an unpartnered word can never be placed
        let lemon = index.get("lemon").unwrap();
        let step = expand(&index, &Grid::new(1), lemon, 0);
        assert!(matches!(step, Err(GridError::Unpartnered { .. })));
        assert!(squares.handle(step).is_none());
        assert_eq!(squares.abandoned_seeds(), 1);

        // the run itself is unaffected
        assert_eq!(squares.count(), 2);
    }

    #[test]
    fn test_squares_is_lazy() {
        let index = WordIndex::build(&["a", "b", "c"], Some(1));
        let mut squares = Squares::new(&index, SearchConfig::new(1)).unwrap();
        let first = squares.next().unwrap();
        assert_eq!(index.word(first.get(0).unwrap()).original(), "a");
        // remaining seeds are still pending
        assert_eq!(squares.count(), 2);
    }

    #[test]
    fn test_error_display_detailed() {
        let err = SearchError::Grid(GridError::Unpartnered { word: "lemon".to_string() });
        let detailed = err.display_detailed();
        assert!(detailed.starts_with("S001"));
        assert!(detailed.contains("E001"));

        let err = SearchError::InvalidLength { length: 0 };
        assert!(err.display_detailed().contains("(S002)"));
        assert!(err.help().is_some());
    }
}

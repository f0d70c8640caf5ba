//! `Grid`: an N×N Sator square under construction.
//!
//! A grid stores one optional word handle per row. Placing a word at row `p` also places its
//! reverse partner at row `N-1-p`, except on the centre row of an odd grid, which holds a single
//! self-symmetrical word. Placement is copy-on-write ([`Grid::with_word_at`]) so sibling
//! branches of the search never see each other's rows.

use std::collections::BTreeSet;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::Range;

use crate::errors::GridError;
use crate::word::{Word, WordId};
use crate::word_index::WordIndex;

/// Filler used when rendering an empty row.
pub const EMPTY_CELL: char = '-';
/// Separator between letters when rendering a row.
const CELL_SEPARATOR: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    length: usize,
    slots: Vec<Option<WordId>>,
}

/// Order- and duplicate-independent identity of a grid: the set of normalized forms it holds.
///
/// Two grids holding the same words in a different row order share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey(BTreeSet<String>);

impl GridKey {
    /// Normalized forms in the key, sorted.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Grid {
    /// An empty grid of side `length`.
    #[must_use]
    pub fn new(length: usize) -> Grid {
        Grid { length, slots: vec![None; length] }
    }

    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Word handle in row `position`, `None` if the row is empty or out of range.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<WordId> {
        self.slots.get(position).copied().flatten()
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<WordId>] {
        &self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<WordId>> + '_ {
        self.slots.iter().copied()
    }

    /// True when every row holds a word.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Row `position` mirrors row `length - 1 - position`; the centre of an odd grid mirrors itself.
    #[must_use]
    pub fn mirror(&self, position: usize) -> usize {
        self.length - 1 - position
    }

    /// Copy of this grid with `word` at `position` and its partner at the mirrored row.
    ///
    /// # Errors
    /// - [`GridError::Unpartnered`] if `word` has no reverse partner.
    /// - [`GridError::PositionOutOfRange`] if `position >= length`.
    pub fn with_word_at(&self, word: &Word, position: usize) -> Result<Grid, GridError> {
        let mut grid = self.clone();
        grid.place(word, position)?;
        Ok(grid)
    }

    fn place(&mut self, word: &Word, position: usize) -> Result<(), GridError> {
        let Some(partner) = word.partner() else {
            return Err(GridError::Unpartnered { word: word.original().to_string() });
        };
        if position >= self.length {
            return Err(GridError::PositionOutOfRange { position, length: self.length });
        }

        self.slots[position] = Some(word.id());
        if 2 * position + 1 != self.length {
            let mirror = self.mirror(position);
            self.slots[mirror] = Some(partner);
        }
        Ok(())
    }

    /// Resolve every row against `index`.
    #[must_use]
    pub fn rows<'a>(&self, index: &'a WordIndex) -> Vec<Option<&'a Word>> {
        self.slots.iter().map(|slot| slot.map(|id| index.word(id))).collect()
    }

    /// Letters at `column` of the filled rows in `rows`, read top to bottom.
    ///
    /// Empty rows are skipped.
    ///
    /// # Errors
    /// [`GridError::ShortRow`] if a filled row has no letter at `column`.
    pub fn column_letters(
        &self,
        index: &WordIndex,
        column: usize,
        rows: Range<usize>,
    ) -> Result<String, GridError> {
        let end = rows.end.min(self.length);
        self.slots[rows.start.min(end)..end]
            .iter()
            .flatten()
            .map(|&id| {
                let word = index.word(id);
                word.letter_at(column).ok_or_else(|| GridError::ShortRow {
                    word: word.original().to_string(),
                    column,
                })
            })
            .collect()
    }

    /// The order/duplicate-independent identity used to deduplicate results.
    #[must_use]
    pub fn key(&self, index: &WordIndex) -> GridKey {
        GridKey(
            self.slots
                .iter()
                .flatten()
                .map(|&id| index.word(id).normalized().to_string())
                .collect(),
        )
    }

    /// Whether two grids hold the same set of words, regardless of row order.
    #[must_use]
    pub fn is_equivalent(&self, other: &Grid, index: &WordIndex) -> bool {
        self.key(index) == other.key(index)
    }

    /// Render the grid as text, one row per line.
    ///
    /// Filled rows are spelled out letter by letter in uppercase (original spelling); empty rows
    /// are a run of [`EMPTY_CELL`].
    #[must_use]
    pub fn render(&self, index: &WordIndex) -> String {
        self.display(index).to_string()
    }

    /// `Display` adapter that resolves words through `index`.
    #[must_use]
    pub fn display<'a>(&'a self, index: &'a WordIndex) -> GridDisplay<'a> {
        GridDisplay { grid: self, index }
    }
}

/// Formats a [`Grid`] with access to the index that owns its words.
pub struct GridDisplay<'a> {
    grid: &'a Grid,
    index: &'a WordIndex,
}

impl Display for GridDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, row) in self.grid.rows(self.index).into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = match row {
                Some(word) => word.original().chars().map(|c| c.to_uppercase().to_string()).collect(),
                None => vec![EMPTY_CELL.to_string(); self.grid.length],
            };
            write!(f, "{}", cells.join(CELL_SEPARATOR))?;
        }
        Ok(())
    }
}

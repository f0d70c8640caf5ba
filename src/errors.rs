//! Error types for grid placement with error codes and helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code (E001-E003) for documentation lookup:
//!
//! - E001: `Unpartnered` (Word placed without a reverse partner)
//! - E002: `PositionOutOfRange` (Row index outside the grid)
//! - E003: `ShortRow` (Placed row too short for the column being read)
//!
//! All three are contract faults: the generator only hands partnered words of the right
//! length to the grid, so seeing one of them means a bug (or a malformed index), not bad
//! user input.
//!
//! # Examples
//!
//! ```
//! use sator::errors::GridError;
//!
//! let err = GridError::Unpartnered { word: "lemon".to_string() };
//! assert_eq!(err.code(), "E001");
//! println!("{}", err.display_detailed());
//! ```

use std::io;

/// Contract faults raised while placing words in a [`Grid`](crate::grid::Grid).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("word \"{word}\" has no reverse partner")]
    Unpartnered { word: String },

    #[error("row {position} is outside a grid of length {length}")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("row \"{word}\" has no letter at column {column}")]
    ShortRow { word: String, column: usize },
}

impl From<GridError> for io::Error {
    fn from(ge: GridError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, ge.to_string())
    }
}

impl GridError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            GridError::Unpartnered { .. } => "E001",
            GridError::PositionOutOfRange { .. } => "E002",
            GridError::ShortRow { .. } => "E003",
        }
    }

    /// Returns a short description of this error type (for documentation)
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            GridError::Unpartnered { .. } => "Word placed without a reverse partner",
            GridError::PositionOutOfRange { .. } => "Row index outside the grid",
            GridError::ShortRow { .. } => "Placed row too short for the column being read",
        }
    }

    /// Returns detailed explanation of this error type (for documentation)
    #[must_use]
    pub fn details(&self) -> &'static str {
        match self {
            GridError::Unpartnered { .. } => "Placing a word also places its reverse partner in the mirrored row. A word whose reversal is not in the word list cannot be placed.",
            GridError::PositionOutOfRange { .. } => "A row index must be smaller than the grid length.",
            GridError::ShortRow { .. } => "The letter constraint for the next ring is read from a column of the rows already placed. Every placed row must be as long as the grid.",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            GridError::Unpartnered { .. } => Some("Only words returned by `WordIndex::words_of_length` (or filtered on `Word::has_partner`) can be placed"),
            GridError::ShortRow { .. } => Some("Build the index with a fixed length equal to the grid length"),
            GridError::PositionOutOfRange { .. } => None,
        }
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(base_msg: &str, code: &str, help: Option<&str>) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}

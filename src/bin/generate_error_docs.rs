//! Generate error code documentation from the source of truth (error enums).
//!
//! This binary reads the error codes, descriptions, details, and help text
//! directly from the `GridError` and `SearchError` implementations via their
//! `code()`, `description()`, `details()`, and `help()` methods.
//!
//! Run with:
//! ```bash
//! cargo run --bin generate_error_docs > docs/ERROR_CODES.md
//! ```

use sator::errors::GridError;
use sator::search::SearchError;

/// Macro to generate error documentation for any error type
/// with `code()`, `description()`, `details()`, `help()`, and `display_detailed()` methods
macro_rules! generate_error_docs {
    ($errors:expr) => {
        for error in $errors {
            println!("### {}: {}\n", error.code(), error.description());
            println!("**Details:** {}\n", error.details());

            if let Some(help_text) = error.help() {
                println!("**How to fix:**");
                println!("```");
                println!("{}", help_text);
                println!("```\n");
            }

            println!("**Example error message:**");
            println!("```");
            println!("{}", error);
            println!("```\n");

            println!("**Detailed format:**");
            println!("```");
            println!("{}", error.display_detailed());
            println!("```\n");

            println!("---\n");
        }
    };
}

/// One of each `GridError` variant
fn all_grid_error_variants() -> Vec<GridError> {
    vec![
        GridError::Unpartnered { word: "lemon".to_string() },
        GridError::PositionOutOfRange { position: 5, length: 5 },
        GridError::ShortRow { word: "ab".to_string(), column: 3 },
    ]
}

/// One of each `SearchError` variant
fn all_search_error_variants() -> Vec<SearchError> {
    vec![
        SearchError::Grid(GridError::Unpartnered { word: "lemon".to_string() }),
        SearchError::InvalidLength { length: 0 },
        SearchError::MismatchedLength { index: 5, requested: 4 },
    ]
}

fn main() {
    println!("# Error Code Reference\n");
    println!("**⚠️ This document is auto-generated from the source code. Do not edit manually.**\n");

    println!("## Table of Contents\n");
    println!("- [Search Errors (S001–S003)](#search-errors)");
    println!("- [Grid Errors (E001–E003)](#grid-errors)\n");

    println!("## Search Errors\n");
    println!("Top-level errors from the generator. These wrap grid errors or reject a configuration.\n");
    generate_error_docs!(all_search_error_variants());

    println!("## Grid Errors\n");
    println!("Contract faults raised while placing words in a grid. During a run they abandon one seed.\n");
    generate_error_docs!(all_grid_error_variants());
}

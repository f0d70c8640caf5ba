//! `word_list`: load the raw words the generator works from.
//!
//! The input is plain text, one word per line. A line may carry a score after a semicolon
//! (`word;score`, the usual crossword-list format); scored lines under `min_score` are
//! dropped, unscored lines are always kept.
//!
//! Unlike crossword tooling, the words are **not** lowercased: the original spelling (case and
//! accents) is what gets printed in the squares. Matching uses the normalized form computed
//! later by [`Word`](crate::word::Word).

/// A processed, ready-to-index word list.
///
/// `words` is deduplicated and sorted in code-point order.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    /// Example: `["arepo", "opera", "rotas", "sator", "tenet"]`
    pub words: Vec<String>,
}

impl WordList {
    /// Parse a word list from an in-memory string.
    ///
    /// # Behavior:
    /// 1. Splits the input into lines and trims each one.
    /// 2. Skips empty lines.
    /// 3. For `word;score` lines, skips unparsable scores and scores below `min_score`.
    /// 4. Deduplicates and sorts.
    #[must_use]
    pub fn parse_from_str(contents: &str, min_score: i32) -> WordList {
        let mut words: Vec<String> = contents
            .lines()
            .filter_map(|raw_line| {
                let line = raw_line.trim();

                if line.is_empty() {
                    None
                } else if let Some((word_raw, score_raw)) = line.split_once(';') {
                    let score: i32 = score_raw.trim().parse().ok()?;
                    let word = word_raw.trim();
                    (score >= min_score && !word.is_empty()).then(|| word.to_string())
                } else {
                    Some(line.to_string())
                }
            })
            .collect();

        // `dedup()` only removes adjacent duplicates, so sort first
        words.sort();
        words.dedup();

        WordList { words }
    }

    /// Read from a file path and parse.
    ///
    /// # Errors
    ///
    /// Will return an `Error` if unable to read a file at `path`.
    pub fn load_from_path<P: AsRef<std::path::Path>>(
        path: P,
        min_score: i32,
    ) -> std::io::Result<WordList> {
        let path_ref = path.as_ref();

        // `read_to_string` enforces UTF-8
        let data = std::fs::read_to_string(path_ref).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("failed to read word list from '{}': {}", path_ref.display(), e)
            )
        })?;

        Ok(Self::parse_from_str(&data, min_score))
    }

    /// Length in characters of the longest word, 0 for an empty list.
    #[must_use]
    pub fn max_length(&self) -> usize {
        self.words.iter().map(|w| w.chars().count()).max().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

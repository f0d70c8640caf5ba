//! Accent folding used for every comparison, index key and length in the crate.

/// Accented letters and their ASCII replacement.
///
/// Only `Á` is folded to lowercase; every other letter keeps its case.
pub(crate) const ACCENT_FOLDS: [(char, char); 9] = [
    ('á', 'a'),
    ('é', 'e'),
    ('í', 'i'),
    ('ó', 'o'),
    ('ú', 'u'),
    ('ü', 'u'),
    ('î', 'i'),
    ('ö', 'o'),
    ('Á', 'a'),
];

/// Fold a single character. Characters outside [`ACCENT_FOLDS`] are returned unchanged.
#[inline]
#[must_use]
pub fn fold_char(c: char) -> char {
    ACCENT_FOLDS
        .iter()
        .find_map(|&(from, to)| (from == c).then_some(to))
        .unwrap_or(c)
}

/// Strip the known accents from `s`.
///
/// The mapping is one character to one character, so the result has the same
/// number of chars as the input.
#[must_use]
pub fn normalize(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Character-wise reversal.
#[must_use]
pub fn reverse(s: &str) -> String {
    s.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize("canción"), "cancion");
        assert_eq!(normalize("pingüino"), "pinguino");
        assert_eq!(normalize("áéíóú"), "aeiou");
        assert_eq!(normalize("îö"), "io");
    }

    #[test]
    fn test_uppercase_a_acute_folds_to_lowercase() {
        assert_eq!(normalize("Á"), "a");
        assert_eq!(normalize("a"), "a");
        assert_eq!(normalize("Ábaco"), "abaco");
    }

    #[test]
    fn test_other_case_is_untouched() {
        assert_eq!(normalize("SATOR"), "SATOR");
        // uppercase accented letters other than Á are not in the table
        assert_eq!(normalize("É"), "É");
    }

    #[test]
    fn test_unlisted_characters_survive() {
        assert_eq!(normalize("año"), "año");
        assert_eq!(normalize("naïve"), "naïve");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for s in ["árbol", "Ánfora", "pingüino", "tenet", "ñandú", "", "ÁÁá"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_normalize_preserves_char_count() {
        for s in ["árbol", "pingüino", "Ángel", "ñandú"] {
            assert_eq!(normalize(s).chars().count(), s.chars().count());
        }
    }

    #[test]
    fn test_reverse() {
        assert_eq!(reverse("sator"), "rotas");
        assert_eq!(reverse("ñandu"), "udnañ");
        assert_eq!(reverse(""), "");
    }
}

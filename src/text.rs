//! Accent folding for tolerant header comparison.

use unicode_normalization::UnicodeNormalization;

/// Remove diacritics, keeping only the ASCII part of each decomposed character.
///
/// `"PRECIPITAÇÃO"` becomes `"PRECIPITACAO"`. Characters with no ASCII base
/// (e.g. `º`) are dropped.
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Uppercase and fold accents, for substring checks such as `PRECIP`
pub fn normalize_for_match(text: &str) -> String {
    strip_accents(&text.to_uppercase())
}

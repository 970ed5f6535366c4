//! Content policy for catalog descriptions

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Explicit-content terms (English and Portuguese)
///
/// Matched as folded substrings, so short terms also hit longer words
/// ("sex" matches "Essex"). Known limitation, kept as is.
pub const BANNED_TERMS: &[&str] = &[
    "sex",
    "porn",
    "pornography",
    "xxx",
    "erotic",
    "sexual",
    "nudity",
    "sexo",
    "pornô",
    "erótico",
    "adulto",
    "nudez",
    "porno",
];

/// Maturity rating value that rejects a volume
pub const MATURE_RATING: &str = "MATURE";

/// Fold text for policy comparison
///
/// - Unicode canonical decomposition (NFD)
/// - Removes combining marks (diacritics)
/// - Converts to lowercase
pub fn fold_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// First banned term contained in the text, if any
pub fn find_banned_term(text: &str) -> Option<&'static str> {
    let folded = fold_text(text);
    BANNED_TERMS
        .iter()
        .copied()
        .find(|term| folded.contains(&fold_text(term)))
}

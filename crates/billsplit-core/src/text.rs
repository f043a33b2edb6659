//! Text normalization shared by the Pix encoder and the avatar classifier.

use unicode_normalization::UnicodeNormalization;

/// Combining Diacritical Marks block (U+0300..=U+036F).
fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Decomposes to NFD and drops combining diacritics: `"São"` → `"Sao"`.
///
/// Characters without a decomposition (e.g. `ß`, `€`) pass through unchanged.
pub fn strip_diacritics(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect()
}

/// Takes the first `max_chars` characters (not bytes).
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => &input[..idx],
        None => input,
    }
}

/// Minimum number of characters for a run to count as a term
const MIN_TERM_CHARS: usize = 2;

#[inline]
fn is_term_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split interest text into case-folded terms
///
/// A term is a maximal run of word characters (alphanumeric or `_`) at
/// least two characters long. Everything else separates terms, so
/// `"Chess, music"` and `"music chess"` yield the same bag of words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_term_char(c))
        .filter(|run| run.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_string)
        .collect()
}

//! Keyword matching over clinical free text.

const NEGATION_CUES: &[&str] = &["no", "denies", "denied", "without", "not", "negative"];

// Words that end a negation's scope ("no relief after physical therapy")
const SCOPE_BREAKS: &[&str] = &[
    "and", "but", "after", "despite", "although", "though", "however", "yet", "except",
];

/// A cue negates at most this many words back, itself included
const NEGATION_WINDOW: usize = 4;

/// Whether a negation cue just before the end of `prefix` covers what follows
fn is_negated(prefix: &str) -> bool {
    let clause_start = prefix
        .rfind(|c: char| matches!(c, '.' | ';' | ',' | '\n'))
        .map_or(0, |i| i + 1);
    prefix[clause_start..]
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .rev()
        .take_while(|word| !SCOPE_BREAKS.contains(word))
        .take(NEGATION_WINDOW)
        .any(|word| NEGATION_CUES.contains(&word))
}

/// True when `keyword` occurs in lower-cased `text` at least once without a
/// negation cue shortly before it ("no fever", "denies numbness").
pub fn mentions(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword)
        .any(|(idx, _)| !is_negated(&text[..idx]))
}

/// True when `word` appears in `text` as a whole alphanumeric token
pub fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

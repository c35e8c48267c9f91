//! Shared text patterns.
//!
//! Used by verdict classification (deceptive-framing concerns) and by the
//! model-output decoder (locating the JSON payload inside surrounding prose).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Concern wording that flags deceptive framing rather than plain falsehood.
    pub static ref DECEPTIVE_FRAMING_PATTERN: Regex = Regex::new(
        r"(?i)\b(mislead\w*|decepti\w*|out[- ]of[- ]context|framing|framed|sensational\w*|exaggerat\w*|clickbait|manipulat\w*|cherry[- ]?pick\w*|distort\w*|spin)\b"
    ).unwrap();

    /// Greedy span from the first `{` to the last `}` across lines.
    pub static ref JSON_OBJECT_PATTERN: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Words that cancel a framing term appearing shortly after them.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "nothing", "without", "neither", "nor", "hardly", "cannot", "can't",
    "isn't", "isnt", "aren't", "wasn't", "weren't", "doesn't", "don't", "didn't",
];

/// "not only misleading" still asserts the framing.
const NEGATION_BREAKERS: &[&str] = &["only", "just", "merely"];

/// Conjunctions that start a new clause for negation purposes.
const CONTRASTIVES: &[&str] = &["but", "yet", "though", "although", "however"];

/// How many words before a framing term are searched for a negator.
const NEGATION_WINDOW: usize = 4;

fn normalize_word(word: &str) -> String {
    word.replace('\u{2019}', "'")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Whether the text leading up to a framing term negates it.
///
/// Only the current clause counts, so "No sources; misleading headline"
/// still flags.
fn is_negated(prefix: &str) -> bool {
    let clause = prefix
        .rsplit(|c: char| matches!(c, ',' | ';' | ':' | '.' | '!' | '?' | '(' | ')'))
        .next()
        .unwrap_or(prefix);

    // Nearest word first
    let words: Vec<String> = clause
        .split_whitespace()
        .rev()
        .take(NEGATION_WINDOW)
        .map(normalize_word)
        .take_while(|w| !CONTRASTIVES.contains(&w.as_str()))
        .collect();

    words.iter().enumerate().any(|(i, word)| {
        NEGATORS.contains(&word.as_str())
            && !(i > 0 && NEGATION_BREAKERS.contains(&words[i - 1].as_str()))
    })
}

/// Whether a single concern flags deceptive framing.
///
/// A framing term preceded within a few words by a negator ("not
/// misleading", "without exaggeration") does not count.
pub fn flags_deceptive_framing(concern: &str) -> bool {
    DECEPTIVE_FRAMING_PATTERN
        .find_iter(concern)
        .any(|m| !is_negated(&concern[..m.start()]))
}

/// Whether any concern in the list flags deceptive framing.
pub fn any_deceptive_framing<S: AsRef<str>>(concerns: &[S]) -> bool {
    concerns.iter().any(|c| flags_deceptive_framing(c.as_ref()))
}

/// Locate the JSON object inside free-form model output.
///
/// Returns the first `{` that starts a complete JSON object, so code fences
/// and prose on either side (braces included) are tolerated. When nothing
/// parses, the greedy first-`{`-to-last-`}` span is returned for the decoder
/// to reject.
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .find_map(|(start, _)| leading_object(&text[start..]))
        .or_else(|| JSON_OBJECT_PATTERN.find(text).map(|m| m.as_str()))
}

/// The JSON object at the very start of `text`, if it parses.
fn leading_object(text: &str) -> Option<&str> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<serde_json::Value>();
    match stream.next() {
        Some(Ok(serde_json::Value::Object(_))) => Some(&text[..stream.byte_offset()]),
        _ => None,
    }
}

//! Transcript rewriting: spoken extension repair and filename substitution
//!
//! Stateless over `(&str, &FileIndex)`; the index snapshot is owned by
//! [`crate::index::TreeIndex`] and passed in. Nothing here is fallible: a
//! rewrite always yields best-effort output, and an empty index makes every
//! call an identity transform.

use crate::index::FileIndex;
use regex::{NoExpand, Regex};
use serde::Serialize;
use tracing::debug;

/// Marker prepended to substituted paths so downstream text consumers can
/// tell a resolved file reference apart from conversational words.
pub const PATH_MARKER: char = '@';

/// Spoken renderings that diverge from plain letter spelling, matched in
/// addition to the generic per-letter pattern for the same extension.
const IRREGULAR_SPOKEN_FORMS: &[(&str, &str)] = &[
    ("json", "j son"),
    ("html", "h t m l"),
    ("tsx", "t s x"),
];

/// Outcome of one transcript rewrite.
#[derive(Debug, Clone, Serialize)]
pub struct Rewrite {
    pub text: String,
    /// True when at least one normalization or substitution fired.
    pub changed: bool,
}

/// Rewrite spoken file references in `text` into `@`-marked canonical paths.
///
/// Two passes: spoken extension patterns ("main dot p y") are repaired into
/// literal extensions for every extension present in the index, then index
/// keys appearing as case-insensitive whole words are substituted with their
/// canonical paths.
pub fn rewrite_transcript(text: &str, index: &FileIndex) -> Rewrite {
    if text.is_empty() || index.is_empty() {
        return Rewrite {
            text: text.to_string(),
            changed: false,
        };
    }

    let mut result = text.to_string();
    for ext in index.extensions() {
        result = normalize_spoken_extension(&result, &ext);
    }
    result = substitute_filenames(&result, index);

    let changed = result != text;
    Rewrite {
        text: result,
        changed,
    }
}

/// Repair spoken renderings of one extension: "name dot p y" -> "name.py".
/// The generic letter-spelled form always applies; irregular phonetic forms
/// apply on top for the extensions that have one.
fn normalize_spoken_extension(text: &str, ext: &str) -> String {
    let spelled: Vec<String> = ext.chars().map(|c| c.to_string()).collect();
    let mut result = apply_spoken_form(text, ext, &spelled.join(" "));

    for (irregular_ext, form) in IRREGULAR_SPOKEN_FORMS {
        if *irregular_ext == ext {
            result = apply_spoken_form(&result, ext, form);
        }
    }

    result
}

/// Rewrite `<word-sequence> dot <spoken form>` into `<word-sequence>.<ext>`.
/// The leading capture accepts a single word or a multi-word phrase, so
/// humanized filenames ("user profile dot t s x") survive normalization.
fn apply_spoken_form(text: &str, ext: &str, spoken_form: &str) -> String {
    let Some(pattern) = spoken_form_pattern(spoken_form) else {
        return text.to_string();
    };
    pattern
        .replace_all(text, format!("${{1}}.{ext}").as_str())
        .into_owned()
}

/// Compile the word-boundary-anchored, case-insensitive pattern for one
/// spoken extension form. Pure function of the form; letters are escaped, so
/// any extension found on disk produces a valid pattern.
fn spoken_form_pattern(spoken_form: &str) -> Option<Regex> {
    let spaced = spoken_form
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    Regex::new(&format!(r"(?i)\b(\w+(?:\s+\w+)*)\s+dot\s+{spaced}\b")).ok()
}

/// Replace whole-word occurrences of index keys with marked canonical paths.
/// Keys are tried longest first so a multi-word key is consumed before any
/// shorter key that is a fragment of it.
fn substitute_filenames(text: &str, index: &FileIndex) -> String {
    let mut keys: Vec<(&str, &str)> = index.iter().collect();
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut result = text.to_string();
    for (key, path) in keys {
        let Ok(pattern) = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(key))) else {
            continue;
        };
        if pattern.is_match(&result) {
            debug!(key, path, "substituting spoken file reference");
            let replacement = format!("{PATH_MARKER}{path}");
            result = pattern
                .replace_all(&result, NoExpand(&replacement))
                .into_owned();
        }
    }
    result
}

/// Resolve a single spoken name to its marked canonical path.
///
/// Exact case-insensitive match first; otherwise a bidirectional substring
/// fallback over the index in insertion order. The fallback is documented
/// best-effort: short or generic names may hit a different candidate than a
/// human would pick, and the first entry found wins.
pub fn resolve_spoken(spoken_name: &str, index: &FileIndex) -> Option<String> {
    let clean = spoken_name.trim().to_lowercase();
    if clean.is_empty() {
        return None;
    }

    for (key, path) in index.iter() {
        if key.to_lowercase() == clean {
            return Some(format!("{PATH_MARKER}{path}"));
        }
    }

    for (key, path) in index.iter() {
        let key_lower = key.to_lowercase();
        if key_lower.contains(&clean) || clean.contains(&key_lower) {
            return Some(format!("{PATH_MARKER}{path}"));
        }
    }

    None
}

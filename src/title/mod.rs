//! Canonical TODO identities.
//!
//! A marker's identity is derived from its top-level folder and its comment
//! text only; the line number and the rest of the path are deliberately left
//! out so that an edited-but-unmoved marker still matches the issue tracked
//! for it on a previous run.

use crate::scanner::MarkerOccurrence;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Deterministic identity string for a TODO marker.
///
/// Shaped `"<top-level folder> - <comment text>"`. Equality on this string is
/// the sole matching rule between scans and the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalTitle(String);

impl CanonicalTitle {
    /// Wrap an already-canonical string (tracker responses, persisted state).
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deduplicated TODO ready for reconciliation.
///
/// Keeps the originating path and line so a fresh issue can carry
/// `"<path> line <line>"` as its description; neither participates in
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub title: CanonicalTitle,
    pub path: String,
    pub line: u32,
}

/// Derive the canonical title for one occurrence.
///
/// Pure and independent of the line number. For a file at the repository
/// root the "folder" component is the file name itself.
#[must_use]
pub fn canonical_title(occurrence: &MarkerOccurrence) -> CanonicalTitle {
    let folder = occurrence
        .path
        .split('/')
        .next()
        .unwrap_or(occurrence.path.as_str());
    let text = occurrence.text.trim();
    CanonicalTitle(format!("{folder} - {text}").trim().to_string())
}

/// Canonicalize a whole scan, collapsing duplicate titles.
///
/// Two occurrences producing the same canonical title are the same logical
/// task; the first occurrence wins and later ones are dropped.
#[must_use]
pub fn canonicalize_scan(occurrences: &[MarkerOccurrence]) -> Vec<TodoItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for occurrence in occurrences {
        let title = canonical_title(occurrence);
        if seen.insert(title.clone()) {
            items.push(TodoItem {
                title,
                path: occurrence.path.clone(),
                line: occurrence.line,
            });
        } else {
            debug!(
                path = %occurrence.path,
                line = occurrence.line,
                "Dropping duplicate canonical title"
            );
        }
    }
    items
}

#[cfg(test)]
#[path = "title_tests.rs"]
mod tests;

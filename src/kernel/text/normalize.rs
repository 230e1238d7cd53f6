//! Matching-friendly text with a map back to original byte offsets.
//!
//! The normalized text is built one original character at a time: the
//! character is canonically decomposed, optionally lowercased, optionally
//! stripped of combining marks, and whitespace runs collapse to one space.
//! Every emitted character remembers the original byte range it came from.

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NormalizePolicy {
    pub fold_case: bool,
    pub fold_diacritics: bool,
}

impl NormalizePolicy {
    pub fn new(case_sensitive: bool, match_diacritics: bool) -> Self {
        Self {
            fold_case: !case_sensitive,
            fold_diacritics: !match_diacritics,
        }
    }

    pub(crate) const VARIANTS: usize = 4;

    pub(crate) fn slot(self) -> usize {
        usize::from(self.fold_case) | (usize::from(self.fold_diacritics) << 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Origin {
    /// Byte offset of the character in the normalized text.
    at: usize,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    origins: Vec<Origin>,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Maps the normalized byte span `start..end` to the original byte span
    /// covering every character it was produced from.
    ///
    /// Returns `None` when the span is empty or does not start and end on
    /// normalized character boundaries.
    pub fn original_range(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if start >= end || end > self.text.len() {
            return None;
        }
        let first = self.origins.partition_point(|o| o.at < start);
        let first = self.origins.get(first).filter(|o| o.at == start)?;
        if end < self.text.len() && !self.text.is_char_boundary(end) {
            return None;
        }
        let last = self.origins.partition_point(|o| o.at < end).checked_sub(1)?;
        let last = self.origins.get(last)?;
        Some((first.start, last.end.max(first.start)))
    }

    fn push(&mut self, ch: char, start: usize, end: usize) {
        self.origins.push(Origin {
            at: self.text.len(),
            start,
            end,
        });
        self.text.push(ch);
    }

    fn push_folded(&mut self, ch: char, start: usize, end: usize, policy: NormalizePolicy) {
        if policy.fold_case {
            for lower in ch.to_lowercase() {
                self.push_mark_aware(lower, start, end, policy);
            }
        } else {
            self.push_mark_aware(ch, start, end, policy);
        }
    }

    fn push_mark_aware(&mut self, ch: char, start: usize, end: usize, policy: NormalizePolicy) {
        if policy.fold_diacritics && is_combining_mark(ch) {
            return;
        }
        self.push(ch, start, end);
    }

    fn extend_last(&mut self, end: usize) {
        if let Some(last) = self.origins.last_mut() {
            last.end = end;
        }
    }
}

pub fn normalize(text: &str, policy: NormalizePolicy) -> NormalizedText {
    let mut out = NormalizedText {
        text: String::with_capacity(text.len()),
        origins: Vec::with_capacity(text.len()),
    };
    let mut in_space = false;

    for (start, ch) in text.char_indices() {
        let end = start + ch.len_utf8();
        if ch.is_whitespace() {
            if in_space {
                out.extend_last(end);
            } else {
                out.push(' ', start, end);
                in_space = true;
            }
            continue;
        }
        let before = out.text.len();
        decompose_canonical(ch, |d| out.push_folded(d, start, end, policy));
        if out.text.len() != before {
            in_space = false;
        } else {
            // Stripped mark: it belongs to the preceding character.
            out.extend_last(end);
        }
    }

    out
}

/// Normalizes a query term; surrounding whitespace is dropped.
pub fn normalize_query(term: &str, policy: NormalizePolicy) -> String {
    let normalized = normalize(term.trim(), policy).into_string();
    normalized.trim().to_string()
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/text/normalize.rs"]
mod tests;

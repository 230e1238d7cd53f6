//! Page matcher: query terms against one page's normalized text.

use memchr::memmem::Finder;
use serde::Serialize;
use std::collections::BTreeMap;

use super::page_cache::PageTextEntry;
use super::query::CompiledQuery;
use super::text::{is_entire_word, is_grapheme_boundary};

/// A match in original page text, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MatchSpan {
    pub offset: usize,
    pub length: usize,
}

impl MatchSpan {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// All matches of `query` on the page, sorted and non-overlapping.
///
/// Overlapping candidates keep the longest one; equal lengths keep the
/// earliest.
pub fn find_matches(query: &CompiledQuery, entry: &PageTextEntry) -> Vec<MatchSpan> {
    if query.is_empty() || entry.text().is_empty() {
        return Vec::new();
    }

    let page = entry.normalized(query.policy());
    let haystack = page.as_str();

    let mut candidates = Vec::new();
    for term in query.terms() {
        collect_term(haystack, term.as_str(), query.entire_word(), &mut candidates);
    }

    let mut spans: Vec<MatchSpan> = Vec::with_capacity(candidates.len());
    for (start, end) in resolve_overlaps(candidates) {
        let Some((orig_start, orig_end)) = page.original_range(start, end) else {
            continue;
        };
        // Two normalized spans can still meet inside one original character.
        if spans.last().is_some_and(|prev| prev.end() > orig_start) {
            continue;
        }
        spans.push(MatchSpan::new(orig_start, orig_end - orig_start));
    }
    spans
}

fn collect_term(haystack: &str, term: &str, entire_word: bool, out: &mut Vec<(usize, usize)>) {
    if term.is_empty() || term.len() > haystack.len() {
        return;
    }
    let finder = Finder::new(term.as_bytes());
    let bytes = haystack.as_bytes();
    let mut pos = 0usize;

    while pos < bytes.len() {
        let Some(found) = finder.find(&bytes[pos..]) else {
            break;
        };
        let start = pos + found;
        let end = start + term.len();

        if accept(haystack, start, end, entire_word) {
            out.push((start, end));
            pos = end;
        } else {
            pos = start
                + haystack[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
    }
}

fn accept(haystack: &str, start: usize, end: usize, entire_word: bool) -> bool {
    if !is_grapheme_boundary(haystack, start) || !is_grapheme_boundary(haystack, end) {
        return false;
    }
    !entire_word || is_entire_word(haystack, start, end)
}

fn resolve_overlaps(mut candidates: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    candidates.sort_unstable_by(|a, b| (b.1 - b.0).cmp(&(a.1 - a.0)).then(a.0.cmp(&b.0)));
    candidates.dedup();

    let mut accepted: BTreeMap<usize, usize> = BTreeMap::new();
    for (start, end) in candidates {
        let overlaps = accepted
            .range(..end)
            .next_back()
            .is_some_and(|(_, &prev_end)| prev_end > start);
        if !overlaps {
            accepted.insert(start, end);
        }
    }
    accepted.into_iter().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/matcher.rs"]
mod tests;

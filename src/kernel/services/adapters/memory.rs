//! In-memory paginated document.
//!
//! Backs the command-line driver and the tests. Lines become fragments with
//! line-break markers; pages in a plain text file are separated by form feeds.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::kernel::services::ports::{
    Document, PageNavigator, PageTextSource, PageVisibility, SourceError, SourceResult,
    TextFragment,
};

const PAGE_BREAK: char = '\x0c';

#[derive(Debug, Default)]
pub struct InMemoryDocument {
    pages: Vec<Vec<TextFragment>>,
    current: AtomicUsize,
    /// Pages within this distance of the current page count as visible.
    visible_radius: Option<usize>,
}

fn page_fragments(page: &str) -> Vec<TextFragment> {
    page.split_inclusive('\n')
        .map(|line| match line.strip_suffix('\n') {
            Some(text) => TextFragment::new(text.strip_suffix('\r').unwrap_or(text), true),
            None => TextFragment::new(line, false),
        })
        .collect()
}

impl InMemoryDocument {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_fragments(pages.into_iter().map(|p| page_fragments(p.as_ref())).collect())
    }

    pub fn from_fragments(pages: Vec<Vec<TextFragment>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn from_form_feed_text(text: &str) -> Self {
        Self::from_pages(text.split(PAGE_BREAK))
    }

    pub fn with_visible_radius(mut self, radius: usize) -> Self {
        self.visible_radius = Some(radius);
        self
    }

    /// Wraps the document for the find engine, keeping a handle to it.
    pub fn into_document(self) -> (Arc<Self>, Document) {
        let shared = Arc::new(self);
        let mut document = Document::new(shared.clone(), shared.clone());
        if shared.visible_radius.is_some() {
            document = document.with_visibility(shared.clone());
        }
        (shared, document)
    }
}

impl PageTextSource for InMemoryDocument {
    fn text_content(&self, page_index: usize) -> SourceResult<Vec<TextFragment>> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or(SourceError::PageOutOfRange {
                page_index,
                page_count: self.pages.len(),
            })
    }
}

impl PageNavigator for InMemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }

    fn set_current_page(&self, page_index: usize) {
        let last = self.pages.len().saturating_sub(1);
        self.current.store(page_index.min(last), Ordering::Relaxed);
    }
}

impl PageVisibility for InMemoryDocument {
    fn is_page_visible(&self, page_index: usize) -> bool {
        let radius = self.visible_radius.unwrap_or(usize::MAX);
        self.current_page().abs_diff(page_index) <= radius
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;

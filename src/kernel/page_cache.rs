//! Lazily extracted, memoized page text.
//!
//! One cache lives for one attached document. Each page slot is a once-cell,
//! so concurrent requests for an uncached page share a single extraction.

use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use super::services::ports::{PageTextSource, TextFragment};
use super::text::{normalize, NormalizePolicy, NormalizedText};

const LINE_SEPARATOR: char = '\n';

#[derive(Debug, Default)]
pub struct PageTextEntry {
    text: String,
    failed: bool,
    variants: [OnceLock<NormalizedText>; NormalizePolicy::VARIANTS],
}

impl PageTextEntry {
    pub fn from_fragments(fragments: &[TextFragment]) -> Self {
        let capacity = fragments.iter().map(|f| f.text.len() + 1).sum();
        let mut text = String::with_capacity(capacity);
        for fragment in fragments {
            text.push_str(&fragment.text);
            if fragment.has_eol {
                text.push(LINE_SEPARATOR);
            }
        }
        Self {
            text,
            ..Self::default()
        }
    }

    fn failed() -> Self {
        Self {
            failed: true,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Extraction failed; the entry is empty.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn normalized(&self, policy: NormalizePolicy) -> &NormalizedText {
        self.variants[policy.slot()].get_or_init(|| normalize(&self.text, policy))
    }
}

type PageSlot = Arc<OnceLock<Arc<PageTextEntry>>>;

pub struct PageTextCache {
    source: Arc<dyn PageTextSource>,
    page_count: usize,
    slots: Mutex<FxHashMap<usize, PageSlot>>,
    extractions: AtomicUsize,
}

impl PageTextCache {
    pub fn new(source: Arc<dyn PageTextSource>, page_count: usize) -> Self {
        Self {
            source,
            page_count,
            slots: Mutex::new(FxHashMap::default()),
            extractions: AtomicUsize::new(0),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn entry(&self, page_index: usize) -> Arc<PageTextEntry> {
        if page_index >= self.page_count {
            return Arc::new(PageTextEntry::default());
        }
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(page_index).or_default())
        };
        Arc::clone(slot.get_or_init(|| Arc::new(self.extract(page_index))))
    }

    pub fn text(&self, page_index: usize) -> String {
        self.entry(page_index).text().to_string()
    }

    pub fn normalized(&self, page_index: usize, policy: NormalizePolicy) -> String {
        self.entry(page_index).normalized(policy).as_str().to_string()
    }

    /// Returns the entry only if it was already extracted.
    pub fn cached(&self, page_index: usize) -> Option<Arc<PageTextEntry>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(&page_index).and_then(|slot| slot.get().cloned())
    }

    /// Underlying extractions performed so far.
    pub fn extraction_count(&self) -> usize {
        self.extractions.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn extract(&self, page_index: usize) -> PageTextEntry {
        self.extractions.fetch_add(1, Ordering::Relaxed);
        match self.source.text_content(page_index) {
            Ok(fragments) => {
                tracing::trace!(page_index, fragments = fragments.len(), "page text extracted");
                PageTextEntry::from_fragments(&fragments)
            }
            Err(e) => {
                tracing::warn!(page_index, error = %e, "page text extraction failed");
                PageTextEntry::failed()
            }
        }
    }
}

impl std::fmt::Debug for PageTextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTextCache")
            .field("page_count", &self.page_count)
            .field("extractions", &self.extraction_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/page_cache.rs"]
mod tests;

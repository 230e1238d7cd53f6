use super::*;
use crate::kernel::services::ports::{SourceError, SourceResult};
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

struct CountingSource {
    pages: Vec<Vec<TextFragment>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl CountingSource {
    fn new(pages: Vec<Vec<TextFragment>>) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }
}

impl PageTextSource for CountingSource {
    fn text_content(&self, page_index: usize) -> SourceResult<Vec<TextFragment>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.pages
            .get(page_index)
            .cloned()
            .ok_or(SourceError::PageOutOfRange {
                page_index,
                page_count: self.pages.len(),
            })
    }
}

struct FailingSource;

impl PageTextSource for FailingSource {
    fn text_content(&self, _page_index: usize) -> SourceResult<Vec<TextFragment>> {
        Err(SourceError::Unavailable("broken stream".to_string()))
    }
}

fn two_pages() -> Vec<Vec<TextFragment>> {
    vec![
        vec![
            TextFragment::new("Hello", true),
            TextFragment::new("wor", false),
            TextFragment::new("ld", true),
        ],
        vec![TextFragment::new("second page", false)],
    ]
}

#[test]
fn test_fragments_join_with_line_separators() {
    let entry = PageTextEntry::from_fragments(&two_pages()[0]);
    assert_eq!(entry.text(), "Hello\nworld\n");
    assert!(!entry.is_failed());
}

#[test]
fn test_extracts_each_page_once() {
    let source = Arc::new(CountingSource::new(two_pages()));
    let cache = PageTextCache::new(source.clone(), 2);

    assert_eq!(cache.text(1), "second page");
    assert_eq!(cache.text(1), "second page");
    let _ = cache.entry(0);
    let _ = cache.entry(0);

    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.extraction_count(), 2);
}

#[test]
fn test_normalized_variant_is_memoized() {
    let cache = PageTextCache::new(Arc::new(CountingSource::new(two_pages())), 2);
    let policy = NormalizePolicy::new(false, false);
    assert_eq!(cache.normalized(0, policy), "hello world ");

    let entry = cache.entry(0);
    let first = entry.normalized(policy) as *const NormalizedText;
    let second = entry.normalized(policy) as *const NormalizedText;
    assert_eq!(first, second);
}

#[test]
fn test_out_of_range_page_is_empty_without_extraction() {
    let source = Arc::new(CountingSource::new(two_pages()));
    let cache = PageTextCache::new(source.clone(), 2);
    assert!(cache.entry(7).text().is_empty());
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failed_extraction_is_memoized_as_empty() {
    let cache = PageTextCache::new(Arc::new(FailingSource), 3);
    let entry = cache.entry(1);
    assert!(entry.is_failed());
    assert!(entry.text().is_empty());

    let _ = cache.entry(1);
    assert_eq!(cache.extraction_count(), 1);
}

#[test]
fn test_clear_forces_new_extraction() {
    let source = Arc::new(CountingSource::new(two_pages()));
    let cache = PageTextCache::new(source.clone(), 2);
    let _ = cache.entry(0);
    assert!(cache.cached(0).is_some());

    cache.clear();
    assert!(cache.cached(0).is_none());
    let _ = cache.entry(0);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_requests_share_one_extraction() {
    let mut source = CountingSource::new(two_pages());
    source.delay = Duration::from_millis(30);
    let source = Arc::new(source);
    let cache = Arc::new(PageTextCache::new(source.clone(), 2));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.text(0)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "Hello\nworld\n");
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

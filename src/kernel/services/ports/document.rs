//! Document collaborators: page text extraction, page navigation, visibility.

use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Debug)]
pub enum SourceError {
    PageOutOfRange { page_index: usize, page_count: usize },
    Unavailable(String),
    Io(io::Error),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::PageOutOfRange {
                page_index,
                page_count,
            } => write!(
                f,
                "Page {} out of range (document has {} pages)",
                page_index, page_count
            ),
            SourceError::Unavailable(msg) => write!(f, "Page text unavailable: {}", msg),
            SourceError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<io::Error> for SourceError {
    fn from(e: io::Error) -> Self {
        SourceError::Io(e)
    }
}

/// One run of page text as produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFragment {
    pub text: String,
    /// The fragment ends a visual line.
    #[serde(default)]
    pub has_eol: bool,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, has_eol: bool) -> Self {
        Self {
            text: text.into(),
            has_eol,
        }
    }
}

pub trait PageTextSource: Send + Sync {
    fn text_content(&self, page_index: usize) -> Result<Vec<TextFragment>>;
}

pub trait PageNavigator: Send + Sync {
    fn page_count(&self) -> usize;

    /// Zero-based index of the page the viewer currently shows.
    fn current_page(&self) -> usize;

    fn set_current_page(&self, page_index: usize);
}

pub trait PageVisibility: Send + Sync {
    fn is_page_visible(&self, page_index: usize) -> bool;
}

/// Everything the find engine needs from an open document.
#[derive(Clone)]
pub struct Document {
    pub source: Arc<dyn PageTextSource>,
    pub navigator: Arc<dyn PageNavigator>,
    pub visibility: Option<Arc<dyn PageVisibility>>,
}

impl Document {
    pub fn new(source: Arc<dyn PageTextSource>, navigator: Arc<dyn PageNavigator>) -> Self {
        Self {
            source,
            navigator,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Arc<dyn PageVisibility>) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn page_count(&self) -> usize {
        self.navigator.page_count()
    }

    /// `None` when no visibility predicate was supplied.
    pub fn is_page_visible(&self, page_index: usize) -> Option<bool> {
        self.visibility
            .as_ref()
            .map(|v| v.is_page_visible(page_index))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("page_count", &self.page_count())
            .field("has_visibility", &self.visibility.is_some())
            .finish()
    }
}

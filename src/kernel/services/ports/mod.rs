//! Service ports: traits + data contracts.

pub mod config;
pub mod document;

pub use config::FindConfig;
pub use document::{
    Document, PageNavigator, PageTextSource, PageVisibility, Result as SourceResult,
    SourceError, TextFragment,
};

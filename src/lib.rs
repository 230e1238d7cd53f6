//! zfind - in-document find engine for paginated text
//!
//! Module layout:
//! - kernel::text: normalization and word/grapheme classification
//! - kernel::page_cache: lazily extracted page text
//! - kernel::matcher: per-page matching
//! - kernel::scheduler / kernel::selection: sweeps, navigation, control state
//! - kernel::services: ports, adapters, command/event bus and host

pub mod kernel;

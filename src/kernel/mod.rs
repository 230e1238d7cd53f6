//! Headless find engine (query, matching, sweep scheduling, selection).

pub mod action;
pub mod effect;
pub mod matcher;
pub mod page_cache;
pub mod query;
pub mod scheduler;
pub mod selection;
pub mod services;
pub mod text;

pub use action::FindCommand;
pub use effect::{FindEvent, PageTarget, EVENT_NAMES};
pub use matcher::{find_matches, MatchSpan};
pub use page_cache::{PageTextCache, PageTextEntry};
pub use query::{CompiledQuery, FindQuery, QueryFlags, RawQuery};
pub use scheduler::{PageJob, PageJobResult, SearchPhase, SearchScheduler};
pub use selection::{ControlState, Direction, MatchesCount, NavOutcome, Selection};

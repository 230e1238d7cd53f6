use serde::Serialize;

use super::query::RawQuery;
use super::selection::{ControlState, MatchesCount};

pub const UPDATE_TEXT_LAYER_MATCHES: &str = "updatetextlayermatches";
pub const UPDATE_FIND_CONTROL_STATE: &str = "updatefindcontrolstate";
pub const UPDATE_FIND_MATCHES_COUNT: &str = "updatefindmatchescount";

pub const EVENT_NAMES: [&str; 3] = [
    UPDATE_TEXT_LAYER_MATCHES,
    UPDATE_FIND_CONTROL_STATE,
    UPDATE_FIND_MATCHES_COUNT,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PageTarget {
    Page(usize),
    /// Every page a renderer currently shows.
    AllVisible,
}

/// Outbound notification for renderers and the find bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FindEvent {
    PageMatchesUpdated {
        page: PageTarget,
    },
    ControlStateUpdated {
        state: ControlState,
        /// State carried by the previous control-state update.
        previous: Option<ControlState>,
        find_previous: bool,
        entire_word: bool,
        matches_count: MatchesCount,
        raw_query: Option<RawQuery>,
    },
    MatchesCountUpdated {
        matches_count: MatchesCount,
    },
}

impl FindEvent {
    /// Name the event is published under.
    pub fn name(&self) -> &'static str {
        match self {
            FindEvent::PageMatchesUpdated { .. } => UPDATE_TEXT_LAYER_MATCHES,
            FindEvent::ControlStateUpdated { .. } => UPDATE_FIND_CONTROL_STATE,
            FindEvent::MatchesCountUpdated { .. } => UPDATE_FIND_MATCHES_COUNT,
        }
    }

    pub fn page(page_index: usize) -> Self {
        FindEvent::PageMatchesUpdated {
            page: PageTarget::Page(page_index),
        }
    }

    pub fn all_visible() -> Self {
        FindEvent::PageMatchesUpdated {
            page: PageTarget::AllVisible,
        }
    }
}

use serde::Deserialize;

use super::query::{FindQuery, QueryFlags, RawQuery};
use super::selection::Direction;

/// Inbound find command, as sent by the find bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FindCommand {
    Search {
        query: RawQuery,
        #[serde(default)]
        case_sensitive: bool,
        #[serde(default)]
        entire_word: bool,
        #[serde(default)]
        highlight_all: bool,
        #[serde(default)]
        match_diacritics: bool,
        #[serde(default)]
        find_previous: bool,
    },
    Repeat {
        query: RawQuery,
        #[serde(default)]
        find_previous: bool,
    },
    ToggleHighlightAll {
        query: RawQuery,
        #[serde(default)]
        highlight_all: bool,
    },
    Close,
}

impl FindCommand {
    pub fn search(query: impl Into<RawQuery>, flags: QueryFlags, find_previous: bool) -> Self {
        FindCommand::Search {
            query: query.into(),
            case_sensitive: flags.case_sensitive,
            entire_word: flags.entire_word,
            highlight_all: flags.highlight_all,
            match_diacritics: flags.match_diacritics,
            find_previous,
        }
    }

    pub fn repeat(query: impl Into<RawQuery>, find_previous: bool) -> Self {
        FindCommand::Repeat {
            query: query.into(),
            find_previous,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FindCommand::Search { .. } => "search",
            FindCommand::Repeat { .. } => "repeat",
            FindCommand::ToggleHighlightAll { .. } => "toggleHighlightAll",
            FindCommand::Close => "close",
        }
    }

    pub fn raw_query(&self) -> Option<&RawQuery> {
        match self {
            FindCommand::Search { query, .. }
            | FindCommand::Repeat { query, .. }
            | FindCommand::ToggleHighlightAll { query, .. } => Some(query),
            FindCommand::Close => None,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            FindCommand::Search { find_previous, .. } | FindCommand::Repeat { find_previous, .. } => {
                Direction::from_find_previous(*find_previous)
            }
            _ => Direction::Next,
        }
    }

    /// The query a `search` command asks for. Other commands carry only the
    /// raw text and inherit flags from the active query.
    pub fn to_query(&self) -> Option<FindQuery> {
        match self {
            FindCommand::Search {
                query,
                case_sensitive,
                entire_word,
                highlight_all,
                match_diacritics,
                ..
            } => Some(FindQuery::new(
                query.clone(),
                QueryFlags {
                    case_sensitive: *case_sensitive,
                    entire_word: *entire_word,
                    match_diacritics: *match_diacritics,
                    highlight_all: *highlight_all,
                },
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/action.rs"]
mod tests;

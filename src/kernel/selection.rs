//! Selection pointer, navigation and derived control state.
//!
//! Pages become known one at a time as the sweep commits them. Anything that
//! needs a page that is not committed yet is kept as a single pending *seek*
//! and resumed when that page arrives.

use serde::{Deserialize, Serialize};

use super::matcher::MatchSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlState {
    Found,
    NotFound,
    Wrapped,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MatchesCount {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub page_index: usize,
    pub match_index: usize,
}

impl Selection {
    pub fn new(page_index: usize, match_index: usize) -> Self {
        Self {
            page_index,
            match_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[default]
    Next,
    Previous,
}

impl Direction {
    pub fn from_find_previous(find_previous: bool) -> Self {
        if find_previous {
            Direction::Previous
        } else {
            Direction::Next
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// A match was selected (possibly the same one, after wrapping).
    Moved,
    /// Waiting for a page that has not been scanned yet.
    Waiting,
    /// Nothing to navigate to.
    NoMatch,
}

#[derive(Debug, Clone, Copy)]
struct Seek {
    page: usize,
    direction: Direction,
    wrapped: bool,
    /// Pages still allowed to be visited, the current one included.
    remaining: usize,
}

impl Seek {
    fn from_origin(page: usize, direction: Direction, page_count: usize) -> Self {
        Self {
            page,
            direction,
            wrapped: false,
            remaining: page_count,
        }
    }

    /// Starts on the page after `page`, visiting every page once.
    fn adjacent(page: usize, direction: Direction, page_count: usize) -> Self {
        let mut seek = Self::from_origin(page, direction, page_count + 1);
        seek.step(page_count);
        seek
    }

    fn step(&mut self, page_count: usize) {
        self.remaining = self.remaining.saturating_sub(1);
        match self.direction {
            Direction::Next => {
                if self.page + 1 >= page_count {
                    self.page = 0;
                    self.wrapped = true;
                } else {
                    self.page += 1;
                }
            }
            Direction::Previous => {
                if self.page == 0 {
                    self.page = page_count.saturating_sub(1);
                    self.wrapped = true;
                } else {
                    self.page -= 1;
                }
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionMachine {
    pages: Vec<Option<Vec<MatchSpan>>>,
    total: usize,
    selected: Option<Selection>,
    wrapped: bool,
    seek: Option<Seek>,
    revision: u64,
}

impl SelectionMachine {
    pub fn new(page_count: usize) -> Self {
        let mut machine = Self::default();
        machine.reset(page_count);
        machine
    }

    /// Forgets every page table, the selection and any pending seek.
    pub fn reset(&mut self, page_count: usize) {
        self.pages.clear();
        self.pages.resize(page_count, None);
        self.total = 0;
        self.selected = None;
        self.wrapped = false;
        self.seek = None;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_matches(&self, page_index: usize) -> &[MatchSpan] {
        self.pages
            .get(page_index)
            .and_then(Option::as_deref)
            .unwrap_or(&[])
    }

    pub fn is_scanned(&self, page_index: usize) -> bool {
        self.pages.get(page_index).is_some_and(Option::is_some)
    }

    pub fn selected(&self) -> Option<Selection> {
        self.selected
    }

    pub fn selected_span(&self) -> Option<MatchSpan> {
        let sel = self.selected?;
        self.page_matches(sel.page_index).get(sel.match_index).copied()
    }

    /// The last selection change crossed the document boundary.
    pub fn wrapped(&self) -> bool {
        self.wrapped
    }

    pub fn is_seeking(&self) -> bool {
        self.seek.is_some()
    }

    /// Bumped on every selection assignment, including re-selecting the
    /// same match after a full wrap.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn matches_count(&self) -> MatchesCount {
        let Some(sel) = self.selected else {
            return MatchesCount {
                current: 0,
                total: self.total,
            };
        };
        let before: usize = self.pages[..sel.page_index]
            .iter()
            .flatten()
            .map(Vec::len)
            .sum();
        MatchesCount {
            current: before + sel.match_index + 1,
            total: self.total,
        }
    }

    /// `pending` is true while the sweep that feeds this machine is not done.
    pub fn control_state(&self, pending: bool) -> ControlState {
        match self.selected {
            Some(_) if self.wrapped => ControlState::Wrapped,
            Some(_) => ControlState::Found,
            None if pending => ControlState::Pending,
            None => ControlState::NotFound,
        }
    }

    /// Stores a page's matches and resumes a seek waiting on it.
    pub fn commit_page(&mut self, page_index: usize, spans: Vec<MatchSpan>) -> bool {
        let Some(slot) = self.pages.get_mut(page_index) else {
            return false;
        };
        let old = slot.replace(spans).map_or(0, |old| old.len());
        self.total = self.total - old + self.page_matches(page_index).len();

        let mut changed = false;
        if let Some(sel) = self.selected {
            if sel.page_index == page_index && sel.match_index >= self.page_matches(page_index).len()
            {
                self.selected = None;
                self.wrapped = false;
                changed = true;
            }
        }
        if self.seek.is_some_and(|seek| seek.page == page_index) {
            changed |= self.advance_seek() == NavOutcome::Moved;
        }
        changed
    }

    /// Drops the selection and seeks the first match from `origin`.
    pub fn start_seek(&mut self, origin: usize, direction: Direction) -> NavOutcome {
        self.selected = None;
        self.wrapped = false;
        let page_count = self.pages.len();
        if page_count == 0 {
            self.seek = None;
            return NavOutcome::NoMatch;
        }
        self.seek = Some(Seek::from_origin(
            origin.min(page_count - 1),
            direction,
            page_count,
        ));
        self.advance_seek()
    }

    /// Next/previous match. A newer call replaces a seek that is still waiting.
    pub fn navigate(&mut self, direction: Direction) -> NavOutcome {
        let page_count = self.pages.len();
        let Some(current) = self.selected else {
            let Some(seek) = self.seek.as_mut() else {
                return NavOutcome::NoMatch;
            };
            if seek.direction != direction {
                // A reversed walk gets a full lap from where the old one stopped.
                *seek = Seek::from_origin(seek.page, direction, page_count);
            }
            return self.advance_seek();
        };

        let count = self.page_matches(current.page_index).len();
        let within_page = match direction {
            Direction::Next if current.match_index + 1 < count => Some(current.match_index + 1),
            Direction::Previous if current.match_index > 0 && current.match_index <= count => {
                Some(current.match_index - 1)
            }
            _ => None,
        };
        if let Some(match_index) = within_page {
            self.seek = None;
            self.select(Selection::new(current.page_index, match_index), false);
            return NavOutcome::Moved;
        }

        self.seek = Some(Seek::adjacent(current.page_index, direction, page_count));
        self.advance_seek()
    }

    fn advance_seek(&mut self) -> NavOutcome {
        let page_count = self.pages.len();
        while let Some(seek) = self.seek.as_mut() {
            if seek.remaining == 0 {
                self.seek = None;
                return NavOutcome::NoMatch;
            }
            let Some(matches) = self.pages.get(seek.page).and_then(Option::as_ref) else {
                return NavOutcome::Waiting;
            };
            if !matches.is_empty() {
                let match_index = match seek.direction {
                    Direction::Next => 0,
                    Direction::Previous => matches.len() - 1,
                };
                let selection = Selection::new(seek.page, match_index);
                let wrapped = seek.wrapped;
                self.seek = None;
                self.select(selection, wrapped);
                return NavOutcome::Moved;
            }
            seek.step(page_count);
        }
        NavOutcome::NoMatch
    }

    fn select(&mut self, selection: Selection, wrapped: bool) {
        self.selected = Some(selection);
        self.wrapped = wrapped;
        self.revision += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/selection.rs"]
mod tests;

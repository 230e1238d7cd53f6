//! Debounced, cancellable page-by-page find sweep.
//!
//! The scheduler never sleeps. `handle` records intent and a debounce
//! deadline; `tick(now)` starts the sweep once the deadline passes and scans a
//! bounded number of pages per call. Every sweep carries a generation number,
//! and a page result from an older generation is dropped at commit.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use super::action::FindCommand;
use super::effect::FindEvent;
use super::matcher::{find_matches, MatchSpan};
use super::page_cache::PageTextCache;
use super::query::{CompiledQuery, FindQuery, QueryFlags, RawQuery};
use super::selection::{
    ControlState, Direction, MatchesCount, NavOutcome, Selection, SelectionMachine,
};
use super::services::ports::{Document, FindConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Debouncing { deadline: Instant },
    Scanning,
    Done,
}

/// One page of one sweep, runnable off the scheduler.
#[derive(Debug, Clone)]
pub struct PageJob {
    pub generation: u64,
    pub page_index: usize,
    query: Arc<CompiledQuery>,
    cache: Arc<PageTextCache>,
}

impl PageJob {
    pub fn run(self) -> PageJobResult {
        let entry = self.cache.entry(self.page_index);
        let spans = find_matches(&self.query, &entry);
        PageJobResult {
            generation: self.generation,
            page_index: self.page_index,
            spans,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageJobResult {
    pub generation: u64,
    pub page_index: usize,
    pub spans: Vec<MatchSpan>,
}

#[derive(Debug)]
struct Sweep {
    query: Arc<CompiledQuery>,
    queue: VecDeque<usize>,
    in_flight: Vec<usize>,
    started_at: Instant,
    count_withheld: bool,
}

impl Sweep {
    fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.in_flight.is_empty()
    }
}

/// Pages in navigation order from `origin`, stepping in `direction` and
/// wrapping around.
fn scan_order(origin: usize, direction: Direction, page_count: usize) -> VecDeque<usize> {
    if page_count == 0 {
        return VecDeque::new();
    }
    let origin = origin.min(page_count - 1);
    (0..page_count)
        .map(|i| match direction {
            Direction::Next => (origin + i) % page_count,
            Direction::Previous => (origin + page_count - i) % page_count,
        })
        .collect()
}

pub struct SearchScheduler {
    config: FindConfig,
    document: Option<Document>,
    cache: Option<Arc<PageTextCache>>,
    phase: SearchPhase,
    generation: u64,
    query: Option<FindQuery>,
    highlight_all: bool,
    direction: Direction,
    origin: usize,
    sweep: Option<Sweep>,
    selection: SelectionMachine,
    last_state: Option<(ControlState, u64)>,
    events: Vec<FindEvent>,
}

impl SearchScheduler {
    pub fn new(config: FindConfig) -> Self {
        Self {
            config: config.sanitized(),
            document: None,
            cache: None,
            phase: SearchPhase::Idle,
            generation: 0,
            query: None,
            highlight_all: false,
            direction: Direction::Next,
            origin: 0,
            sweep: None,
            selection: SelectionMachine::default(),
            last_state: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &FindConfig {
        &self.config
    }

    /// Replaces the document. All cached text, matches and selection go away.
    pub fn attach_document(&mut self, document: Option<Document>) {
        self.cancel("document replaced");
        self.query = None;
        self.highlight_all = false;
        self.origin = 0;
        self.last_state = None;
        self.phase = SearchPhase::Idle;
        self.events.clear();

        match document {
            Some(document) => {
                let page_count = document.page_count();
                self.cache = Some(Arc::new(PageTextCache::new(
                    Arc::clone(&document.source),
                    page_count,
                )));
                self.selection.reset(page_count);
                self.document = Some(document);
                tracing::debug!(page_count, "find document attached");
            }
            None => {
                self.cache = None;
                self.selection.reset(0);
                self.document = None;
                tracing::debug!("find document detached");
            }
        }
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn handle(&mut self, cmd: FindCommand, now: Instant) -> Vec<FindEvent> {
        if self.document.is_none() {
            tracing::debug!(command = cmd.name(), "find command ignored: no document");
            return Vec::new();
        }
        match cmd {
            FindCommand::Search { .. } => {
                self.direction = cmd.direction();
                if let Some(query) = cmd.to_query() {
                    self.on_search(query, now);
                }
            }
            FindCommand::Repeat {
                query,
                find_previous,
            } => self.on_repeat(query, Direction::from_find_previous(find_previous), now),
            FindCommand::ToggleHighlightAll {
                query,
                highlight_all,
            } => self.on_toggle_highlight_all(query, highlight_all, now),
            FindCommand::Close => self.on_close(),
        }
        std::mem::take(&mut self.events)
    }

    /// Starts a due sweep and scans up to `pages_per_tick` pages.
    pub fn tick(&mut self, now: Instant) -> Vec<FindEvent> {
        if let SearchPhase::Debouncing { deadline } = self.phase {
            if now < deadline {
                return std::mem::take(&mut self.events);
            }
            tracing::debug!(
                overshoot_ms = now.duration_since(deadline).as_millis() as u64,
                "find debounce elapsed"
            );
            self.start_sweep(now);
        }

        for _ in 0..self.config.pages_per_tick {
            let Some(job) = self.next_page_job() else {
                break;
            };
            let result = job.run();
            self.commit(result, now);
        }
        std::mem::take(&mut self.events)
    }

    /// Takes the next page of the running sweep, if any.
    pub fn next_page_job(&mut self) -> Option<PageJob> {
        if self.phase != SearchPhase::Scanning {
            return None;
        }
        let cache = Arc::clone(self.cache.as_ref()?);
        let sweep = self.sweep.as_mut()?;
        let page_index = sweep.queue.pop_front()?;
        sweep.in_flight.push(page_index);
        Some(PageJob {
            generation: self.generation,
            page_index,
            query: Arc::clone(&sweep.query),
            cache,
        })
    }

    pub fn complete_page_job(&mut self, result: PageJobResult, now: Instant) -> Vec<FindEvent> {
        self.commit(result, now);
        std::mem::take(&mut self.events)
    }

    /// When the next `tick` has work to do.
    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        match self.phase {
            SearchPhase::Debouncing { deadline } => Some(deadline),
            SearchPhase::Scanning if self.sweep.as_ref().is_some_and(|s| !s.queue.is_empty()) => {
                Some(now)
            }
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, SearchPhase::Idle | SearchPhase::Done)
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> Option<&FindQuery> {
        self.query.as_ref()
    }

    pub fn highlight_all(&self) -> bool {
        self.highlight_all
    }

    pub fn page_matches(&self, page_index: usize) -> &[MatchSpan] {
        self.selection.page_matches(page_index)
    }

    pub fn selected(&self) -> Option<Selection> {
        self.selection.selected()
    }

    pub fn selected_span(&self) -> Option<MatchSpan> {
        self.selection.selected_span()
    }

    pub fn matches_count(&self) -> MatchesCount {
        self.selection.matches_count()
    }

    pub fn control_state(&self) -> ControlState {
        match self.phase {
            SearchPhase::Debouncing { .. } => ControlState::Pending,
            SearchPhase::Scanning => self.selection.control_state(true),
            SearchPhase::Idle | SearchPhase::Done => self.selection.control_state(false),
        }
    }

    /// Original text of a page, extracting it if needed.
    pub fn page_text(&self, page_index: usize) -> Option<String> {
        self.cache.as_ref().map(|cache| cache.text(page_index))
    }

    fn on_search(&mut self, query: FindQuery, now: Instant) {
        self.highlight_all = query.flags.highlight_all;
        if query.compile().is_empty() {
            self.clear_for_blank(query);
            return;
        }

        if let Some(sel) = self.selection.selected() {
            self.origin = sel.page_index;
        }
        let had_matches = self.selection.total() > 0;
        self.cancel("query changed");
        self.selection.reset(self.page_count());
        if had_matches {
            self.push_page_update(FindEvent::all_visible());
        }
        self.query = Some(query);

        let deadline = now + self.config.debounce();
        self.phase = SearchPhase::Debouncing { deadline };
        tracing::debug!(
            generation = self.generation,
            debounce_ms = self.config.debounce_ms,
            "find search debouncing"
        );
        if self.config.debounce_ms == 0 {
            self.start_sweep(now);
        } else {
            self.emit_state(false);
        }
    }

    fn on_repeat(&mut self, raw: RawQuery, direction: Direction, now: Instant) {
        self.direction = direction;
        if !self.is_active_query(&raw) {
            let query = FindQuery::new(raw, self.inherited_flags());
            if query.compile().is_empty() {
                self.clear_for_blank(query);
                return;
            }
            self.restart_now(query, now);
            return;
        }
        if matches!(self.phase, SearchPhase::Debouncing { .. }) {
            self.start_sweep(now);
            return;
        }

        let before = self.selection.selected();
        let revision = self.selection.revision();
        let outcome = match self.stale_selection(before) {
            Some(current_page) => {
                tracing::debug!(current_page, "find selection no longer visible, re-seeking");
                self.selection.start_seek(current_page, direction)
            }
            None => self.selection.navigate(direction),
        };
        tracing::trace!(?direction, ?outcome, "find navigate");
        self.follow_selection(before, revision);
        self.emit_state(outcome == NavOutcome::NoMatch);
    }

    fn on_toggle_highlight_all(&mut self, raw: RawQuery, highlight_all: bool, now: Instant) {
        if self.is_active_query(&raw) {
            self.highlight_all = highlight_all;
            self.push_page_update(FindEvent::all_visible());
            return;
        }
        let flags = QueryFlags {
            highlight_all,
            ..self.inherited_flags()
        };
        let query = FindQuery::new(raw, flags);
        self.highlight_all = highlight_all;
        if query.compile().is_empty() {
            self.clear_for_blank(query);
            return;
        }
        self.restart_now(query, now);
    }

    fn on_close(&mut self) {
        self.cancel("closed");
        self.selection.reset(self.page_count());
        self.query = None;
        self.origin = 0;
        self.phase = SearchPhase::Idle;
        self.last_state = None;
        self.push_page_update(FindEvent::all_visible());
        tracing::debug!("find closed");
    }

    fn restart_now(&mut self, query: FindQuery, now: Instant) {
        if let Some(sel) = self.selection.selected() {
            self.origin = sel.page_index;
        }
        if self.selection.total() > 0 {
            self.push_page_update(FindEvent::all_visible());
        }
        self.cancel("query changed");
        self.query = Some(query);
        self.start_sweep(now);
    }

    fn clear_for_blank(&mut self, query: FindQuery) {
        self.cancel("blank query");
        if self.selection.total() > 0 {
            self.push_page_update(FindEvent::all_visible());
        }
        self.selection.reset(self.page_count());
        self.query = Some(query);
        self.phase = SearchPhase::Idle;
        self.emit_state(true);
        self.events.push(FindEvent::MatchesCountUpdated {
            matches_count: MatchesCount::default(),
        });
    }

    fn start_sweep(&mut self, now: Instant) {
        let Some(query) = self.query.as_ref() else {
            self.phase = SearchPhase::Idle;
            return;
        };
        let compiled = Arc::new(query.compile());
        let page_count = self.page_count();

        self.generation += 1;
        self.selection.reset(page_count);
        self.selection.start_seek(self.origin, self.direction);
        self.sweep = Some(Sweep {
            query: compiled,
            queue: scan_order(self.origin, self.direction, page_count),
            in_flight: Vec::new(),
            started_at: now,
            count_withheld: false,
        });
        self.phase = SearchPhase::Scanning;
        tracing::info!(
            generation = self.generation,
            page_count,
            origin = self.origin,
            "find sweep started"
        );
        self.emit_state(false);

        if page_count == 0 {
            self.finish_sweep(now);
        }
    }

    fn commit(&mut self, result: PageJobResult, now: Instant) {
        if result.generation != self.generation {
            tracing::debug!(
                page_index = result.page_index,
                job_generation = result.generation,
                generation = self.generation,
                "stale page job dropped"
            );
            return;
        }
        let Some(sweep) = self.sweep.as_mut() else {
            return;
        };
        let Some(pos) = sweep.in_flight.iter().position(|p| *p == result.page_index) else {
            return;
        };
        sweep.in_flight.swap_remove(pos);

        let page_index = result.page_index;
        let has_matches = !result.spans.is_empty();
        let before = self.selection.selected();
        let revision = self.selection.revision();
        self.selection.commit_page(page_index, result.spans);
        self.push_page_update(FindEvent::page(page_index));

        if has_matches {
            if self.config.update_matches_count_on_progress {
                self.events.push(FindEvent::MatchesCountUpdated {
                    matches_count: self.selection.matches_count(),
                });
            } else if let Some(sweep) = self.sweep.as_mut() {
                sweep.count_withheld = true;
            }
        }
        self.follow_selection(before, revision);

        if self.sweep.as_ref().is_some_and(Sweep::is_drained) {
            self.finish_sweep(now);
        } else {
            self.emit_state(false);
        }
    }

    fn finish_sweep(&mut self, now: Instant) {
        let Some(sweep) = self.sweep.take() else {
            return;
        };
        self.phase = SearchPhase::Done;
        let total = self.selection.total();
        tracing::info!(
            generation = self.generation,
            total,
            elapsed_ms = now.saturating_duration_since(sweep.started_at).as_millis() as u64,
            "find sweep finished"
        );
        if sweep.count_withheld || total == 0 {
            self.events.push(FindEvent::MatchesCountUpdated {
                matches_count: self.selection.matches_count(),
            });
        }
        self.emit_state(false);
    }

    /// Bumps the generation so nothing from the current sweep commits.
    fn cancel(&mut self, reason: &'static str) {
        if self.sweep.take().is_some() || matches!(self.phase, SearchPhase::Debouncing { .. }) {
            tracing::debug!(generation = self.generation, reason, "find sweep cancelled");
        }
        self.generation += 1;
    }

    /// A selected page the navigator moved away from and can no longer see.
    fn stale_selection(&self, selected: Option<Selection>) -> Option<usize> {
        let sel = selected?;
        let document = self.document.as_ref()?;
        let current_page = document.navigator.current_page();
        if sel.page_index == current_page {
            return None;
        }
        match document.is_page_visible(sel.page_index) {
            Some(false) => Some(current_page),
            _ => None,
        }
    }

    fn follow_selection(&mut self, before: Option<Selection>, revision: u64) {
        let after = self.selection.selected();
        if after == before && self.selection.revision() == revision {
            return;
        }
        if let Some(prev) = before {
            if after.map(|s| s.page_index) != Some(prev.page_index) {
                self.push_page_update(FindEvent::page(prev.page_index));
            }
        }
        let Some(sel) = after else {
            return;
        };
        self.push_page_update(FindEvent::page(sel.page_index));
        if let Some(document) = self.document.as_ref() {
            if document.navigator.current_page() != sel.page_index {
                document.navigator.set_current_page(sel.page_index);
            }
        }
        tracing::debug!(
            page_index = sel.page_index,
            match_index = sel.match_index,
            wrapped = self.selection.wrapped(),
            "find selection moved"
        );
    }

    fn emit_state(&mut self, force: bool) {
        let state = self.control_state();
        let key = (state, self.selection.revision());
        if !force && self.last_state == Some(key) {
            return;
        }
        let previous = self.last_state.replace(key).map(|(state, _)| state);
        self.events.push(FindEvent::ControlStateUpdated {
            state,
            previous,
            find_previous: self.direction == Direction::Previous,
            entire_word: self.query.as_ref().is_some_and(|q| q.flags.entire_word),
            matches_count: self.selection.matches_count(),
            raw_query: self.query.as_ref().map(|q| q.raw.clone()),
        });
    }

    fn push_page_update(&mut self, event: FindEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    fn is_active_query(&self, raw: &RawQuery) -> bool {
        self.query.as_ref().is_some_and(|q| &q.raw == raw)
    }

    fn inherited_flags(&self) -> QueryFlags {
        self.query.as_ref().map(|q| q.flags).unwrap_or_default()
    }

    fn page_count(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.page_count())
    }
}

impl std::fmt::Debug for SearchScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchScheduler")
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("query", &self.query)
            .field("selected", &self.selection.selected())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/scheduler.rs"]
mod tests;

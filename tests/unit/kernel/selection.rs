use super::*;

fn spans(count: usize) -> Vec<MatchSpan> {
    (0..count).map(|i| MatchSpan::new(i * 10, 3)).collect()
}

fn scanned(counts: &[usize]) -> SelectionMachine {
    let mut machine = SelectionMachine::new(counts.len());
    for (page, count) in counts.iter().enumerate() {
        machine.commit_page(page, spans(*count));
    }
    machine
}

#[test]
fn test_seek_selects_first_match_from_origin() {
    let mut machine = scanned(&[0, 2, 1]);
    assert_eq!(machine.start_seek(0, Direction::Next), NavOutcome::Moved);
    assert_eq!(machine.selected(), Some(Selection::new(1, 0)));
    assert!(!machine.wrapped());
    assert_eq!(machine.matches_count(), MatchesCount { current: 1, total: 3 });
}

#[test]
fn test_seek_backward_selects_last_match() {
    let mut machine = scanned(&[2, 0, 0]);
    assert_eq!(machine.start_seek(2, Direction::Previous), NavOutcome::Moved);
    assert_eq!(machine.selected(), Some(Selection::new(0, 1)));
    assert!(!machine.wrapped());
}

#[test]
fn test_seek_wraps_past_the_end() {
    let mut machine = scanned(&[1, 0, 0]);
    assert_eq!(machine.start_seek(1, Direction::Next), NavOutcome::Moved);
    assert_eq!(machine.selected(), Some(Selection::new(0, 0)));
    assert_eq!(machine.control_state(false), ControlState::Wrapped);
}

#[test]
fn test_seek_waits_for_unscanned_page() {
    let mut machine = SelectionMachine::new(3);
    machine.commit_page(0, Vec::new());
    assert_eq!(machine.start_seek(0, Direction::Next), NavOutcome::Waiting);
    assert_eq!(machine.control_state(true), ControlState::Pending);

    assert!(!machine.commit_page(2, spans(1)));
    assert!(machine.is_seeking());

    assert!(machine.commit_page(1, spans(2)));
    assert_eq!(machine.selected(), Some(Selection::new(1, 0)));
    assert!(!machine.is_seeking());
}

#[test]
fn test_seek_without_matches_resolves_to_nothing() {
    let mut machine = scanned(&[0, 0]);
    assert_eq!(machine.start_seek(0, Direction::Next), NavOutcome::NoMatch);
    assert_eq!(machine.selected(), None);
    assert_eq!(machine.control_state(false), ControlState::NotFound);
    assert_eq!(machine.navigate(Direction::Next), NavOutcome::NoMatch);
}

#[test]
fn test_next_walks_every_match_and_wraps_once() {
    let mut machine = scanned(&[2, 0, 3, 1]);
    machine.start_seek(0, Direction::Next);
    let start = machine.selected();
    let total = machine.total();

    let mut wraps = 0;
    for _ in 0..total {
        assert_eq!(machine.navigate(Direction::Next), NavOutcome::Moved);
        if machine.control_state(false) == ControlState::Wrapped {
            wraps += 1;
        }
    }
    assert_eq!(machine.selected(), start);
    assert_eq!(wraps, 1);
}

#[test]
fn test_previous_walks_backwards() {
    let mut machine = scanned(&[2, 1]);
    machine.start_seek(0, Direction::Next);
    assert_eq!(machine.navigate(Direction::Previous), NavOutcome::Moved);
    assert_eq!(machine.selected(), Some(Selection::new(1, 0)));
    assert!(machine.wrapped());

    assert_eq!(machine.navigate(Direction::Previous), NavOutcome::Moved);
    assert_eq!(machine.selected(), Some(Selection::new(0, 1)));
    assert_eq!(machine.control_state(false), ControlState::Found);
    assert_eq!(machine.matches_count(), MatchesCount { current: 2, total: 3 });
}

#[test]
fn test_single_match_wraps_onto_itself() {
    let mut machine = scanned(&[0, 1]);
    machine.start_seek(0, Direction::Next);
    let revision = machine.revision();

    assert_eq!(machine.navigate(Direction::Next), NavOutcome::Moved);
    assert_eq!(machine.selected(), Some(Selection::new(1, 0)));
    assert!(machine.wrapped());
    assert!(machine.revision() > revision);
}

#[test]
fn test_navigation_waits_and_newer_intent_replaces_older() {
    let mut machine = SelectionMachine::new(3);
    machine.commit_page(1, spans(1));
    machine.start_seek(1, Direction::Next);
    assert_eq!(machine.selected(), Some(Selection::new(1, 0)));

    assert_eq!(machine.navigate(Direction::Next), NavOutcome::Waiting);
    assert_eq!(machine.navigate(Direction::Previous), NavOutcome::Waiting);

    machine.commit_page(2, spans(1));
    assert_eq!(machine.selected(), Some(Selection::new(1, 0)));

    assert!(machine.commit_page(0, spans(2)));
    assert_eq!(machine.selected(), Some(Selection::new(0, 1)));
    assert!(!machine.wrapped());
}

#[test]
fn test_counts_only_include_scanned_pages() {
    let mut machine = SelectionMachine::new(3);
    machine.commit_page(2, spans(2));
    machine.start_seek(2, Direction::Next);
    assert_eq!(machine.matches_count(), MatchesCount { current: 1, total: 2 });

    machine.commit_page(0, spans(3));
    assert_eq!(machine.matches_count(), MatchesCount { current: 4, total: 5 });
    assert_eq!(machine.selected_span(), Some(MatchSpan::new(0, 3)));
}

#[test]
fn test_reset_clears_everything() {
    let mut machine = scanned(&[1]);
    machine.start_seek(0, Direction::Next);
    machine.reset(2);
    assert_eq!(machine.page_count(), 2);
    assert_eq!(machine.selected(), None);
    assert_eq!(machine.total(), 0);
    assert!(!machine.is_scanned(0));
    assert!(machine.page_matches(0).is_empty());
}

#[test]
fn test_reversed_waiting_seek_still_visits_every_page() {
    let mut machine = SelectionMachine::new(5);
    machine.commit_page(0, Vec::new());
    assert_eq!(machine.start_seek(0, Direction::Next), NavOutcome::Waiting);
    assert_eq!(machine.navigate(Direction::Previous), NavOutcome::Waiting);

    for page in 1..5 {
        machine.commit_page(page, spans(usize::from(page == 2)));
    }
    assert_eq!(machine.selected(), Some(Selection::new(2, 0)));
    assert!(machine.wrapped());
    assert!(!machine.is_seeking());
}

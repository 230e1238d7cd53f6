use super::*;
use crate::kernel::effect::{UPDATE_FIND_CONTROL_STATE, UPDATE_TEXT_LAYER_MATCHES};
use crate::kernel::services::adapters::InMemoryDocument;
use crate::kernel::{ControlState, QueryFlags};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn host_with(pages: &[&str]) -> FindHost {
    let mut host = FindHost::new(FindConfig {
        debounce_ms: 0,
        pages_per_tick: 8,
        ..FindConfig::default()
    });
    let (_, document) = InMemoryDocument::from_pages(pages.iter().copied()).into_document();
    host.attach_document(Some(document));
    host
}

fn record(host: &mut FindHost, name: &'static str) -> Rc<RefCell<Vec<FindEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    host.bus_mut()
        .subscribe(name, move |event| sink.borrow_mut().push(event.clone()));
    seen
}

#[test]
fn test_pump_drains_queued_commands() {
    let mut host = host_with(&["alpha beta", "beta"]);
    let states = record(&mut host, UPDATE_FIND_CONTROL_STATE);
    let sender = host.command_sender();

    sender
        .send(FindCommand::search("beta", QueryFlags::default(), false))
        .unwrap();
    let now = Instant::now();
    host.pump(now);

    assert!(host.is_idle());
    assert_eq!(host.scheduler().matches_count().total, 2);
    let last = states.borrow().last().cloned();
    assert!(matches!(
        last,
        Some(FindEvent::ControlStateUpdated {
            state: ControlState::Found,
            ..
        })
    ));
}

#[test]
fn test_commands_without_document_are_ignored() {
    let mut host = FindHost::new(FindConfig::default());
    let pages = record(&mut host, UPDATE_TEXT_LAYER_MATCHES);
    host.execute(FindCommand::Close, Instant::now());
    host.pump(Instant::now());
    assert!(pages.borrow().is_empty());
    assert!(host.is_idle());
}

#[test]
fn test_next_deadline_follows_debounce() {
    let mut host = FindHost::new(FindConfig::default());
    let (_, document) = InMemoryDocument::from_pages(["a"]).into_document();
    host.attach_document(Some(document));

    let now = Instant::now();
    assert_eq!(host.next_deadline(now), None);
    host.execute(FindCommand::search("a", QueryFlags::default(), false), now);
    assert_eq!(host.next_deadline(now), Some(now + Duration::from_millis(250)));
    assert!(!host.is_idle());

    host.pump(now + Duration::from_millis(250));
    assert!(host.is_idle());
    assert_eq!(host.next_deadline(now), None);
}

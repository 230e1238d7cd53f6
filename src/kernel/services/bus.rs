use rustc_hash::FxHashMap;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::kernel::{FindCommand, FindEvent};

#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<FindCommand>,
}

pub struct CommandReceiver {
    rx: Receiver<FindCommand>,
}

pub fn command_bus() -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel();
    (CommandSender { tx }, CommandReceiver { rx })
}

impl CommandSender {
    pub fn send(&self, cmd: FindCommand) -> Result<(), mpsc::SendError<FindCommand>> {
        self.tx.send(cmd)
    }
}

impl CommandReceiver {
    pub fn try_recv(&mut self) -> Result<FindCommand, TryRecvError> {
        self.rx.try_recv()
    }
}

pub type Subscriber = Box<dyn FnMut(&FindEvent)>;

/// Outbound events keyed by name. Subscribers run synchronously, in the
/// order they subscribed.
#[derive(Default)]
pub struct EventBus {
    subscribers: FxHashMap<&'static str, Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, name: &'static str, callback: F)
    where
        F: FnMut(&FindEvent) + 'static,
    {
        self.subscribers
            .entry(name)
            .or_default()
            .push(Box::new(callback));
    }

    /// Delivers `event` to everyone subscribed under its name.
    pub fn dispatch(&mut self, event: &FindEvent) -> usize {
        let Some(subscribers) = self.subscribers.get_mut(event.name()) else {
            return 0;
        };
        for callback in subscribers.iter_mut() {
            callback(event);
        }
        subscribers.len()
    }

    pub fn subscriber_count(&self, name: &str) -> usize {
        self.subscribers.get(name).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.subscribers.keys().collect();
        names.sort();
        f.debug_struct("EventBus").field("events", &names).finish()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/bus.rs"]
mod tests;

use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use super::bus::{command_bus, CommandReceiver, CommandSender, EventBus};
use super::ports::{Document, FindConfig};
use crate::kernel::{FindCommand, FindEvent, SearchScheduler};

/// Glues the command channel and the event bus to one scheduler.
pub struct FindHost {
    scheduler: SearchScheduler,
    bus: EventBus,
    tx: CommandSender,
    rx: CommandReceiver,
}

impl FindHost {
    pub fn new(config: FindConfig) -> Self {
        let (tx, rx) = command_bus();
        Self {
            scheduler: SearchScheduler::new(config),
            bus: EventBus::new(),
            tx,
            rx,
        }
    }

    pub fn command_sender(&self) -> CommandSender {
        self.tx.clone()
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub fn scheduler(&self) -> &SearchScheduler {
        &self.scheduler
    }

    pub fn attach_document(&mut self, document: Option<Document>) {
        self.scheduler.attach_document(document);
    }

    /// Handles one command right away and publishes what it produced.
    pub fn execute(&mut self, cmd: FindCommand, now: Instant) {
        let events = self.scheduler.handle(cmd, now);
        self.publish(events);
    }

    /// Drains queued commands, then advances the scheduler once.
    pub fn pump(&mut self, now: Instant) {
        loop {
            match self.rx.try_recv() {
                Ok(cmd) => self.execute(cmd, now),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        let events = self.scheduler.tick(now);
        self.publish(events);
    }

    pub fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.scheduler.next_deadline(now)
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    fn publish(&mut self, events: Vec<FindEvent>) {
        for event in &events {
            let delivered = self.bus.dispatch(event);
            tracing::trace!(event = event.name(), delivered, "find event published");
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/host.rs"]
mod tests;

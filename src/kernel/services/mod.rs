//! Services layer (ports + adapters).
//!
//! - `ports`: collaborator contracts and config types (kernel-facing).
//! - `adapters`: file system and in-memory implementations.

pub mod adapters;
pub mod bus;
pub mod host;
pub mod ports;

pub use bus::{command_bus, CommandReceiver, CommandSender, EventBus, Subscriber};
pub use host::FindHost;

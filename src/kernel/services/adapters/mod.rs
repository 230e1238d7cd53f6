//! Service adapters: file system and in-memory implementations of the ports.

pub mod config;
pub mod memory;

pub use config::{ensure_config_file, get_config_path, load_config, ConfigError};
pub use memory::InMemoryDocument;

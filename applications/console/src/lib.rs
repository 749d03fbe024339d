//! Cadence Console Library
//!
//! Terminal front-end for the Cadence player: command parsing, configuration
//! and a session driving the playback controller with a simulated engine.
//!
//! This library exposes the core components for testing purposes.

pub mod commands;
pub mod config;
pub mod session;

// Re-export commonly used types for convenience
pub use commands::{Command, CommandError, SeekTarget};
pub use config::{ConsoleConfig, EngineSettings, LibrarySettings};
pub use session::{load_library, Session};

//! Shared kernel for the Spotter dialogue manager.
//!
//! Defines the error taxonomy, configuration, and the domain and
//! conversation value objects consumed by the memory and dialogue crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::SpotterConfig;
pub use error::{Result, SpotterError};
pub use types::*;

//! Comparo Core - shared data model, provider traits and ambient infrastructure
//!
//! Error handling, configuration and logging used by every comparo crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;

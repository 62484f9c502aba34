//! Shared Module
//!
//! Types shared by the REST client, the store and the push channel: the
//! board domain model, the board event catalog, shared errors and the
//! application configuration.
//!
//! Nothing in here performs I/O. All types are designed for serialization
//! and transmission over HTTP.

/// Board domain model
pub mod models;

/// Push-channel event catalog
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{BoardEvent, EventKind};

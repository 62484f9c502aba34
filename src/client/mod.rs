//! Client Module
//!
//! Everything that talks to the board server: the REST wrappers, the
//! Socket.IO push channel, the shared store and the session that ties
//! them together.

/// REST API client
pub mod api;

/// Client configuration
pub mod config;

/// Client error types
pub mod error;

/// Persisted display preferences
pub mod preferences;

/// Push-channel transport and event reconciliation
pub mod realtime;

/// Store actions
pub mod session;

/// Client-side state
pub mod store;

pub use api::ApiClient;
pub use config::Config;
pub use error::ClientError;
pub use preferences::Preferences;
pub use realtime::{ConnectionStatus, EventOutcome, SocketHandle, SocketUpdate};
pub use session::{ListenerExit, Session};
pub use store::{SharedStore, Store};

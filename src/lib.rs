//! BoardSync - Kanban Board Client Library
//!
//! BoardSync keeps a client-side copy of a kanban board (lists, cards and
//! their members, dates, checklists and activity) in step with the board
//! server. Local actions go through the REST API; changes made by other
//! clients arrive over a Socket.IO push channel and are reconciled into the
//! same store.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no I/O
//!   - Board domain model and its serde adapters
//!   - Push-channel event catalog
//!   - Configuration and shared errors
//!
//! - **`client`** - Everything that talks to the server
//!   - REST wrappers (`client::api`)
//!   - Store slices (`client::store`)
//!   - Engine.IO transport and event reconciliation (`client::realtime`)
//!   - Store actions (`client::session`)
//!
//! # Usage
//!
//! ```rust,no_run
//! use boardsync::client::{Config, Session};
//! use boardsync::shared::models::UserLogin;
//!
//! # async fn example() -> Result<(), boardsync::client::ClientError> {
//! let session = Session::new(Config::from_env()?)?;
//! session
//!     .login(&UserLogin {
//!         username: "alice".to_string(),
//!         password: "secret".to_string(),
//!         remember_me: None,
//!     })
//!     .await?;
//! session.load_board(1).await?;
//!
//! let mut socket = session.connect().await;
//! session.listen(&mut socket).await;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The store is shared as `Arc<tokio::sync::RwLock<Store>>`. Each event or
//! action takes the write lock once and never holds it across a request.

/// Shared types and data structures
pub mod shared;

/// REST client, push channel and store
pub mod client;

//! Client error hierarchy.
//!
//! `ClientError` is what every REST wrapper and store action returns. Store
//! lookup failures (`ReconcileError`) are folded in so an action that applies
//! its mutation to a tree that no longer holds the target reports it the same
//! way as a failed request.

use crate::client::store::ReconcileError;
use crate::shared::config::ConfigError;
use crate::shared::error::SharedError;
use thiserror::Error;

/// Errors from the REST client, the transport and store actions
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Failed to parse response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Preferences error: {0}")]
    Preferences(String),
}

impl ClientError {
    /// HTTP status of a failed request, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Unauthenticated => Some(401),
            _ => None,
        }
    }
}

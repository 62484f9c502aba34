//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Board, list and card fixtures
//! - A mock board server built on wiremock
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;
pub mod mock_server;

// Re-export commonly used utilities
pub use fixtures::*;
pub use mock_server::*;

//! Integration tests against a mock board server

mod api_test;
mod session_test;
mod transport_test;

//! HTTP API module.
//!
//! This module provides the HTTP server, API types and the SSE log stream
//! for the TeamTrack backend.

pub mod logs;
pub mod server;
pub mod types;

pub use server::{start_server, AppState};
pub use types::*;

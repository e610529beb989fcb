//! # wd-api
//!
//! HTTP API server for Watchdesk.
//!
//! Exposes one resource-oriented endpoint group per entity plus the
//! outbound notification endpoint, maps service errors onto transport
//! status codes, and serves the OpenAPI document.

pub mod dto;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(test)]
mod test_helpers;

pub use error::ApiError;
pub use server::{ApiServer, ApiServerConfig};
pub use state::AppState;

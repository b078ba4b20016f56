//! EventFlow Server - HTTP ingestion endpoint
//!
//! This crate exposes the [`ingest`] pipeline over HTTP:
//!
//! - `GET /health` - liveness probe
//! - `POST /events` - validate, enrich, and acknowledge one event
//!
//! Every response is a JSON envelope carrying permissive CORS headers plus
//! `X-Content-Type-Options: nosniff` and `X-Frame-Options: DENY`.
//!
//! | Outcome | Status | `code` |
//! |---------|--------|--------|
//! | accepted | 202 | - |
//! | body is not JSON | 400 | `INVALID_JSON` |
//! | schema violation | 400 | `VALIDATION_ERROR` |
//! | unknown route or method | 404 | `NOT_FOUND` |
//! | unexpected fault | 500 | `INTERNAL_ERROR` |
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ServerConfig, ServiceEnvironment};
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::{ColdStart, ServerState};

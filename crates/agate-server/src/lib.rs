//! HTTP server for Agate.
//!
//! Exposes CRUD endpoints for the six record families plus a few
//! cross-reference and assignment routes. Handlers only translate: path
//! segments become typed identifiers, JSON bodies become drafts or patches,
//! and service failures become a `{"error": ...}` envelope with a status
//! chosen by [`error::status_for`].

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, DATABASE_URL_ENV};
pub use error::{ApiError, ServerError, ServerResult};
pub use handler::HealthResponse;
pub use server::AgateServer;
pub use state::{AppState, HasService};

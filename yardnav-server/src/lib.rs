//! HTTP front end for yard wayfinding: route planning between lots and
//! per-device live navigation sessions.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::build_router;
pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

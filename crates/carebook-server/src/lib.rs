//! Carebook HTTP server.
//!
//! Thin JSON layer over the PostgreSQL storage crates: account management,
//! hospital and doctor registration, slot booking, and prescription
//! recording.

pub mod config;
pub mod handlers;
pub mod observability;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use server::{CarebookServer, ServerBuilder, build_app};
pub use state::AppState;

//! taskboard-server library surface.
//!
//! The binary in `main.rs` and the integration tests both assemble the
//! application from these modules.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schemas;
pub mod state;

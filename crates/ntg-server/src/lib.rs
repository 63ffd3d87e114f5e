//! # ntg-server
//!
//! Tournament-facing side of the contestant.
//!
//! This crate provides:
//! - `ProtocolServer`: bind, accept exactly one game connection, serve it
//! - `serve_connection`: the line loop turning `STATE END` blocks into engine requests

pub mod config;
pub mod server;
pub mod session;

pub use config::ServerConfig;
pub use server::ProtocolServer;
pub use session::{SessionSummary, serve_connection};

#[cfg(test)]
mod test_engine;

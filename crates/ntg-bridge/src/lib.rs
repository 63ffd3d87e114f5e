//! Shared line transports for the contestant bridge
//!
//! This crate provides:
//! - Transport abstractions (AsyncLineReader/AsyncLineWriter traits)
//! - Buffered implementations over any tokio reader/writer
//! - TCP transport for the tournament connection
//! - Child-process pipe transport for the move engine

pub mod pipe;
pub mod tcp;
pub mod transport;

pub use transport::{AsyncLineReader, AsyncLineWriter, LineReader, LineWriter, preview};

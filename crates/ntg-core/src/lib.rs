//! # ntg-core
//!
//! Core types shared by every piece of the contestant bridge.
//!
//! This crate provides:
//! - The error taxonomy and process exit codes
//! - `StateBlock` and `Move`, the request/response pair of one turn
//! - The `STATE END` framing codec used on both the network and engine boundaries

pub mod block;
pub mod error;
pub mod framing;

pub use block::{Move, StateBlock};
pub use error::{ContestantError, Result, exit_codes};
pub use framing::{BlockDecoder, SENTINEL, decode_blocks, encode_block, strip_line_terminator};

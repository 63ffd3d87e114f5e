//! Move engine adapters
//!
//! The move-computation algorithm lives in an external executable. This crate owns that
//! process and the request/response protocol used to ask it for a move:
//! - `MoveEngine` trait, the contract the server drives
//! - `PipeEngine`, one long-lived child reused for every state block
//! - `SpawnPerMoveEngine`, a fresh child per block with the state as its last argument

pub mod config;
pub mod engine;
pub mod persistent;
pub mod spawn;

pub use config::{EngineConfig, EngineMode};
pub use engine::MoveEngine;
pub use persistent::PipeEngine;
pub use spawn::SpawnPerMoveEngine;

/// Build the engine selected by `config.mode`
pub fn engine_from_config(config: EngineConfig) -> Box<dyn MoveEngine> {
    match config.mode {
        EngineMode::Persistent => Box::new(PipeEngine::new(config)),
        EngineMode::SpawnPerMove => Box::new(SpawnPerMoveEngine::new(config)),
    }
}

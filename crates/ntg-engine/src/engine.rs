//! Move engine trait

use async_trait::async_trait;
use ntg_core::{Move, Result, StateBlock};

/// Trait for implementing move engines
///
/// The protocol is strictly half-duplex: one state block in, one move out. Methods take
/// `&mut self`, so a caller holding the engine can never have two requests in flight.
#[async_trait]
pub trait MoveEngine: Send {
    /// Launch the engine if it is not already running. Idempotent.
    async fn open(&mut self) -> Result<()>;

    /// Ask the engine for its move given one state block
    ///
    /// Fails with `EngineNotRunning` before `open`, never with a default move.
    async fn compute_move(&mut self, block: &StateBlock) -> Result<Move>;

    /// Terminate the engine and release its pipes. A no-op when not open.
    async fn close(&mut self) -> Result<()>;

    /// Whether the engine is ready to compute moves
    fn is_open(&self) -> bool;
}

#[async_trait]
impl<E: MoveEngine + ?Sized> MoveEngine for Box<E> {
    async fn open(&mut self) -> Result<()> {
        (**self).open().await
    }

    async fn compute_move(&mut self, block: &StateBlock) -> Result<Move> {
        (**self).compute_move(block).await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

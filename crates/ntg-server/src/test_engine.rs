//! In-memory engine for server tests

use async_trait::async_trait;
use ntg_core::{ContestantError, Move, Result, StateBlock};
use ntg_engine::MoveEngine;

/// Records every block it is asked about and answers `move<N>`
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub received: Vec<StateBlock>,
    fail_at: Option<usize>,
    open: bool,
}

impl RecordingEngine {
    /// An engine that is already open
    pub fn new() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }

    /// Fails the `n`th request (1-based) with a communication error
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_at: Some(n),
            ..Self::new()
        }
    }
}

#[async_trait]
impl MoveEngine for RecordingEngine {
    async fn open(&mut self) -> Result<()> {
        self.open = true;
        Ok(())
    }

    async fn compute_move(&mut self, block: &StateBlock) -> Result<Move> {
        if !self.open {
            return Err(ContestantError::EngineNotRunning("closed".into()));
        }
        self.received.push(block.clone());
        let n = self.received.len();
        if self.fail_at == Some(n) {
            return Err(ContestantError::EngineCommunication("engine went away".into()));
        }
        Move::parse(&format!("move{}", n))
    }

    async fn close(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

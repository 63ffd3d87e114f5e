//! Spawn-per-move engine: a fresh child process for every state block
//!
//! Simpler than the persistent pipe but pays a process launch per move and keeps no
//! state between moves. The block is passed as the last command-line argument.

use crate::config::EngineConfig;
use crate::engine::MoveEngine;
use async_trait::async_trait;
use ntg_bridge::{AsyncLineReader, LineReader, preview};
use ntg_core::{ContestantError, Move, Result, StateBlock};
use std::process::Stdio;
use tokio::io::BufReader;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

pub struct SpawnPerMoveEngine {
    config: EngineConfig,
    ready: bool,
}

impl SpawnPerMoveEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ready: false,
        }
    }

    fn spawn(&self, block: &StateBlock) -> Result<Child> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .arg(block.to_payload())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }
        cmd.spawn().map_err(|e| {
            ContestantError::EngineLaunch(format!(
                "Failed to spawn {}: {}",
                self.config.command_line(),
                e
            ))
        })
    }

    /// Give the child the grace period to exit after replying, then kill it
    async fn reap(&self, child: &mut Child) {
        match tokio::time::timeout(self.config.shutdown_grace, child.wait()).await {
            Ok(Ok(status)) => debug!("Per-move engine exited ({})", status),
            Ok(Err(e)) => warn!("Failed to wait for per-move engine: {}", e),
            Err(_) => {
                warn!("Per-move engine lingered after replying, killing it");
                let _ = child.kill().await;
            }
        }
    }
}

#[async_trait]
impl MoveEngine for SpawnPerMoveEngine {
    async fn open(&mut self) -> Result<()> {
        let program = &self.config.program;
        // Bare names are resolved through PATH at spawn time
        if program.components().count() > 1 && !program.exists() {
            return Err(ContestantError::EngineLaunch(format!(
                "Engine executable not found: {}",
                program.display()
            )));
        }
        if !self.ready {
            info!("Engine ready (spawn per move): {}", self.config.command_line());
        }
        self.ready = true;
        Ok(())
    }

    async fn compute_move(&mut self, block: &StateBlock) -> Result<Move> {
        if !self.ready {
            return Err(ContestantError::EngineNotRunning(
                "open the engine before requesting a move".into(),
            ));
        }

        let mut child = self.spawn(block)?;
        debug!("[Rust→Engine] spawned PID {:?} with {} lines", child.id(), block.len());

        let stdout = child.stdout.take().ok_or_else(|| {
            ContestantError::EngineCommunication("engine stdout is not piped".into())
        })?;
        let mut reader = LineReader::new(BufReader::new(stdout));

        let read = reader.read_line();
        let reply = match self.config.response_timeout {
            Some(limit) => match tokio::time::timeout(limit, read).await {
                Ok(reply) => reply,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(ContestantError::EngineTimeout(limit));
                }
            },
            None => read.await,
        };
        drop(reader);
        self.reap(&mut child).await;

        let reply = reply
            .map_err(|e| {
                ContestantError::EngineCommunication(format!("Failed to read engine reply: {}", e))
            })?
            .ok_or_else(|| {
                ContestantError::EngineCommunication("engine exited without replying".into())
            })?;

        debug!("[Engine→Rust] {}", preview(&reply));
        Move::parse(&reply)
    }

    async fn close(&mut self) -> Result<()> {
        self.ready = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_compute_before_open_fails() {
        let mut engine = SpawnPerMoveEngine::new(EngineConfig::new("unused-engine"));
        let err = engine.compute_move(&StateBlock::new()).await.unwrap_err();
        assert!(matches!(err, ContestantError::EngineNotRunning(_)));
    }

    #[tokio::test]
    async fn test_open_rejects_missing_path() {
        let mut engine = SpawnPerMoveEngine::new(EngineConfig::new("/nonexistent/ntg-engine"));
        let err = engine.open().await.unwrap_err();
        assert!(matches!(err, ContestantError::EngineLaunch(_)));
        assert!(!engine.is_open());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_payload_is_last_argument() {
        // sh -c SCRIPT NAME PAYLOAD: the payload lands in $1
        let config = EngineConfig::new("sh").with_args([
            "-c",
            "printf '%s' \"$1\" | head -n 1",
            "engine",
        ]);
        let mut engine = SpawnPerMoveEngine::new(config);
        engine.open().await.unwrap();

        let mv = engine
            .compute_move(&StateBlock::from_lines(["-4 3", "ignored"]))
            .await
            .unwrap();
        assert_eq!(mv.as_str(), "-4 3");

        engine.close().await.unwrap();
        assert!(!engine.is_open());
    }
}

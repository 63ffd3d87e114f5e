//! Persistent-pipe engine: one child process reused for every state block

use crate::config::EngineConfig;
use crate::engine::MoveEngine;
use async_trait::async_trait;
use ntg_bridge::pipe::{PipeLineReader, PipeLineWriter, take_pipes};
use ntg_bridge::{AsyncLineReader, AsyncLineWriter, preview};
use ntg_core::{ContestantError, Move, Result, SENTINEL, StateBlock};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Running engine process and its pipe endpoints
struct EngineHandle {
    child: Child,
    reader: PipeLineReader,
    writer: PipeLineWriter,
}

/// Engine backed by a long-lived child process
///
/// Each request writes the block's lines and `STATE END` to the child's stdin, then waits
/// for exactly one line on its stdout. After any communication failure the child is killed
/// and the engine reports not-open; only an explicit `open` relaunches it.
pub struct PipeEngine {
    config: EngineConfig,
    handle: Option<EngineHandle>,
}

impl PipeEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            handle: None,
        }
    }

    /// OS process id of the running engine
    pub fn pid(&self) -> Option<u32> {
        self.handle.as_ref().and_then(|h| h.child.id())
    }

    fn spawn_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Kill a broken engine so a dead child never lingers behind a not-open handle
    async fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            let _ = handle.child.start_kill();
            match handle.child.wait().await {
                Ok(status) => debug!("Engine torn down ({})", status),
                Err(e) => warn!("Failed to reap engine after teardown: {}", e),
            }
        }
    }
}

/// One request/response exchange over the engine pipes
async fn exchange(handle: &mut EngineHandle, block: &StateBlock) -> Result<Move> {
    let write_err = |e: std::io::Error| {
        ContestantError::EngineCommunication(format!("Failed to write to engine: {}", e))
    };

    for line in block.lines() {
        handle.writer.write_line(line).await.map_err(write_err)?;
    }
    handle.writer.write_line(SENTINEL).await.map_err(write_err)?;
    handle.writer.flush().await.map_err(write_err)?;
    debug!("[Rust→Engine] {} lines + {}", block.len(), SENTINEL);

    let reply = handle
        .reader
        .read_line()
        .await
        .map_err(|e| {
            ContestantError::EngineCommunication(format!("Failed to read engine reply: {}", e))
        })?
        .ok_or_else(|| {
            ContestantError::EngineCommunication(
                "engine closed its output before replying".into(),
            )
        })?;

    debug!("[Engine→Rust] {}", preview(&reply));
    Move::parse(&reply)
}

/// Bound a whole exchange, writes included, by the configured response timeout
async fn exchange_within(
    handle: &mut EngineHandle,
    block: &StateBlock,
    response_timeout: Option<Duration>,
) -> Result<Move> {
    match response_timeout {
        Some(limit) => tokio::time::timeout(limit, exchange(handle, block))
            .await
            .unwrap_or(Err(ContestantError::EngineTimeout(limit))),
        None => exchange(handle, block).await,
    }
}

#[async_trait]
impl MoveEngine for PipeEngine {
    async fn open(&mut self) -> Result<()> {
        if self.handle.is_some() {
            debug!("Engine already running (PID: {:?})", self.pid());
            return Ok(());
        }

        let command_line = self.config.command_line();
        let mut child = self.spawn_command().spawn().map_err(|e| {
            ContestantError::EngineLaunch(format!("Failed to spawn {}: {}", command_line, e))
        })?;
        let (reader, writer) = take_pipes(&mut child).map_err(|e| {
            ContestantError::EngineLaunch(format!("Failed to capture engine pipes: {}", e))
        })?;

        info!("Engine started: {} (PID: {:?})", command_line, child.id());
        self.handle = Some(EngineHandle {
            child,
            reader,
            writer,
        });
        Ok(())
    }

    async fn compute_move(&mut self, block: &StateBlock) -> Result<Move> {
        let handle = self.handle.as_mut().ok_or_else(|| {
            ContestantError::EngineNotRunning("open the engine before requesting a move".into())
        })?;

        let result = exchange_within(handle, block, self.config.response_timeout).await;
        if let Err(e) = &result {
            warn!("Engine request failed, terminating engine: {}", e);
            self.teardown().await;
        }
        result
    }

    async fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        let EngineHandle {
            mut child,
            reader,
            writer,
        } = handle;

        // EOF on stdin asks the engine to finish on its own
        drop(writer);
        drop(reader);

        let grace = self.config.shutdown_grace;
        match tokio::time::timeout(grace, child.wait()).await {
            Ok(Ok(status)) => {
                info!("Engine exited ({})", status);
                Ok(())
            }
            Ok(Err(e)) => Err(ContestantError::EngineCommunication(format!(
                "Failed to wait for engine: {}",
                e
            ))),
            Err(_) => {
                warn!("Engine still running {:?} after stdin closed, killing it", grace);
                child.kill().await.map_err(|e| {
                    ContestantError::EngineCommunication(format!("Failed to kill engine: {}", e))
                })
            }
        }
    }

    fn is_open(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for PipeEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            let _ = handle.child.start_kill();
        }
    }
}

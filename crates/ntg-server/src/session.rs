//! Per-connection line loop

use ntg_bridge::{AsyncLineReader, AsyncLineWriter, preview};
use ntg_core::{BlockDecoder, ContestantError, Result};
use ntg_engine::MoveEngine;
use tracing::{debug, info, warn};

/// What happened during one game connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// State blocks answered, equal to reply lines written
    pub blocks_served: u64,
    /// Lines read from the connection, sentinels included
    pub lines_received: u64,
    /// Lines of an unfinished block dropped at end-of-stream
    pub discarded_lines: u64,
}

/// Serve one game connection until end-of-stream
///
/// Every `STATE END` line completes a block, which is sent to the engine; its move is
/// written back as one flushed line before the next line is read. A partial block left
/// at end-of-stream is discarded without consulting the engine.
///
/// Network faults map to `Connection`. Engine errors are returned unchanged and end the
/// session; no move is invented in their place.
pub async fn serve_connection<R, W, E>(
    mut reader: R,
    mut writer: W,
    engine: &mut E,
) -> Result<SessionSummary>
where
    R: AsyncLineReader,
    W: AsyncLineWriter,
    E: MoveEngine + ?Sized,
{
    let mut decoder = BlockDecoder::new();
    let mut summary = SessionSummary::default();

    loop {
        let line = match reader.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Game connection closed (EOF)");
                break;
            }
            Err(e) => {
                return Err(ContestantError::Connection(format!(
                    "Failed to read from game connection: {}",
                    e
                )));
            }
        };
        summary.lines_received += 1;
        debug!("[Game→Rust] {}", preview(&line));

        let Some(block) = decoder.push_line(&line) else {
            continue;
        };

        let mv = engine.compute_move(&block).await?;
        writer.send_line(mv.as_str()).await.map_err(|e| {
            ContestantError::Connection(format!("Failed to write move to game connection: {}", e))
        })?;
        summary.blocks_served += 1;
        debug!("[Rust→Game] {} (block {})", mv, summary.blocks_served);
    }

    let partial = decoder.take_partial();
    if !partial.is_empty() {
        warn!(
            "Connection ended mid-block, discarding {} buffered lines",
            partial.len()
        );
    }
    summary.discarded_lines = partial.len() as u64;
    Ok(summary)
}

//! Listening endpoint and single-game lifecycle

use crate::config::ServerConfig;
use crate::session::{SessionSummary, serve_connection};
use ntg_bridge::tcp::split_stream;
use ntg_core::{ContestantError, Result};
use ntg_engine::MoveEngine;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Tournament-facing server: one listener, one accepted connection, one game
///
/// The listener and the connection are owned values, so both are released on every
/// exit path, errors included.
pub struct ProtocolServer {
    listener: TcpListener,
    config: ServerConfig,
}

impl ProtocolServer {
    /// Bind the listening endpoint. Failure is `Bind` and is not retried.
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ContestantError::Bind(format!("Failed to bind {}: {}", addr, e)))?;

        if let Ok(local) = listener.local_addr() {
            info!("Listening for the tournament on {}", local);
        }
        Ok(Self {
            listener,
            config: config.clone(),
        })
    }

    /// Bind and serve one game
    pub async fn start<E>(config: &ServerConfig, engine: &mut E) -> Result<SessionSummary>
    where
        E: MoveEngine + ?Sized,
    {
        Self::bind(config).await?.run(engine).await
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| ContestantError::Bind(format!("Failed to read local address: {}", e)))
    }

    /// Accept exactly one connection and serve it until the tournament hangs up
    pub async fn run<E>(self, engine: &mut E) -> Result<SessionSummary>
    where
        E: MoveEngine + ?Sized,
    {
        let (stream, peer) = self.listener.accept().await.map_err(|e| {
            ContestantError::Connection(format!("Failed to accept game connection: {}", e))
        })?;
        info!("Game connection from {}", peer);

        // One game per process: nothing else will be accepted
        drop(self.listener);

        let (reader, writer) = split_stream(stream, self.config.nodelay).map_err(|e| {
            ContestantError::Connection(format!("Failed to configure game connection: {}", e))
        })?;

        let result = serve_connection(reader, writer, engine).await;
        match &result {
            Ok(summary) => info!(
                "Game over: {} moves sent, {} lines received",
                summary.blocks_served, summary.lines_received
            ),
            Err(e) => error!("Game ended abnormally: {}", e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_engine::RecordingEngine;
    use ntg_core::StateBlock;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpStream;

    async fn local_server() -> (ProtocolServer, SocketAddr) {
        let server = ProtocolServer::bind(&ServerConfig::localhost(0)).await.unwrap();
        let addr = server.local_addr().unwrap();
        (server, addr)
    }

    #[tokio::test]
    async fn test_replies_in_block_order() {
        let (server, addr) = local_server().await;
        let game = tokio::spawn(async move {
            let mut engine = RecordingEngine::new();
            let summary = server.run(&mut engine).await.unwrap();
            (summary, engine.received)
        });

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut replies = BufReader::new(read_half).lines();

        for i in 1..=5 {
            let block = format!("ADDING\n{} -{} Red {}\nSTATE END\n", i % 2, i, i);
            write_half.write_all(block.as_bytes()).await.unwrap();
            let reply = replies.next_line().await.unwrap().unwrap();
            assert_eq!(reply, format!("move{}", i));
        }
        drop(write_half);
        assert!(replies.next_line().await.unwrap().is_none());

        let (summary, received) = game.await.unwrap();
        assert_eq!(summary.blocks_served, 5);
        assert_eq!(received[2], StateBlock::from_lines(["ADDING", "1 -3 Red 3"]));
    }

    #[tokio::test]
    async fn test_disconnect_mid_block_releases_everything() {
        let (server, addr) = local_server().await;
        let game = tokio::spawn(async move {
            let mut engine = RecordingEngine::new();
            let summary = server.run(&mut engine).await.unwrap();
            (summary, engine.received.len())
        });

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"REMOVING\n1 4 Blue 2\n").await.unwrap();
        stream.shutdown().await.unwrap();
        let mut rest = Vec::new();
        stream.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());

        let (summary, engine_calls) = game.await.unwrap();
        assert_eq!(engine_calls, 0);
        assert_eq!(summary.discarded_lines, 2);

        // Listener is gone once the game is over
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_bind_conflict_is_bind_error() {
        let (server, addr) = local_server().await;
        let err = match ProtocolServer::bind(&ServerConfig::localhost(addr.port())).await {
            Ok(_) => panic!("second bind on {} should fail", addr),
            Err(e) => e,
        };
        assert!(matches!(err, ContestantError::Bind(_)));
        assert!(err.is_fatal());
        drop(server);
    }

    #[tokio::test]
    async fn test_start_serves_one_game() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let game = tokio::spawn(async move {
            let mut engine = RecordingEngine::new();
            ProtocolServer::start(&ServerConfig::localhost(port), &mut engine).await
        });

        let stream = loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => break stream,
                Err(_) => tokio::task::yield_now().await,
            }
        };
        let (read_half, mut write_half) = stream.into_split();
        write_half.write_all(b"STATE END\n").await.unwrap();
        let mut replies = BufReader::new(read_half).lines();
        assert_eq!(replies.next_line().await.unwrap().as_deref(), Some("move1"));
        drop(write_half);

        let summary = game.await.unwrap().unwrap();
        assert_eq!(summary.blocks_served, 1);
    }
}

//! contestant: No Tipping tournament player
//!
//! Listens on the port registered with the tournament, accepts the single game
//! connection, and answers every `STATE END` block with the external engine's move.
//! The engine is configured through `NTG_ENGINE_*` environment variables.

use anyhow::{Context, Result};
use ntg_core::{ContestantError, exit_codes};
use ntg_engine::{EngineConfig, MoveEngine, engine_from_config};
use ntg_server::{ProtocolServer, ServerConfig};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const USAGE: &str = "Usage: contestant <port-number>";

fn parse_port(args: &[String]) -> Option<u16> {
    match args {
        [_, port] => port.parse().ok(),
        _ => None,
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// First contestant error in the chain
fn contestant_error(err: &anyhow::Error) -> Option<&ContestantError> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ContestantError>())
}

/// Exit code of the first contestant error in the chain
fn exit_code_for(err: &anyhow::Error) -> u8 {
    contestant_error(err)
        .map(ContestantError::exit_code)
        .unwrap_or(1)
}

/// How a failed run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// Could not take part at all: bind, launch or configuration
    Startup,
    /// Game was under way and had to be abandoned
    GameAborted,
    Other,
}

fn classify(err: &anyhow::Error) -> Failure {
    match contestant_error(err) {
        Some(e) if e.is_fatal() => Failure::Startup,
        Some(e) if e.ends_game() => Failure::GameAborted,
        _ => Failure::Other,
    }
}

fn report(err: &anyhow::Error) {
    match classify(err) {
        Failure::Startup => error!("Contestant could not start: {:#}", err),
        Failure::GameAborted => warn!("Game abandoned: {:#}", err),
        Failure::Other => error!("{:#}", err),
    }
}

async fn run(port: u16) -> Result<()> {
    let engine_config = EngineConfig::from_env().context("Invalid engine configuration")?;
    info!(
        "Engine: {} ({:?} mode)",
        engine_config.command_line(),
        engine_config.mode
    );

    let server = ProtocolServer::bind(&ServerConfig::with_port(port)).await?;

    let mut engine = engine_from_config(engine_config);
    engine.open().await.context("Engine failed to start")?;

    let outcome = tokio::select! {
        result = server.run(&mut engine) => result.map(Some),
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, shutting down");
            Ok(None)
        }
    };

    if let Err(e) = engine.close().await {
        warn!("Engine shutdown: {}", e);
    }

    if let Some(summary) = outcome? {
        if summary.discarded_lines > 0 {
            warn!(
                "Tournament hung up with {} unanswered state lines",
                summary.discarded_lines
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let Some(port) = parse_port(&args) else {
        eprintln!("{}", USAGE);
        return ExitCode::from(exit_codes::USAGE);
    };

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Contestant starting on port {}", port);
    match run(port).await {
        Ok(()) => {
            info!("Contestant finished");
            ExitCode::from(exit_codes::OK)
        }
        Err(err) => {
            report(&err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

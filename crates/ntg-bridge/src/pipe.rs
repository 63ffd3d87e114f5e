//! Child-process pipe transport for the move engine

use crate::transport::{LineReader, LineWriter};
use std::io;
use tokio::io::{BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tracing::debug;

/// Engine stdout side
pub type PipeLineReader = LineReader<BufReader<ChildStdout>>;

/// Engine stdin side
pub type PipeLineWriter = LineWriter<BufWriter<ChildStdin>>;

/// Take ownership of a spawned child's stdin/stdout pipes
///
/// The child must have been spawned with both streams piped.
pub fn take_pipes(child: &mut Child) -> io::Result<(PipeLineReader, PipeLineWriter)> {
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdin is not piped"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdout is not piped"))?;
    debug!("Captured stdin/stdout pipes of PID {:?}", child.id());
    Ok((
        LineReader::new(BufReader::new(stdout)),
        LineWriter::new(BufWriter::new(stdin)),
    ))
}

//! TCP transport for the tournament connection

use crate::transport::{LineReader, LineWriter};
use std::io;
use tokio::io::{BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::debug;

/// TCP read side
pub type TcpLineReader = LineReader<BufReader<OwnedReadHalf>>;

/// TCP write side
pub type TcpLineWriter = LineWriter<BufWriter<OwnedWriteHalf>>;

/// Prepare an accepted stream for line traffic and split it into reader and writer
///
/// Writes are buffered until `flush`, so each reply leaves as one segment. With `nodelay`
/// set, Nagle's algorithm is disabled so that segment goes out as soon as it is flushed.
pub fn split_stream(
    stream: TcpStream,
    nodelay: bool,
) -> io::Result<(TcpLineReader, TcpLineWriter)> {
    stream.set_nodelay(nodelay)?;
    debug!(
        "TCP connection {:?} -> {:?} ready (nodelay={})",
        stream.peer_addr().ok(),
        stream.local_addr().ok(),
        nodelay
    );
    let (read_half, write_half) = stream.into_split();
    Ok((
        LineReader::new(BufReader::new(read_half)),
        LineWriter::new(BufWriter::new(write_half)),
    ))
}

//! Transport abstractions for line-oriented peers
//!
//! Both peers of the contestant speak newline-terminated text, so every transport reduces
//! to "read one line" and "write one line". The traits let the server loop and the engine
//! adapter run unchanged over TCP, child pipes, or in-memory mocks.

use async_trait::async_trait;
use ntg_core::strip_line_terminator;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Trait for async reading of text lines
#[async_trait]
pub trait AsyncLineReader: Send {
    /// Read the next line without its terminator
    ///
    /// Returns `Ok(None)` at end-of-stream. A final line lacking a terminator is still
    /// returned before end-of-stream is reported.
    async fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Trait for async writing of text lines
#[async_trait]
pub trait AsyncLineWriter: Send {
    /// Write `line` followed by `\n`, without flushing
    async fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Push buffered output to the peer
    async fn flush(&mut self) -> io::Result<()>;

    /// Write one line and flush it immediately
    async fn send_line(&mut self, line: &str) -> io::Result<()> {
        self.write_line(line).await?;
        self.flush().await
    }
}

/// Line reader over any buffered tokio reader
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: String,
}

impl<R> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
        }
    }
}

#[async_trait]
impl<R> AsyncLineReader for LineReader<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        let bytes_read = self.inner.read_line(&mut self.buf).await?;
        if bytes_read == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_terminator(&self.buf).to_string()))
    }
}

/// Line writer over any tokio writer
///
/// Wrap unbuffered sockets and pipes in a `BufWriter` so a line and its terminator reach
/// the peer together on `flush`.
#[derive(Debug)]
pub struct LineWriter<W> {
    inner: W,
}

impl<W> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<W> AsyncLineWriter for LineWriter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.inner.write_all(line.as_bytes()).await?;
        self.inner.write_all(b"\n").await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().await
    }
}

/// Shortened form of a line for debug logs
pub fn preview(line: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    if line.chars().count() <= MAX_PREVIEW {
        line.to_string()
    } else {
        let head: String = line.chars().take(MAX_PREVIEW).collect();
        format!("{}...", head)
    }
}

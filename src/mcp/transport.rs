use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::debug;

use crate::mcp::{
    errors::{MCPResult, TransportError},
    protocol::{MCPMessage, MessageParser},
};

/// Abstract transport trait for MCP communication
#[async_trait]
pub trait MCPTransport: Send {
    /// Send a message through the transport
    async fn send(&mut self, message: MCPMessage) -> MCPResult<()>;

    /// Receive the next message, `None` once the peer has closed the stream.
    ///
    /// A frame that is not valid JSON yields a protocol error and leaves the
    /// transport usable.
    async fn receive(&mut self) -> MCPResult<Option<MCPMessage>>;
}

/// Newline-delimited JSON-RPC over a reader/writer pair
pub struct StdioTransport<R, W> {
    lines: Lines<R>,
    writer: W,
}

impl<R, W> StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: reader.lines(),
            writer,
        }
    }
}

impl StdioTransport<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Transport over the process stdin/stdout
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> MCPTransport for StdioTransport<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: MCPMessage) -> MCPResult<()> {
        let mut data = MessageParser::serialize_message(&message)?;
        data.push(b'\n');

        self.writer
            .write_all(&data)
            .await
            .map_err(TransportError::Io)?;
        self.writer.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }

    async fn receive(&mut self) -> MCPResult<Option<MCPMessage>> {
        while let Some(line) = self.lines.next_line().await.map_err(TransportError::Io)? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("Received line of {} bytes", line.len());
            return MessageParser::parse_message(line.as_bytes()).map(Some);
        }

        Ok(None)
    }
}

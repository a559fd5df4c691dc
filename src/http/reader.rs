use bytes::BytesMut;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::timeout;

use crate::config::Limits;

/// Chunk size for socket reads and file streaming.
pub const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("client closed the connection before a full header block arrived")]
    ConnectionClosed,
    #[error("request header block exceeds {0} bytes")]
    TooLarge(usize),
    #[error("timed out reading from client")]
    TimedOut,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Accumulate bytes from `stream` in fixed-size chunks until the buffer
/// contains a full header block, i.e. `\r\n\r\n` or `\n\n`. Returns the
/// accumulated bytes, which may extend past the terminator.
pub async fn read_header_block<S>(stream: &mut S, limits: &Limits) -> Result<BytesMut, ReadError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        let n = timeout(limits.io_timeout(), stream.read(&mut chunk))
            .await
            .map_err(|_| ReadError::TimedOut)??;

        if n == 0 {
            return Err(ReadError::ConnectionClosed);
        }

        buf.extend_from_slice(&chunk[..n]);

        if contains_terminator(&buf) {
            return Ok(buf);
        }

        if buf.len() > limits.max_header_bytes {
            return Err(ReadError::TooLarge(limits.max_header_bytes));
        }
    }
}

fn contains_terminator(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n") || buf.windows(2).any(|w| w == b"\n\n")
}

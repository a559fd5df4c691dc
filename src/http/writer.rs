use std::time::SystemTime;

use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::info;

use crate::config::Limits;
use crate::http::reader::CHUNK_SIZE;
use crate::http::response::{HeaderBlock, StatusData};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("timed out writing to client")]
    TimedOut,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Serialize and send the status line and header block, mirroring each
/// line to the log.
pub async fn send_header<W>(stream: &mut W, data: &StatusData, limits: &Limits) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    let block = HeaderBlock::build(data, SystemTime::now());

    info!("---");
    info!("{}", block.status_line);
    for line in &block.lines {
        info!("{}", line);
    }
    info!("---");

    write_all(stream, &block.to_bytes(), limits).await?;

    info!("Response headers sent");

    Ok(())
}

/// Send an in-memory body (directory listings).
pub async fn send_buffer<W>(stream: &mut W, buf: &[u8], limits: &Limits) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    write_all(stream, buf, limits).await
}

/// Stream the file to the client in fixed-size chunks until end of file.
/// The first read or write error aborts the stream.
pub async fn send_file<W>(stream: &mut W, file: &mut File, limits: &Limits) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        write_all(stream, &chunk[..n], limits).await?;
    }

    info!("Response body sent");

    Ok(())
}

async fn write_all<W>(stream: &mut W, bytes: &[u8], limits: &Limits) -> Result<(), WriteError>
where
    W: AsyncWrite + Unpin,
{
    timeout(limits.io_timeout(), stream.write_all(bytes))
        .await
        .map_err(|_| WriteError::TimedOut)??;

    Ok(())
}

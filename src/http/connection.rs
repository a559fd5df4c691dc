use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info};

use crate::files::resolver::{self, Resource};
use crate::http::parser;
use crate::http::reader::{self, ReadError};
use crate::http::request::Request;
use crate::http::response::{StatusCode, StatusData};
use crate::http::writer;
use crate::server::SiteContext;

/// A single accepted connection: one request in, one response out, close.
pub struct Connection<S> {
    stream: S,
    peer: String,
    ctx: Arc<SiteContext>,
}

enum ConnectionState {
    Reading,
    Parsing(BytesMut),
    Resolving(Request),
    RespondingFile {
        file: tokio::fs::File,
        size: u64,
        name: String,
    },
    RespondingDirectory {
        entries: Vec<String>,
        query_path: String,
    },
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: String, ctx: Arc<SiteContext>) -> Self {
        Self { stream, peer, ctx }
    }

    /// Drive the connection through its one-shot state machine. Every
    /// failure is handled and logged here; nothing propagates to the
    /// caller, and the stream (plus any opened file) is released exactly
    /// once when this returns.
    pub async fn run(mut self) {
        info!("Handling client socket {}", self.peer);

        let mut state = ConnectionState::Reading;
        loop {
            state = match state {
                ConnectionState::Reading => self.read().await,
                ConnectionState::Parsing(block) => self.parse(block).await,
                ConnectionState::Resolving(request) => self.resolve(request).await,
                ConnectionState::RespondingFile { file, size, name } => {
                    self.respond_file(file, size, name).await
                }
                ConnectionState::RespondingDirectory {
                    entries,
                    query_path,
                } => self.respond_directory(entries, query_path).await,
                ConnectionState::Closed => break,
            };
        }

        info!("Client connection {} closed", self.peer);
    }

    async fn read(&mut self) -> ConnectionState {
        match reader::read_header_block(&mut self.stream, &self.ctx.limits).await {
            Ok(block) => ConnectionState::Parsing(block),
            Err(e @ ReadError::TooLarge(_)) => {
                error!("{}: {}", self.peer, e);
                self.send_error(StatusCode::BadRequest).await;
                ConnectionState::Closed
            }
            Err(e) => {
                // The peer is gone or silent; there is no one to answer.
                error!("{}: {}", self.peer, e);
                ConnectionState::Closed
            }
        }
    }

    async fn parse(&mut self, block: BytesMut) -> ConnectionState {
        match parser::parse_request(&block) {
            Ok(request) => {
                info!(
                    "\"{} {} {}\" {} {} \"{}\"",
                    request.method,
                    request.path,
                    request.version,
                    self.peer,
                    request.host(),
                    request.user_agent()
                );
                ConnectionState::Resolving(request)
            }
            Err(e) => {
                error!("{}: {}", self.peer, e);
                self.send_error(StatusCode::BadRequest).await;
                ConnectionState::Closed
            }
        }
    }

    /// The resolving step answers its own failures: the mapped 404/403/500
    /// is sent here and later states never double-send.
    async fn resolve(&mut self, request: Request) -> ConnectionState {
        match resolver::resolve(&self.ctx.root, &request.path).await {
            Ok(Resource::File { file, size, name }) => {
                info!("Resolved {:?} to file {:?}", request.path, name);
                ConnectionState::RespondingFile { file, size, name }
            }
            Ok(Resource::Directory { entries }) => {
                info!("Resolved {:?} to a directory", request.path);
                ConnectionState::RespondingDirectory {
                    entries,
                    query_path: request.path,
                }
            }
            Err(e) => {
                error!("{} {:?}: {}", self.peer, request.path, e);
                self.send_error(e.status()).await;
                ConnectionState::Closed
            }
        }
    }

    async fn respond_file(
        &mut self,
        mut file: tokio::fs::File,
        size: u64,
        name: String,
    ) -> ConnectionState {
        let data = StatusData::file(size, name);
        if let Err(e) = writer::send_header(&mut self.stream, &data, &self.ctx.limits).await {
            error!("{}: {}", self.peer, e);
            return ConnectionState::Closed;
        }

        // Headers are committed; a failed body write can only be logged.
        if let Err(e) = writer::send_file(&mut self.stream, &mut file, &self.ctx.limits).await {
            error!("{}: file body not fully sent: {}", self.peer, e);
        }

        ConnectionState::Closed
    }

    async fn respond_directory(
        &mut self,
        entries: Vec<String>,
        query_path: String,
    ) -> ConnectionState {
        let buf = match self.ctx.template.render(&self.ctx.root, &query_path, &entries) {
            Ok(buf) => buf,
            Err(e) => {
                error!(
                    "{}: listing for {:?} not ready to send: {}",
                    self.peer, query_path, e
                );
                self.send_error(StatusCode::InternalServerError).await;
                return ConnectionState::Closed;
            }
        };

        let data = StatusData::listing(buf.len() as u64);
        if let Err(e) = writer::send_header(&mut self.stream, &data, &self.ctx.limits).await {
            error!("{}: {}", self.peer, e);
            return ConnectionState::Closed;
        }

        if let Err(e) = writer::send_buffer(&mut self.stream, &buf, &self.ctx.limits).await {
            error!(
                "{}: listing for {:?} not fully sent: {}",
                self.peer, query_path, e
            );
        }

        ConnectionState::Closed
    }

    /// Best-effort error response; a failed write here is only logged.
    async fn send_error(&mut self, code: StatusCode) {
        let data = StatusData::error(code);
        if let Err(e) = writer::send_header(&mut self.stream, &data, &self.ctx.limits).await {
            error!("{}: error response not sent: {}", self.peer, e);
        }
    }
}

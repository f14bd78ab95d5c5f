// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server client for observers and CLI commands

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use joust_storage::{Envelope, LogStatus, SessionEvent, SessionInfo};
use thiserror::Error;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;

use crate::protocol::{self, ProtocolError, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server not running at {}", .0.display())]
    NotRunning(PathBuf),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("server error: {0}")]
    Server(String),

    #[error("Unexpected response from server")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Whether reconnecting could help
    pub fn is_transient(&self) -> bool {
        !matches!(self, ClientError::Server(_) | ClientError::UnexpectedResponse)
    }
}

/// A connection to the session server
pub struct Client {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    server_version: String,
}

impl Client {
    /// Connect and exchange versions
    pub async fn connect(socket: &Path) -> Result<Self, ClientError> {
        let stream = UnixStream::connect(socket).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::ConnectionRefused => {
                ClientError::NotRunning(socket.to_path_buf())
            }
            _ => ClientError::Io(e),
        })?;
        let (reader, writer) = stream.into_split();
        let mut client = Self {
            reader,
            writer,
            server_version: String::new(),
        };

        let hello = Request::Hello {
            version: PROTOCOL_VERSION.to_string(),
        };
        match client.request(&hello).await? {
            Response::Hello { version } => {
                if version != PROTOCOL_VERSION {
                    tracing::warn!(server = %version, client = PROTOCOL_VERSION, "protocol version mismatch");
                }
                client.server_version = version;
                Ok(client)
            }
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    async fn request(&mut self, request: &Request) -> Result<Response, ClientError> {
        tokio::time::timeout(DEFAULT_TIMEOUT, protocol::send(&mut self.writer, request))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        let response = tokio::time::timeout(DEFAULT_TIMEOUT, protocol::recv(&mut self.reader))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        match response {
            Response::Error { message } => Err(ClientError::Server(message)),
            other => Ok(other),
        }
    }

    pub async fn sessions(&mut self) -> Result<Vec<SessionInfo>, ClientError> {
        match self.request(&Request::Sessions).await? {
            Response::Sessions { sessions } => Ok(sessions),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Replay `session` from `from` and follow it live
    pub async fn subscribe(self, session: &str, from: u64) -> Result<EventStream, ClientError> {
        self.open_stream(Request::Subscribe {
            session: session.to_string(),
            from,
        })
        .await
    }

    /// Follow the game events of one tournament match
    pub async fn subscribe_match(
        self,
        session: &str,
        match_id: &str,
    ) -> Result<EventStream, ClientError> {
        self.open_stream(Request::SubscribeMatch {
            session: session.to_string(),
            match_id: match_id.to_string(),
        })
        .await
    }

    async fn open_stream(mut self, request: Request) -> Result<EventStream, ClientError> {
        tokio::time::timeout(DEFAULT_TIMEOUT, protocol::send(&mut self.writer, &request))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        Ok(EventStream {
            reader: self.reader,
            _writer: self.writer,
        })
    }
}

/// One item of a subscription
#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem {
    Event(Envelope<SessionEvent>),
    End(LogStatus),
}

/// Frames of an open subscription. No read timeout: a live session
/// may stay quiet for as long as an agent thinks.
pub struct EventStream {
    reader: OwnedReadHalf,
    _writer: OwnedWriteHalf,
}

impl EventStream {
    pub async fn next(&mut self) -> Result<StreamItem, ClientError> {
        match protocol::recv(&mut self.reader).await? {
            Response::Event { envelope, .. } => Ok(StreamItem::Event(envelope)),
            Response::End { status } => Ok(StreamItem::End(status)),
            Response::Error { message } => Err(ClientError::Server(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

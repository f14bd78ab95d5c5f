// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use std::future::Future;
use std::path::{Path, PathBuf};

use joust_storage::{BroadcastError, Broadcaster, Feed, LogStatus};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::net::UnixListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::protocol::{self, ProtocolError, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Bind the server socket, replacing a stale socket file
pub fn bind(path: &Path) -> Result<UnixListener, ServerError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|source| ServerError::Bind {
            path: path.to_path_buf(),
            source,
        })?;
    }
    UnixListener::bind(path).map_err(|source| ServerError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

/// Accept observers until `shutdown` resolves. Each connection runs on
/// its own task, so a slow observer only delays itself.
pub async fn serve<F>(listener: UnixListener, broadcaster: Broadcaster, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        let broadcaster = broadcaster.clone();
                        connections.spawn(async move {
                            if let Err(e) = handle_connection(&broadcaster, stream).await {
                                warn!(error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "failed to accept connection");
                    }
                }
            }

            Some(_) = connections.join_next(), if !connections.is_empty() => {}

            _ = &mut shutdown => {
                info!(open = connections.len(), "server shutting down");
                break;
            }
        }
    }
    connections.shutdown().await;
}

/// Handle a single client connection
pub async fn handle_connection<S>(broadcaster: &Broadcaster, stream: S) -> Result<(), ServerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut reader, mut writer) = tokio::io::split(stream);

    loop {
        let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
            Ok(req) => req,
            Err(ProtocolError::ConnectionClosed) => {
                debug!("client disconnected");
                return Ok(());
            }
            Err(ProtocolError::Timeout) => return Err(ServerError::Timeout),
            Err(e) => return Err(e.into()),
        };

        debug!(?request, "received request");

        let response = match request {
            Request::Hello { version } => {
                if version != PROTOCOL_VERSION {
                    warn!(client = %version, server = PROTOCOL_VERSION, "protocol version mismatch");
                }
                Response::Hello {
                    version: PROTOCOL_VERSION.to_string(),
                }
            }

            Request::Sessions => Response::Sessions {
                sessions: broadcaster.sessions(),
            },

            Request::Subscribe { session, from } => {
                let feed = broadcaster.subscribe(&session, from);
                return stream_feed(&mut reader, &mut writer, broadcaster, &session, feed).await;
            }

            Request::SubscribeMatch { session, match_id } => {
                let feed = broadcaster.subscribe_match(&session, &match_id);
                return stream_feed(&mut reader, &mut writer, broadcaster, &session, feed).await;
            }
        };

        protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;
    }
}

/// Forward a feed until it ends or the observer hangs up. A feed that ends
/// is followed by the session's status
async fn stream_feed<R, W>(
    reader: &mut R,
    writer: &mut W,
    broadcaster: &Broadcaster,
    session: &str,
    feed: Result<Feed, BroadcastError>,
) -> Result<(), ServerError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut feed = match feed {
        Ok(feed) => feed,
        Err(e) => {
            let response = Response::Error {
                message: e.to_string(),
            };
            protocol::write_response(writer, &response, DEFAULT_TIMEOUT).await?;
            return Ok(());
        }
    };

    // Observers send nothing after subscribing, so a read only returns
    // once the client hangs up
    let mut scratch = [0u8; 64];
    let mut sent = 0u64;
    loop {
        tokio::select! {
            next = feed.next() => {
                let Some(envelope) = next else { break };
                let response = Response::Event {
                    session: session.to_string(),
                    envelope,
                };
                protocol::send(writer, &response).await?;
                sent += 1;
            }
            read = reader.read(&mut scratch) => match read {
                Ok(0) | Err(_) => {
                    debug!(session, sent, "observer disconnected");
                    return Ok(());
                }
                Ok(_) => {}
            },
        }
    }

    let status = match broadcaster.status(session) {
        Ok(info) => info.status,
        Err(e) => LogStatus::Failed {
            reason: e.to_string(),
        },
    };
    debug!(session, sent, "subscription ended");
    protocol::write_response(writer, &Response::End { status }, DEFAULT_TIMEOUT).await?;
    Ok(())
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Request timeout")]
    Timeout,

    #[error("could not bind {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

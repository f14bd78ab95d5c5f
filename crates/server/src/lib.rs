// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Joust session server and observer client
//!
//! Observers connect over a Unix socket, subscribe to a session and
//! receive its events in log order, one frame per event.

mod client;
mod observer;
pub mod protocol;
mod server;

pub use client::{Client, ClientError, EventStream, StreamItem};
pub use observer::{Observed, Observer, ObserverError, ObserverHandler, Snapshot};
pub use protocol::{ProtocolError, Request, Response, PROTOCOL_VERSION};
pub use server::{bind, handle_connection, serve, ServerError};

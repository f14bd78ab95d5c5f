// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! joust-storage: session event logs and their observers

mod broadcaster;
mod capture;
mod log;
mod subscription;

pub use broadcaster::{
    BroadcastError, Broadcaster, Feed, MatchFeed, SessionEvent, SessionInfo, SessionKind,
};
pub use capture::{read_capture, restore, CaptureError, CaptureWriter, UNFINISHED_CAPTURE};
pub use log::{Envelope, EventLog, LogError, LogStatus};
pub use subscription::Subscription;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cursor over an event log: full replay, then live tail

use crate::log::{Envelope, LogInner, LogStatus, Watermark};
use std::sync::Arc;
use tokio::sync::watch;

pub struct Subscription<E> {
    log: Arc<LogInner<E>>,
    cursor: u64,
    watermark: watch::Receiver<Watermark>,
}

impl<E: Clone> Subscription<E> {
    pub(crate) fn new(log: Arc<LogInner<E>>, from: u64) -> Self {
        let watermark = log.watch();
        Self {
            log,
            cursor: from,
            watermark,
        }
    }

    /// Index of the next event this subscription will yield
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Next event, waiting for an append if caught up.
    ///
    /// Returns `None` once the log is closed or failed and fully drained.
    pub async fn next(&mut self) -> Option<Envelope<E>> {
        loop {
            let status = self.watermark.borrow_and_update().status.clone();
            if let Some(envelope) = self.log.get(self.cursor) {
                self.cursor += 1;
                return Some(envelope);
            }
            if !status.is_open() {
                return None;
            }
            if self.watermark.changed().await.is_err() {
                return None;
            }
        }
    }

    /// Status the log ended with, once drained
    pub fn final_status(&self) -> Option<LogStatus> {
        let status = self.watermark.borrow().status.clone();
        match status {
            LogStatus::Open => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;

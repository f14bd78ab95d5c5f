// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only in-memory event log for one session
//!
//! `append` is the only mutator. Each append takes the log lock, assigns
//! the next index and bumps a watch watermark before releasing it, so
//! indices are gap-free and match append order. Subscribers read by
//! cursor and wait on the watermark; they never hold the lock while
//! waiting, so a slow subscriber cannot stall appends.
//!
//! The capacity limit keeps one slot in reserve past the limit for the
//! event that ends a session (`append_terminal`), so a full log can still
//! record why it stopped.

use crate::subscription::Subscription;
use chrono::{DateTime, Utc};
use joust_core::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;

/// Errors from appending to a log
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("log {0} is closed")]
    Closed(String),
    #[error("log {log} is full ({capacity} events)")]
    CapacityExceeded { log: String, capacity: usize },
    #[error("log {log} expected index {expected}, got {got}")]
    OutOfOrder { log: String, expected: u64, got: u64 },
}

/// A logged event with its index and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<E> {
    /// 0-based position in the log
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub event: E,
}

impl<E> Envelope<E> {
    pub fn map<F, T>(self, f: F) -> Envelope<T>
    where
        F: FnOnce(E) -> T,
    {
        Envelope {
            seq: self.seq,
            at: self.at,
            event: f(self.event),
        }
    }
}

/// Lifecycle of a log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LogStatus {
    Open,
    /// The owner finished; no further appends
    Closed,
    /// The owner halted on an error
    Failed { reason: String },
}

impl LogStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, LogStatus::Open)
    }
}

/// Published on every append and on close
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Watermark {
    pub len: u64,
    pub status: LogStatus,
}

type Now = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub(crate) struct LogInner<E> {
    id: String,
    capacity: Option<usize>,
    entries: Mutex<Vec<Envelope<E>>>,
    watermark: watch::Sender<Watermark>,
    now: Now,
}

impl<E: Clone> LogInner<E> {
    pub(crate) fn get(&self, seq: u64) -> Option<Envelope<E>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(seq as usize).cloned()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<Watermark> {
        self.watermark.subscribe()
    }
}

/// Shared handle to one session's log. Clones refer to the same log.
pub struct EventLog<E> {
    inner: Arc<LogInner<E>>,
}

impl<E> Clone for EventLog<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Clone + Send + Sync + 'static> EventLog<E> {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_clock(id, None, SystemClock)
    }

    pub fn with_capacity(id: impl Into<String>, capacity: Option<usize>) -> Self {
        Self::with_clock(id, capacity, SystemClock)
    }

    pub fn with_clock(id: impl Into<String>, capacity: Option<usize>, clock: impl Clock) -> Self {
        let (watermark, _) = watch::channel(Watermark {
            len: 0,
            status: LogStatus::Open,
        });
        Self {
            inner: Arc::new(LogInner {
                id: id.into(),
                capacity,
                entries: Mutex::new(Vec::new()),
                watermark,
                now: Arc::new(move || clock.now()),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Append an event, returning its index
    pub fn append(&self, event: E) -> Result<u64, LogError> {
        self.push(None, None, event, false)
    }

    /// Append the event that ends the session, using the reserved slot
    /// when the log is at capacity
    pub fn append_terminal(&self, event: E) -> Result<u64, LogError> {
        self.push(None, None, event, true)
    }

    /// Append a recorded envelope as-is, keeping its index and timestamp.
    ///
    /// The envelope's `seq` must be the next index.
    pub fn append_envelope(&self, envelope: Envelope<E>) -> Result<u64, LogError> {
        let Envelope { seq, at, event } = envelope;
        self.push(Some(seq), Some(at), event, false)
    }

    fn push(
        &self,
        expected_seq: Option<u64>,
        at: Option<DateTime<Utc>>,
        event: E,
        terminal: bool,
    ) -> Result<u64, LogError> {
        let mut entries = self.inner.entries.lock().unwrap_or_else(|e| e.into_inner());
        if !self.inner.watermark.borrow().status.is_open() {
            return Err(LogError::Closed(self.inner.id.clone()));
        }
        if let Some(capacity) = self.inner.capacity {
            let limit = if terminal { capacity + 1 } else { capacity };
            if entries.len() >= limit {
                return Err(LogError::CapacityExceeded {
                    log: self.inner.id.clone(),
                    capacity,
                });
            }
        }
        let seq = entries.len() as u64;
        if let Some(got) = expected_seq {
            if got != seq {
                return Err(LogError::OutOfOrder {
                    log: self.inner.id.clone(),
                    expected: seq,
                    got,
                });
            }
        }
        entries.push(Envelope {
            seq,
            at: at.unwrap_or_else(|| (self.inner.now)()),
            event,
        });
        self.inner.watermark.send_modify(|w| w.len = seq + 1);
        Ok(seq)
    }

    /// Mark the log finished; subscribers end after draining
    pub fn close(&self) {
        self.finish(LogStatus::Closed);
    }

    /// Mark the log failed; subscribers end after draining
    pub fn fail(&self, reason: impl Into<String>) {
        self.finish(LogStatus::Failed {
            reason: reason.into(),
        });
    }

    fn finish(&self, status: LogStatus) {
        let _entries = self.inner.entries.lock().unwrap_or_else(|e| e.into_inner());
        self.inner.watermark.send_if_modified(|w| {
            if w.status.is_open() {
                w.status = status;
                true
            } else {
                false
            }
        });
    }

    pub fn status(&self) -> LogStatus {
        self.inner.watermark.borrow().status.clone()
    }

    pub fn len(&self) -> u64 {
        self.inner.watermark.borrow().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every entry at index >= `from`
    pub fn read_from(&self, from: u64) -> Vec<Envelope<E>> {
        let entries = self.inner.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().skip(from as usize).cloned().collect()
    }

    /// Replay from `from`, then follow live appends until the log ends
    pub fn subscribe(&self, from: u64) -> Subscription<E> {
        Subscription::new(Arc::clone(&self.inner), from)
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;

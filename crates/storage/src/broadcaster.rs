// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session fan-out of event logs to any number of observers
//!
//! Each observer gets its own cursor, so connecting late or reconnecting
//! only means replaying from index 0 again.

use crate::log::{Envelope, EventLog, LogStatus};
use crate::subscription::Subscription;
use joust_core::{GameEvent, TournamentEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("session {0} already exists")]
    Duplicate(String),
    #[error("unknown session {0}")]
    UnknownSession(String),
    #[error("session {0} is not a tournament")]
    NotTournament(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Game,
    Tournament,
}

/// Any event a session can carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Game(GameEvent),
    Tournament(TournamentEvent),
}

/// Session listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub kind: SessionKind,
    pub status: LogStatus,
    pub events: u64,
}

#[derive(Clone)]
enum SessionLog {
    Game(EventLog<GameEvent>),
    Tournament(EventLog<TournamentEvent>),
}

impl SessionLog {
    fn info(&self, id: &str) -> SessionInfo {
        let (kind, status, events) = match self {
            SessionLog::Game(log) => (SessionKind::Game, log.status(), log.len()),
            SessionLog::Tournament(log) => (SessionKind::Tournament, log.status(), log.len()),
        };
        SessionInfo {
            id: id.to_string(),
            kind,
            status,
            events,
        }
    }
}

/// Registry of live and finished session logs
#[derive(Clone, Default)]
pub struct Broadcaster {
    sessions: Arc<RwLock<BTreeMap<String, SessionLog>>>,
    capacity: Option<usize>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs opened by this broadcaster fail appends past `capacity`
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            sessions: Arc::default(),
            capacity,
        }
    }

    pub fn open_game(&self, id: &str) -> Result<EventLog<GameEvent>, BroadcastError> {
        let log = EventLog::with_capacity(id, self.capacity);
        self.insert(id, SessionLog::Game(log.clone()))?;
        Ok(log)
    }

    pub fn open_tournament(&self, id: &str) -> Result<EventLog<TournamentEvent>, BroadcastError> {
        let log = EventLog::with_capacity(id, self.capacity);
        self.insert(id, SessionLog::Tournament(log.clone()))?;
        Ok(log)
    }

    /// Register an existing game log, e.g. one rebuilt from a capture
    pub fn attach_game(&self, log: EventLog<GameEvent>) -> Result<(), BroadcastError> {
        let id = log.id().to_string();
        self.insert(&id, SessionLog::Game(log))
    }

    pub fn attach_tournament(&self, log: EventLog<TournamentEvent>) -> Result<(), BroadcastError> {
        let id = log.id().to_string();
        self.insert(&id, SessionLog::Tournament(log))
    }

    fn insert(&self, id: &str, log: SessionLog) -> Result<(), BroadcastError> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        if sessions.contains_key(id) {
            return Err(BroadcastError::Duplicate(id.to_string()));
        }
        sessions.insert(id.to_string(), log);
        tracing::debug!(session = id, "session opened");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<SessionLog, BroadcastError> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
            .ok_or_else(|| BroadcastError::UnknownSession(id.to_string()))
    }

    pub fn sessions(&self) -> Vec<SessionInfo> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(id, log)| log.info(id))
            .collect()
    }

    /// Status of one session without subscribing
    pub fn status(&self, id: &str) -> Result<SessionInfo, BroadcastError> {
        Ok(self.get(id)?.info(id))
    }

    /// Replay session `id` from `from`, then follow it live
    pub fn subscribe(&self, id: &str, from: u64) -> Result<Feed, BroadcastError> {
        let feed = match self.get(id)? {
            SessionLog::Game(log) => Feed::Game(log.subscribe(from)),
            SessionLog::Tournament(log) => Feed::Tournament(log.subscribe(from)),
        };
        tracing::debug!(session = id, from, "observer subscribed");
        Ok(feed)
    }

    /// Unwrapped game events of one tournament match, from its first game
    pub fn subscribe_match(&self, id: &str, match_id: &str) -> Result<Feed, BroadcastError> {
        match self.get(id)? {
            SessionLog::Tournament(log) => Ok(Feed::Match(MatchFeed {
                inner: log.subscribe(0),
                match_id: match_id.to_string(),
                done: false,
            })),
            SessionLog::Game(_) => Err(BroadcastError::NotTournament(id.to_string())),
        }
    }
}

/// Game events of one match, filtered out of a tournament log.
///
/// Envelope indices are the tournament log's. Ends after the match
/// completes or the tournament log ends.
pub struct MatchFeed {
    inner: Subscription<TournamentEvent>,
    match_id: String,
    done: bool,
}

impl MatchFeed {
    pub async fn next(&mut self) -> Option<Envelope<GameEvent>> {
        while !self.done {
            let envelope = self.inner.next().await?;
            let Envelope { seq, at, event } = envelope;
            match event {
                TournamentEvent::MatchGame { match_id, event } if match_id == self.match_id => {
                    return Some(Envelope { seq, at, event });
                }
                TournamentEvent::MatchComplete { match_id, .. } if match_id == self.match_id => {
                    self.done = true;
                }
                _ => {}
            }
        }
        None
    }
}

/// A subscriber's view of one session
pub enum Feed {
    Game(Subscription<GameEvent>),
    Tournament(Subscription<TournamentEvent>),
    Match(MatchFeed),
}

impl Feed {
    pub async fn next(&mut self) -> Option<Envelope<SessionEvent>> {
        match self {
            Feed::Game(sub) => sub.next().await.map(|e| e.map(SessionEvent::Game)),
            Feed::Tournament(sub) => sub.next().await.map(|e| e.map(SessionEvent::Tournament)),
            Feed::Match(feed) => feed.next().await.map(|e| e.map(SessionEvent::Game)),
        }
    }
}

#[cfg(test)]
#[path = "broadcaster_tests.rs"]
mod tests;

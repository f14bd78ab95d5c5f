// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnecting observer
//!
//! Every (re)connection subscribes from index 0 and rebuilds the snapshot
//! from scratch. Envelopes already handed to the handler are not handed
//! over again, so a reconnect looks seamless to the caller.

use std::path::PathBuf;
use std::time::Duration;

use joust_core::{Backoff, GameReplay, ObserverConfig, ReplayError, TournamentReplay};
use joust_storage::{Envelope, LogStatus, SessionEvent};
use thiserror::Error;

use crate::client::{Client, ClientError, EventStream, StreamItem};

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("replay failed: {0}")]
    Replay(#[from] ReplayError),
    #[error("gave up after {0} failed connection attempts")]
    GaveUp(u32),
}

/// Observer-side state of whatever the session carries
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Snapshot {
    #[default]
    Empty,
    Game(GameReplay),
    Tournament(TournamentReplay),
}

impl Snapshot {
    pub fn apply(&mut self, event: &SessionEvent) -> Result<(), ReplayError> {
        match event {
            SessionEvent::Game(event) => {
                if let Snapshot::Game(replay) = self {
                    return replay.apply(event);
                }
                let mut replay = GameReplay::new();
                replay.apply(event)?;
                *self = Snapshot::Game(replay);
            }
            SessionEvent::Tournament(event) => {
                if let Snapshot::Tournament(replay) = self {
                    return replay.apply(event);
                }
                let mut replay = TournamentReplay::new();
                replay.apply(event)?;
                *self = Snapshot::Tournament(replay);
            }
        }
        Ok(())
    }

    pub fn from_envelopes<'a>(
        envelopes: impl IntoIterator<Item = &'a Envelope<SessionEvent>>,
    ) -> Result<Self, ReplayError> {
        let mut snapshot = Self::default();
        for envelope in envelopes {
            snapshot.apply(&envelope.event)?;
        }
        Ok(snapshot)
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Snapshot::Empty => false,
            Snapshot::Game(replay) => replay.is_complete(),
            Snapshot::Tournament(replay) => replay.is_finished(),
        }
    }
}

/// Receives observed events
pub trait ObserverHandler {
    /// A new envelope, with the snapshot after applying it
    fn on_event(&mut self, envelope: &Envelope<SessionEvent>, snapshot: &Snapshot);

    fn on_disconnect(&mut self, _error: &ClientError, _retry_in: Duration) {}
}

impl<F> ObserverHandler for F
where
    F: FnMut(&Envelope<SessionEvent>, &Snapshot),
{
    fn on_event(&mut self, envelope: &Envelope<SessionEvent>, snapshot: &Snapshot) {
        self(envelope, snapshot)
    }
}

/// How an observed session ended
#[derive(Debug, Clone, PartialEq)]
pub struct Observed {
    pub snapshot: Snapshot,
    pub status: LogStatus,
}

pub struct Observer {
    socket: PathBuf,
    session: String,
    match_id: Option<String>,
    backoff: Backoff,
    max_attempts: Option<u32>,
    failures: u32,
    delivered: Option<u64>,
}

impl Observer {
    pub fn new(socket: impl Into<PathBuf>, session: impl Into<String>, config: &ObserverConfig) -> Self {
        Self {
            socket: socket.into(),
            session: session.into(),
            match_id: None,
            backoff: Backoff::from(config),
            max_attempts: None,
            failures: 0,
            delivered: None,
        }
    }

    /// Follow one match of a tournament session instead of the whole log
    pub fn with_match(mut self, match_id: impl Into<String>) -> Self {
        self.match_id = Some(match_id.into());
        self
    }

    /// Give up after this many consecutive failed attempts
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Follow the session until its log ends
    pub async fn run<H: ObserverHandler>(&mut self, handler: &mut H) -> Result<Observed, ObserverError> {
        loop {
            let error = match self.follow(handler).await {
                Ok(observed) => return Ok(observed),
                Err(ObserverError::Client(e)) if e.is_transient() => e,
                Err(e) => return Err(e),
            };

            self.failures += 1;
            if self.max_attempts.is_some_and(|max| self.failures >= max) {
                tracing::error!(session = %self.session, attempts = self.failures, "giving up");
                return Err(ObserverError::GaveUp(self.failures));
            }
            let delay = self.backoff.next_delay();
            tracing::warn!(
                session = %self.session,
                error = %error,
                retry_in_ms = delay.as_millis() as u64,
                "observer disconnected"
            );
            handler.on_disconnect(&error, delay);
            tokio::time::sleep(delay).await;
        }
    }

    async fn subscribe(&self) -> Result<EventStream, ClientError> {
        let client = Client::connect(&self.socket).await?;
        match &self.match_id {
            Some(match_id) => client.subscribe_match(&self.session, match_id).await,
            None => client.subscribe(&self.session, 0).await,
        }
    }

    async fn follow<H: ObserverHandler>(&mut self, handler: &mut H) -> Result<Observed, ObserverError> {
        let mut stream = self.subscribe().await?;
        let mut snapshot = Snapshot::default();
        let mut connected = false;

        loop {
            let item = stream.next().await?;
            if !connected {
                connected = true;
                self.backoff.reset();
                self.failures = 0;
                tracing::info!(session = %self.session, "observer subscribed");
            }
            match item {
                StreamItem::Event(envelope) => {
                    snapshot.apply(&envelope.event)?;
                    if self.delivered.map_or(true, |seq| envelope.seq > seq) {
                        self.delivered = Some(envelope.seq);
                        handler.on_event(&envelope, &snapshot);
                    }
                }
                StreamItem::End(status) => {
                    tracing::info!(session = %self.session, ?status, "session ended");
                    return Ok(Observed { snapshot, status });
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::protocol::{self, Request, Response, PROTOCOL_VERSION};
use crate::server::{bind, serve};
use joust_core::{Color, GameEvent, GameOverReason, GameResult, Position, Seats};
use joust_storage::Broadcaster;
use tokio::net::UnixListener;

fn config() -> ObserverConfig {
    ObserverConfig {
        min_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(20),
    }
}

fn game() -> Vec<GameEvent> {
    vec![
        GameEvent::GameStart {
            game_id: "game-1".to_string(),
            seats: Seats::new("alpha", "beta"),
            start: Position::new("start"),
        },
        GameEvent::MoveRequested {
            color: Color::White,
            attempt: 1,
        },
        GameEvent::MoveApplied {
            index: 1,
            color: Color::White,
            notation: "e4".to_string(),
            commentary: String::new(),
            position: Position::new("start e4"),
        },
        GameEvent::GameOver {
            result: GameResult::Draw,
            reason: GameOverReason::Draw,
            winner: None,
            total_plies: 1,
            export: "1. e4 1/2-1/2".to_string(),
        },
    ]
}

fn envelopes(events: Vec<GameEvent>) -> Vec<Envelope<SessionEvent>> {
    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| Envelope {
            seq: i as u64,
            at: chrono::Utc::now(),
            event: SessionEvent::Game(event),
        })
        .collect()
}

#[derive(Default)]
struct Recorder {
    seqs: Vec<u64>,
    disconnects: u32,
}

impl ObserverHandler for Recorder {
    fn on_event(&mut self, envelope: &Envelope<SessionEvent>, _snapshot: &Snapshot) {
        self.seqs.push(envelope.seq);
    }

    fn on_disconnect(&mut self, _error: &ClientError, _retry_in: Duration) {
        self.disconnects += 1;
    }
}

/// Serves one subscription per entry in `cuts`: the first `n` events and
/// a dropped connection for `Some(n)`, everything plus `End` for `None`
async fn flaky_server(listener: UnixListener, events: Vec<Envelope<SessionEvent>>, cuts: Vec<Option<usize>>) {
    for cut in cuts {
        let (stream, _) = listener.accept().await.unwrap();
        let (mut reader, mut writer) = stream.into_split();
        let _hello: Request = protocol::recv(&mut reader).await.unwrap();
        protocol::send(
            &mut writer,
            &Response::Hello {
                version: PROTOCOL_VERSION.to_string(),
            },
        )
        .await
        .unwrap();
        let _subscribe: Request = protocol::recv(&mut reader).await.unwrap();

        let take = cut.unwrap_or(events.len());
        for envelope in &events[..take] {
            let response = Response::Event {
                session: "game-1".to_string(),
                envelope: envelope.clone(),
            };
            protocol::send(&mut writer, &response).await.unwrap();
        }
        if cut.is_none() {
            protocol::send(
                &mut writer,
                &Response::End {
                    status: LogStatus::Closed,
                },
            )
            .await
            .unwrap();
        }
    }
}

#[tokio::test]
async fn observer_follows_a_session_to_the_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joust.sock");
    let broadcaster = Broadcaster::new();
    let log = broadcaster.open_game("game-1").unwrap();
    for event in game() {
        log.append(event).unwrap();
    }
    log.close();
    let listener = bind(&path).unwrap();
    tokio::spawn(serve(listener, broadcaster, std::future::pending()));

    let mut seen = Vec::new();
    let mut handler = |envelope: &Envelope<SessionEvent>, _: &Snapshot| seen.push(envelope.seq);
    let observed = Observer::new(&path, "game-1", &config())
        .run(&mut handler)
        .await
        .unwrap();

    assert_eq!(seen, vec![0, 1, 2, 3]);
    assert_eq!(observed.status, LogStatus::Closed);
    assert!(observed.snapshot.is_finished());
    match observed.snapshot {
        Snapshot::Game(replay) => {
            let session = replay.session.unwrap();
            assert_eq!(session.history(), vec!["e4".to_string()]);
        }
        other => panic!("unexpected snapshot {:?}", other),
    }
}

#[tokio::test]
async fn reconnect_replays_without_redelivering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joust.sock");
    let listener = bind(&path).unwrap();
    let events = envelopes(game());
    tokio::spawn(flaky_server(listener, events.clone(), vec![Some(2), None]));

    let mut recorder = Recorder::default();
    let observed = Observer::new(&path, "game-1", &config())
        .run(&mut recorder)
        .await
        .unwrap();

    assert_eq!(recorder.seqs, vec![0, 1, 2, 3]);
    assert_eq!(recorder.disconnects, 1);
    assert_eq!(observed.snapshot, Snapshot::from_envelopes(&events).unwrap());
}

#[tokio::test]
async fn observer_waits_for_the_server_to_appear() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joust.sock");

    let late = path.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let listener = bind(&late).unwrap();
        flaky_server(listener, envelopes(game()), vec![None]).await;
    });

    let mut recorder = Recorder::default();
    let observed = Observer::new(&path, "game-1", &config())
        .run(&mut recorder)
        .await
        .unwrap();
    assert!(recorder.disconnects >= 1);
    assert_eq!(recorder.seqs.len(), 4);
    assert_eq!(observed.status, LogStatus::Closed);
}

#[tokio::test]
async fn observer_gives_up_after_max_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sock");
    let mut recorder = Recorder::default();
    let err = Observer::new(&path, "game-1", &config())
        .with_max_attempts(3)
        .run(&mut recorder)
        .await
        .unwrap_err();

    assert!(matches!(err, ObserverError::GaveUp(3)));
    assert_eq!(recorder.disconnects, 2);
}

#[tokio::test]
async fn unknown_session_is_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("joust.sock");
    let listener = bind(&path).unwrap();
    tokio::spawn(serve(listener, Broadcaster::new(), std::future::pending()));

    let mut recorder = Recorder::default();
    let err = Observer::new(&path, "nope", &config())
        .run(&mut recorder)
        .await
        .unwrap_err();
    assert!(matches!(err, ObserverError::Client(ClientError::Server(_))));
    assert_eq!(recorder.disconnects, 0);
}

#[test]
fn snapshot_switches_kind_with_the_stream() {
    let mut snapshot = Snapshot::default();
    assert!(!snapshot.is_finished());
    for envelope in envelopes(game()) {
        snapshot.apply(&envelope.event).unwrap();
    }
    assert!(matches!(snapshot, Snapshot::Game(_)));
    assert!(snapshot.is_finished());

    let restarted = &game()[0];
    snapshot.apply(&SessionEvent::Game(restarted.clone())).unwrap();
    assert!(!snapshot.is_finished());
}

#[test]
fn snapshot_rejects_events_before_a_start() {
    let mut snapshot = Snapshot::default();
    let err = snapshot
        .apply(&SessionEvent::Game(game()[1].clone()))
        .unwrap_err();
    assert_eq!(err, ReplayError::NoGame("game:requested"));
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::agent::{Reply, ScriptedAgent};
use joust_core::{Color, Position};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::default();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn request() -> MoveRequest {
    MoveRequest {
        game_id: "game-7".to_string(),
        color: Color::Black,
        move_number: 4,
        position: Position::new("start"),
        history: vec!["e4".to_string()],
        legal_moves: None,
        attempt: 2,
        correction: None,
    }
}

#[tokio::test]
async fn traced_agent_passes_results_through() {
    let traced = TracedAgent::new("alpha", ScriptedAgent::always("e5"));
    let proposal = traced
        .propose_move(&request(), CommentarySink::discard())
        .await
        .unwrap();
    assert_eq!(proposal.notation, "e5");
    assert_eq!(traced.name(), "alpha");
}

#[test]
fn traced_agent_logs_span_and_outcome() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedAgent::new("alpha", ScriptedAgent::always("e5"));
        traced
            .propose_move(&request(), CommentarySink::discard())
            .await
    });

    assert!(result.is_ok(), "propose should succeed: {:?}", result);
    assert!(
        logs.contains("agent.propose"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(logs.contains("game-7"), "Should log game id. Logs:\n{}", logs);
    assert!(logs.contains("proposed"), "Should log outcome. Logs:\n{}", logs);
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_agent_logs_provider_failure() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedAgent::new(
            "alpha",
            ScriptedAgent::new([Reply::Error("rate limited".to_string())]),
        );
        traced
            .propose_move(&request(), CommentarySink::discard())
            .await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("proposal failed"),
        "Should log failure. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("rate limited"),
        "Should log error text. Logs:\n{}",
        logs
    );
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use joust_core::{Color, Position};

fn request(attempt: u32) -> MoveRequest {
    MoveRequest {
        game_id: "game-1".to_string(),
        color: Color::White,
        move_number: 1,
        position: Position::new("start"),
        history: vec![],
        legal_moves: None,
        attempt,
        correction: None,
    }
}

#[tokio::test]
async fn replies_in_order_then_fallback() {
    let agent = ScriptedAgent::new([Reply::mv("e4"), Reply::Error("boom".to_string())])
        .with_fallback(Reply::mv("d4"));

    let first = agent
        .propose_move(&request(1), CommentarySink::discard())
        .await;
    assert_eq!(first.unwrap().notation, "e4");

    let second = agent
        .propose_move(&request(2), CommentarySink::discard())
        .await;
    assert_eq!(second, Err(AgentError::Provider("boom".to_string())));

    for _ in 0..2 {
        let next = agent
            .propose_move(&request(3), CommentarySink::discard())
            .await;
        assert_eq!(next.unwrap().notation, "d4");
    }
    assert_eq!(agent.calls().len(), 4);
}

#[tokio::test]
async fn exhausted_script_without_fallback_errors() {
    let agent = ScriptedAgent::new([]);
    let result = agent
        .propose_move(&request(1), CommentarySink::discard())
        .await;
    assert!(matches!(result, Err(AgentError::Provider(_))));
}

#[tokio::test]
async fn streams_chunks_before_answering() {
    let agent = ScriptedAgent::new([Reply::with_chunks("Nf3", &["think", "ing"])]);
    let (sink, mut rx) = CommentarySink::channel();
    let proposal = agent.propose_move(&request(1), sink).await.unwrap();
    assert_eq!(proposal.commentary, "thinking");
    assert_eq!(rx.recv().await.as_deref(), Some("think"));
    assert_eq!(rx.recv().await.as_deref(), Some("ing"));
}

#[tokio::test]
async fn clones_share_calls() {
    let agent = ScriptedAgent::always("e4");
    let clone = agent.clone();
    clone
        .propose_move(&request(1), CommentarySink::discard())
        .await
        .unwrap();
    assert_eq!(agent.calls().len(), 1);
    assert_eq!(agent.calls()[0].attempt, 1);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::log::{EventLog, LogStatus};
use std::time::Duration;

#[tokio::test]
async fn replays_then_tails() {
    let log = EventLog::new("game-1");
    log.append(1).unwrap();
    log.append(2).unwrap();

    let mut sub = log.subscribe(0);
    assert_eq!(sub.next().await.map(|e| e.event), Some(1));
    assert_eq!(sub.next().await.map(|e| e.event), Some(2));

    let writer = log.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        writer.append(3).unwrap();
        writer.close();
    });

    assert_eq!(sub.next().await.map(|e| e.event), Some(3));
    assert_eq!(sub.next().await, None);
    assert_eq!(sub.final_status(), Some(LogStatus::Closed));
}

#[tokio::test]
async fn starts_from_requested_index() {
    let log = EventLog::new("game-1");
    for i in 0..5 {
        log.append(i).unwrap();
    }
    log.close();

    let mut sub = log.subscribe(3);
    assert_eq!(sub.cursor(), 3);
    assert_eq!(sub.next().await.map(|e| e.seq), Some(3));
    assert_eq!(sub.next().await.map(|e| e.seq), Some(4));
    assert_eq!(sub.next().await, None);
}

#[tokio::test]
async fn late_subscriber_sees_full_history() {
    let log = EventLog::new("game-1");
    let mut early = log.subscribe(0);
    for i in 0..3 {
        log.append(i).unwrap();
    }
    log.fail("halted");

    let mut late = log.subscribe(0);
    let mut early_seen = Vec::new();
    while let Some(e) = early.next().await {
        early_seen.push(e);
    }
    let mut late_seen = Vec::new();
    while let Some(e) = late.next().await {
        late_seen.push(e);
    }
    assert_eq!(early_seen, late_seen);
    assert_eq!(late_seen.len(), 3);
    assert!(matches!(late.final_status(), Some(LogStatus::Failed { .. })));
}

#[tokio::test]
async fn idle_subscriber_does_not_block_appends() {
    let log = EventLog::new("t-1");
    let _idle = log.subscribe(0);
    for i in 0..10_000 {
        log.append(i).unwrap();
    }
    assert_eq!(log.len(), 10_000);
}

#[tokio::test]
async fn many_subscribers_see_identical_streams() {
    let log = EventLog::new("t-1");
    let mut handles = Vec::new();
    for _ in 0..8 {
        let mut sub = log.subscribe(0);
        handles.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            while let Some(e) = sub.next().await {
                seen.push(e.event);
            }
            seen
        }));
    }
    for i in 0..50 {
        log.append(i).unwrap();
        tokio::task::yield_now().await;
    }
    log.close();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), (0..50).collect::<Vec<_>>());
    }
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier generation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Generates unique session identifiers with a readable prefix
/// (`game-…`, `tournament-…`).
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self, prefix: &str) -> String;
}

/// UUID-based generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
    }
}

/// Sequential generator for testing; each prefix counts independently.
#[derive(Clone, Default)]
pub struct SequentialIdGen {
    counters: Arc<Mutex<HashMap<String, u64>>>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self, prefix: &str) -> String {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        let n = counters.entry(prefix.to_string()).or_insert(0);
        *n += 1;
        format!("{}-{}", prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

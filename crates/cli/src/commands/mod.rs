// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod config;
pub mod replay;
pub mod serve;
pub mod sessions;
pub mod watch;

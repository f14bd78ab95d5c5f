// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use yare::parameterized;

#[test]
fn empty_file_gives_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.game.max_retries, 3);
    assert_eq!(config.game.move_timeout, Duration::from_secs(120));
    assert_eq!(config.tournament.draw_policy, DrawPolicy::Rematch);
    assert_eq!(config.observer.min_delay, Duration::from_millis(500));
    assert_eq!(config.log.max_events, None);
}

#[test]
fn parses_full_file() {
    let toml = r#"
[game]
max_retries = 5
move_timeout = "30s"
show_legal_moves = false

[tournament]
draw_policy = "coin_flip"
colors = "seed_order"
max_rematches = 2
rng_seed = 42

[observer]
min_delay = "100ms"
max_delay = "5s"

[log]
max_events = 1000
"#;
    let config = Config::parse(toml).unwrap();
    assert_eq!(config.game.max_retries, 5);
    assert_eq!(config.game.move_timeout, Duration::from_secs(30));
    assert!(!config.game.show_legal_moves);
    assert_eq!(config.tournament.draw_policy, DrawPolicy::CoinFlip);
    assert_eq!(config.tournament.colors, ColorAssignment::SeedOrder);
    assert_eq!(config.tournament.max_rematches, 2);
    assert_eq!(config.tournament.rng_seed, Some(42));
    assert_eq!(config.observer.max_delay, Duration::from_secs(5));
    assert_eq!(config.log.max_events, Some(1000));
}

#[parameterized(
    zero_retries = { "[game]\nmax_retries = 0", "game.max_retries" },
    zero_timeout = { "[game]\nmove_timeout = \"0s\"", "game.move_timeout" },
    inverted_delays = { "[observer]\nmin_delay = \"10s\"\nmax_delay = \"1s\"", "observer.min_delay" },
    zero_capacity = { "[log]\nmax_events = 0", "log.max_events" },
)]
fn rejects_invalid_values(toml: &str, field: &str) {
    match Config::parse(toml) {
        Err(ConfigError::Invalid { field: got, .. }) => assert_eq!(got, field),
        other => panic!("expected invalid {}, got {:?}", field, other),
    }
}

#[test]
fn rejects_unknown_keys() {
    let err = Config::parse("[game]\nretries = 3").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn rejects_unknown_draw_policy() {
    let err = Config::parse("[tournament]\ndraw_policy = \"armageddon\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[game]\nmax_retries = 7").unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.game.max_retries, 7);
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

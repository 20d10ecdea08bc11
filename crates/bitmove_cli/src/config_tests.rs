use std::fs;
use std::path::PathBuf;

use super::*;

/// Fresh, empty scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bitmove-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.log_level, "info");
    assert_eq!(config.fen, "startpos");
    assert_eq!(config.perft.depth, 4);
    assert!(!config.perft.divide);
    assert_eq!(Config::parse("").unwrap(), config);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let config = Config::parse("[perft]\ndepth = 6\n").unwrap();
    assert_eq!(config.perft.depth, 6);
    assert!(!config.perft.divide);
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_full_file() {
    let text = r#"
log_level = "debug"
fen = "8/8/8/8/8/8/8/K6k w - - 0 1"

[perft]
depth = 2
divide = true
"#;
    let config = Config::parse(text).unwrap();
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.perft, PerftConfig { depth: 2, divide: true });
    let pos = config.position(None).unwrap();
    assert_eq!(pos.to_fen(), "8/8/8/8/8/8/8/K6k w - - 0 1");
}

#[test]
fn test_unknown_key_rejected() {
    assert!(Config::parse("depht = 3\n").is_err());
    assert!(Config::parse("[perft]\nplies = 3\n").is_err());
}

#[test]
fn test_position_override_and_startpos() {
    let config = Config::default();
    assert_eq!(config.position(None).unwrap(), Position::startpos());
    assert_eq!(
        config.position(Some("STARTPOS")).unwrap(),
        Position::startpos()
    );
    let err = config.position(Some("not a fen")).unwrap_err();
    assert!(err.to_string().contains("not a fen"));
}

#[test]
fn test_missing_implicit_file_uses_defaults() {
    let dir = scratch_dir("implicit-missing");
    assert_eq!(Config::load(None, &dir).unwrap(), Config::default());
}

#[test]
fn test_implicit_file_is_read() {
    let dir = scratch_dir("implicit-present");
    fs::write(dir.join(DEFAULT_CONFIG_FILE), "log_level = \"trace\"\n").unwrap();
    let config = Config::load(None, &dir).unwrap();
    assert_eq!(config.log_level, "trace");
}

#[test]
fn test_explicit_file_must_exist() {
    let dir = scratch_dir("explicit");
    let missing = dir.join("nope.toml");
    assert!(Config::load(Some(&missing), &dir).is_err());

    let present = dir.join("custom.toml");
    fs::write(&present, "[perft]\ndivide = true\n").unwrap();
    // An explicit file wins over the implicit one.
    fs::write(dir.join(DEFAULT_CONFIG_FILE), "[perft]\ndepth = 1\n").unwrap();
    let config = Config::load(Some(&present), &dir).unwrap();
    assert!(config.perft.divide);
    assert_eq!(config.perft.depth, 4);
}

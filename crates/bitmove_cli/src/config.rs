//! `bitmove.toml` settings, layered as defaults < file < command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use bitmove_core::{FenError, Position};

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "bitmove.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Starting position, a FEN or `startpos`.
    pub fen: String,
    pub perft: PerftConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerftConfig {
    pub depth: u8,
    pub divide: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            fen: "startpos".to_string(),
            perft: PerftConfig::default(),
        }
    }
}

impl Default for PerftConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            divide: false,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    /// Load `explicit` if given (it must exist), else `DEFAULT_CONFIG_FILE`
    /// inside `dir` if present, else the defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let path: PathBuf = match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let implicit = dir.join(DEFAULT_CONFIG_FILE);
                if !implicit.is_file() {
                    return Ok(Self::default());
                }
                implicit
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// The configured position, with `override_fen` taking precedence.
    pub fn position(&self, override_fen: Option<&str>) -> Result<Position> {
        let fen = override_fen.unwrap_or(&self.fen);
        parse_position(fen).with_context(|| format!("bad position '{fen}'"))
    }
}

/// A FEN, or the word `startpos`.
pub fn parse_position(text: &str) -> Result<Position, FenError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("startpos") {
        Ok(Position::startpos())
    } else {
        Position::from_fen(text)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

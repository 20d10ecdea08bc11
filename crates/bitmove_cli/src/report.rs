//! Perft results in a machine-readable form.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use bitmove_core::Move;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerftReport {
    pub fen: String,
    pub depth: u8,
    pub nodes: u64,
    pub elapsed_ms: f64,
    pub nodes_per_second: f64,
    /// Per-root-move counts; empty unless divide was requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub divide: Vec<DivideEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivideEntry {
    #[serde(rename = "move")]
    pub mv: String,
    pub nodes: u64,
}

impl PerftReport {
    pub fn new(fen: String, depth: u8, nodes: u64, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        Self {
            fen,
            depth,
            nodes,
            elapsed_ms: secs * 1000.0,
            nodes_per_second: if secs > 0.0 { nodes as f64 / secs } else { 0.0 },
            divide: Vec::new(),
        }
    }

    pub fn with_divide(mut self, divide: &[(Move, u64)]) -> Self {
        self.divide = divide
            .iter()
            .map(|(mv, nodes)| DivideEntry {
                mv: mv.to_string(),
                nodes: *nodes,
            })
            .collect();
        self
    }

    /// Save the report as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize perft report")?;
        std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

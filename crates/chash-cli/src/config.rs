//! TOML configuration for the `chash` CLI.
//!
//! Every section is optional. With no config file the defaults describe the
//! classic three-node demo ring: `node1`..`node3`, 3 replicas, FNV-1a.

use std::path::Path;

use anyhow::Context;
use chash_ring::{HasherKind, Ring};
use serde::Deserialize;
use tracing::warn;

/// Top-level configuration, parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Ring shape and hash function.
    pub ring: RingSection,
    /// Logging configuration.
    pub log: LogSection,
}

/// `[ring]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RingSection {
    /// Virtual positions per node.
    pub replicas: usize,
    /// Node names, in construction order.
    pub nodes: Vec<String>,
    /// Hash function: `"fnv1a"` (default) or `"blake3"`.
    pub hasher: HasherKind,
}

impl Default for RingSection {
    fn default() -> Self {
        Self {
            replicas: 3,
            nodes: vec!["node1".into(), "node2".into(), "node3".into()],
            hasher: HasherKind::Fnv1a,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Log level filter (e.g. `"info"`, `"debug"`, `"warn"`).
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from a TOML file, or use defaults if no path given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("failed to read {}", p.display()))?;
                let config: CliConfig = toml::from_str(&content)
                    .with_context(|| format!("failed to parse {}", p.display()))?;
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse config from a TOML string (used in tests).
    #[cfg(test)]
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Build the ring described by the `[ring]` section.
    ///
    /// A zero replica count or an empty node list is accepted but yields a
    /// ring that owns no keys, so it is logged as a warning.
    pub fn build_ring(&self) -> Ring<HasherKind> {
        build_ring(&self.ring.nodes, self.ring.replicas, self.ring.hasher)
    }
}

/// Build a ring, warning when the parameters make it degenerate.
pub fn build_ring(nodes: &[String], replicas: usize, hasher: HasherKind) -> Ring<HasherKind> {
    if replicas == 0 {
        warn!("replica count is 0, every lookup will return no node");
    }
    if nodes.is_empty() {
        warn!("node list is empty, every lookup will return no node");
    }
    Ring::with_hasher(hasher, replicas, nodes.iter().cloned())
}

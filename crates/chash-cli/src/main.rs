//! Command-line driver (`chash`) for the consistent hashing ring.
//!
//! Builds a ring from a TOML config file and/or flags and prints key
//! assignments, load distribution, or the effect of a membership change.
//! Results go to stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! chash demo                                 # key0..key29 on node1..node3
//! chash demo -n 100 --prefix user-           # custom keys
//! chash -c ring.toml lookup alice bob        # look keys up
//! chash --node a --node b -r 160 stats       # per-node load over a sample
//! chash diff --add node4                     # keys moved by adding a node
//! ```

mod config;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chash_ring::{HasherKind, Ring, RingHasher};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use config::{CliConfig, build_ring};

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "chash", version, about = "Consistent hashing ring explorer")]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true, env = "CHASH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the number of virtual positions per node.
    #[arg(short, long, global = true)]
    replicas: Option<usize>,

    /// Override the node list. Can be specified multiple times.
    #[arg(long = "node", global = true)]
    nodes: Vec<String>,

    /// Override the hash function (`fnv1a` or `blake3`).
    #[arg(long, global = true)]
    hasher: Option<HasherKind>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the owner of a run of synthetic keys.
    Demo {
        /// Number of keys to print.
        #[arg(short = 'n', long, default_value = "30")]
        count: usize,

        /// Prefix for the synthetic keys.
        #[arg(long, default_value = "key")]
        prefix: String,
    },

    /// Print the owner of each given key.
    Lookup {
        /// Keys to look up.
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Show how a sample of keys is spread across nodes.
    Stats {
        /// Number of sample keys.
        #[arg(short = 'n', long, default_value = "10000")]
        samples: usize,
    },

    /// Show which keys move when nodes are added or removed.
    Diff {
        /// Nodes to add to the configured ring.
        #[arg(long)]
        add: Vec<String>,

        /// Nodes to remove from the configured ring.
        #[arg(long)]
        remove: Vec<String>,

        /// Number of sample keys.
        #[arg(short = 'n', long, default_value = "10000")]
        samples: usize,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);

    // CLI args override config file values.
    if let Some(replicas) = cli.replicas {
        config.ring.replicas = replicas;
    }
    if !cli.nodes.is_empty() {
        config.ring.nodes = cli.nodes;
    }
    if let Some(hasher) = cli.hasher {
        config.ring.hasher = hasher;
    }

    let ring = config.build_ring();
    info!(
        nodes = ring.node_count(),
        replicas = ring.replicas(),
        hasher = %config.ring.hasher,
        "ring ready"
    );

    let lines = match cli.command {
        Commands::Demo { count, prefix } => {
            let keys = (0..count).map(|i| format!("{prefix}{i}"));
            lookup_lines(&ring, keys)
        }
        Commands::Lookup { keys } => lookup_lines(&ring, keys),
        Commands::Stats { samples } => stats_lines(&ring, &sample_keys(samples)),
        Commands::Diff {
            add,
            remove,
            samples,
        } => {
            let nodes = changed_nodes(&config.ring.nodes, &add, &remove);
            debug!(?nodes, "built changed node list");
            let changed = build_ring(&nodes, config.ring.replicas, config.ring.hasher);
            diff_lines(&ring, &changed, &sample_keys(samples))
        }
    };

    for line in lines {
        println!("{line}");
    }

    Ok(())
}

fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// -----------------------------------------------------------------------
// Output
// -----------------------------------------------------------------------

/// Synthetic sample keys `key-0`, `key-1`, ...
fn sample_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i}")).collect()
}

/// One `key=<key> node=<node>` line per key; no owner prints as empty.
fn lookup_lines<H, I, K>(ring: &Ring<H>, keys: I) -> Vec<String>
where
    H: RingHasher,
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    keys.into_iter()
        .map(|key| {
            let key = key.as_ref();
            let node = ring.get_node(key).unwrap_or_default();
            format!("key={key} node={node}")
        })
        .collect()
}

/// Per-node key counts and share of the sample.
fn stats_lines<H: RingHasher>(ring: &Ring<H>, keys: &[String]) -> Vec<String> {
    let counts = ring.distribution(keys);
    if counts.is_empty() {
        return vec!["ring is empty".to_string()];
    }

    let total = keys.len().max(1) as f64;
    counts
        .iter()
        .map(|(node, count)| {
            let share = *count as f64 * 100.0 / total;
            format!("node={node} keys={count} share={share:.2}%")
        })
        .collect()
}

/// Summary line followed by one line per `(from, to)` pair.
fn diff_lines<H, G>(old: &Ring<H>, new: &Ring<G>, keys: &[String]) -> Vec<String>
where
    H: RingHasher,
    G: RingHasher,
{
    let moves = Ring::diff(old, new, keys);
    let fraction = Ring::moved_fraction(old, new, keys);

    let mut flows: BTreeMap<(String, String), usize> = BTreeMap::new();
    for m in &moves {
        let from = m.from.clone().unwrap_or_default();
        let to = m.to.clone().unwrap_or_default();
        *flows.entry((from, to)).or_default() += 1;
    }

    let mut lines = vec![format!(
        "moved={} total={} fraction={fraction:.4}",
        moves.len(),
        keys.len()
    )];
    lines.extend(
        flows
            .into_iter()
            .map(|((from, to), count)| format!("{from} -> {to}: {count}")),
    );
    lines
}

/// Apply removals, then append additions not already present.
fn changed_nodes(nodes: &[String], add: &[String], remove: &[String]) -> Vec<String> {
    let mut out: Vec<String> = nodes
        .iter()
        .filter(|n| !remove.contains(n))
        .cloned()
        .collect();
    for node in add {
        if !out.contains(node) {
            out.push(node.clone());
        }
    }
    out
}

mod player;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mpoint_core::{DiscreteCoercion, LiveNode, MemoryRegistry, PointRegistry, PointsConfig};

use crate::player::TracingNode;

/// Replay recorded samples into measurement points.
#[derive(Debug, Parser)]
#[command(name = "mpoint-player", version)]
struct Args {
    /// JSON file with point definitions.
    #[arg(long, env = "MPOINT_POINTS")]
    points: PathBuf,

    /// JSON array of recorded samples.
    #[arg(long, env = "MPOINT_SAMPLES")]
    samples: PathBuf,

    /// Delay between samples in milliseconds.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Restart the recording after the last sample.
    #[arg(long)]
    repeat: bool,

    /// Store unrecognized discrete values as empty instead of rejecting them.
    #[arg(long)]
    lenient: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,mpoint_core=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    tracing::info!("Measurement point player starting...");

    let config = PointsConfig::from_file(&args.points)
        .with_context(|| format!("loading points from {}", args.points.display()))?;
    let (mut registry, rejected) = MemoryRegistry::from_config(&config);
    for (index, error) in &rejected {
        tracing::error!(index, %error, "Point definition rejected");
    }
    if registry.is_empty() {
        anyhow::bail!("no valid point definitions in {}", args.points.display());
    }

    let records = player::load_recording(&args.samples)
        .with_context(|| format!("loading samples from {}", args.samples.display()))?;

    // The player owns the nodes; points only hold weak references.
    let mut nodes: Vec<Arc<dyn LiveNode>> = Vec::new();
    for id in registry.ids() {
        let node: Arc<dyn LiveNode> = Arc::new(TracingNode::new(id));
        registry.attach_live_node(id, &node)?;
        if args.lenient {
            if let Some(point) = registry.get_mut(id) {
                point.set_discrete_coercion(DiscreteCoercion::Lenient);
            }
        }
        nodes.push(node);
    }

    tracing::info!(
        points = registry.len(),
        samples = records.len(),
        interval_ms = args.interval_ms,
        "Playback ready"
    );

    let interval = Duration::from_millis(args.interval_ms.max(1));
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, stopping playback...");
        }
        _ = player::play(&mut registry, &records, interval, args.repeat) => {
            tracing::info!("Playback complete");
        }
    }

    registry.clear_all();
    drop(nodes);
    tracing::info!("Shutdown complete");
    Ok(())
}

//! CLI entry point: loads the striped cache and worker pool configuration
//! from flags, binds a TCP listener, and serves the memcached-family text
//! protocol until the process is killed.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use striped_lru_cache::config::{ExecutorConfig, StripedLruConfig};
use striped_lru_cache::{Executor, Storage, StripedLru};

/// A memcached-family in-memory cache server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:11211")]
    listen: String,

    /// Total byte budget across all shards.
    #[arg(long, default_value_t = 64 * 1024 * 1024)]
    budget: u64,

    /// Number of independently locked shards.
    #[arg(long, default_value_t = 16)]
    shards: usize,

    /// Minimum worker threads while running.
    #[arg(long, default_value_t = 4)]
    low_watermark: usize,

    /// Maximum worker threads.
    #[arg(long, default_value_t = 64)]
    high_watermark: usize,

    /// Maximum pending connection-handling tasks.
    #[arg(long, default_value_t = 1024)]
    queue_cap: usize,

    /// How long an idle worker above the low watermark waits before
    /// exiting, in milliseconds.
    #[arg(long, default_value_t = 500)]
    idle_time_ms: u64,
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let storage: Arc<dyn Storage> = Arc::new(
        StripedLru::<Vec<u8>, Vec<u8>>::new(StripedLruConfig {
            total_budget: args.budget,
            shard_count: args.shards,
        })
        .unwrap_or_else(|err| {
            tracing::error!(%err, "invalid cache configuration");
            std::process::exit(1);
        }),
    );

    let executor = Executor::new(ExecutorConfig {
        name: "conn".to_string(),
        queue_cap: args.queue_cap,
        low_watermark: args.low_watermark,
        high_watermark: args.high_watermark,
        idle_time: Duration::from_millis(args.idle_time_ms),
    })
    .unwrap_or_else(|err| {
        tracing::error!(%err, "invalid executor configuration");
        std::process::exit(1);
    });

    let listener = TcpListener::bind(&args.listen)?;
    tracing::info!(addr = %args.listen, shards = args.shards, "listening");
    striped_lru_cache::server::serve(listener, storage, &executor)
}

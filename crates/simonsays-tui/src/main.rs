//! Simon Says TUI entry point.

use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use simonsays_client::{PlayerIdentity, transport::TransportConfig};
use simonsays_tui::{Runtime, RuntimeConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Simon Says terminal client
#[derive(Parser, Debug)]
#[command(name = "simonsays-tui")]
#[command(about = "Play Simon Says against another player in the terminal")]
#[command(version)]
struct Args {
    /// Game server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    server: String,

    /// TLS server name to present
    #[arg(long, default_value = "localhost")]
    server_name: String,

    /// Player name (a random one is generated if omitted or blank)
    #[arg(short, long)]
    player: Option<String>,

    /// Give up if the game has not started after this many seconds
    #[arg(long)]
    wait_timeout: Option<u64>,

    /// Write logs to this file (the terminal is used for the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
        let writer = Mutex::new(File::create(path)?);
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(filter)
            .try_init()?;
    }

    let identity = PlayerIdentity::named_or_random(args.player.as_deref());
    tracing::info!(player = %identity.player_id(), server = %args.server, "starting");

    let config = RuntimeConfig {
        server_addr: args.server,
        transport: TransportConfig { server_name: args.server_name, ..TransportConfig::development() },
        wait_timeout: args.wait_timeout.map(Duration::from_secs),
    };

    let runtime = Runtime::connect(identity, config).await?;
    Ok(runtime.run().await?)
}

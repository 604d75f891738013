use clap::Parser;
use resource_cluster::config::NodeConfig;
use resource_cluster::gateway::handlers::router;
use resource_cluster::manager::bootstrap::bootstrap;
use resource_cluster::manager::client::AccessClient;
use resource_cluster::manager::node::ResourceManager;
use resource_cluster::telemetry::sink::{LogSink, spawn_tracing_sink};
use resource_cluster::transport::udp::UdpTransport;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs one resource manager node.
#[derive(Parser, Debug)]
#[command(name = "resource-cluster", version, about)]
struct Cli {
    /// Path to the node's TOML configuration.
    #[arg(short, long, env = "RESOURCE_CLUSTER_CONFIG")]
    config: PathBuf,

    /// Overrides the UDP address from the configuration.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Overrides (or enables) the HTTP gateway address.
    #[arg(long)]
    http: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = NodeConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(http) = cli.http {
        config.http = Some(http);
    }

    let id = config.node_id();
    tracing::info!("Starting manager {} on {}", id, config.bind);

    // 1. Transport (UDP):
    let transport = UdpTransport::bind(config.bind).await?;
    transport.add_peers(config.peers.iter().cloned());
    transport.start();

    // 2. Telemetry:
    let (log, records) = LogSink::channel();
    spawn_tracing_sink(records);

    // 3. Manager task + bootstrap:
    let manager = ResourceManager::spawn(id.clone(), transport.clone(), log, config.settings());
    bootstrap(
        &*transport,
        &id,
        config.bootstrap_plan(),
        BOOTSTRAP_TIMEOUT,
    )
    .await?;

    // 4. HTTP gateway (optional):
    let Some(http_addr) = config.http else {
        tracing::info!("No HTTP gateway configured, serving peers only");
        manager.task.await?;
        return Ok(());
    };

    let client = Arc::new(AccessClient::new(
        transport.clone(),
        id,
        config.reply_timeout(),
    ));
    let app = router(client);

    tracing::info!("HTTP gateway listening on {}", http_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::Context;
use clap::Parser;
use samyama_dag::{
    GraphRepository, GraphService, HttpServer, InMemoryGraphStore, PersistentStorage, ServerConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "samyama-dag", version, about = "DAG storage service")]
struct Args {
    /// YAML config file
    #[arg(long, env = "DAG_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long, env = "DAG_ADDRESS")]
    address: Option<String>,

    /// Port
    #[arg(long, env = "DAG_PORT")]
    port: Option<u16>,

    /// RocksDB data directory
    #[arg(long, env = "DAG_DATA_PATH", conflicts_with = "in_memory")]
    data_path: Option<PathBuf>,

    /// Keep graphs in memory only
    #[arg(long)]
    in_memory: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DAG_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data_path) = self.data_path {
            config.data_path = Some(data_path);
        }
        if self.in_memory {
            config.data_path = None;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;

    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level()?)
        .init();

    info!("Samyama DAG Service v{}", samyama_dag::version());

    let store: Arc<dyn GraphRepository> = match &config.data_path {
        Some(path) => {
            std::fs::create_dir_all(path)
                .with_context(|| format!("creating data directory {}", path.display()))?;
            Arc::new(PersistentStorage::open(path)?)
        }
        None => {
            info!("Running without persistence, graphs are lost on exit");
            Arc::new(InMemoryGraphStore::new())
        }
    };

    let server = HttpServer::new(GraphService::new(store), config.socket_addr()?);
    server.start().await?;

    Ok(())
}

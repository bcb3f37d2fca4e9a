use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use pagemarker::config::{Config, ConfigStore};
use pagemarker::server::{init_tracing, PageServer};

#[derive(Debug, Parser)]
#[command(name = "pagemarker", version, about = "Serve pages that remember their filters")]
struct Args {
    /// Path to the config file (default: ~/.config/pagemarker/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the bind address (host:port)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let path = args.config.unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
        config.validate()?;
    }

    let store = ConfigStore::new(config, path);
    tracing::info!(config = %store.path().display(), "Configuration loaded");

    let mut server = PageServer::new(store);
    let addr = server.try_bind().await.map_err(|e| anyhow!(e))?;
    println!("pagemarker listening on http://{}", addr);

    server.run().await.map_err(|e| anyhow!(e))
}

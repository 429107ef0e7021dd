mod cli;

use reelshelf::{config, server};

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "reelshelf=trace,reelshelf_common=debug,tower_http=debug".to_string()
        } else {
            "reelshelf=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let mut config = config::load_config_or_default(cli.config.as_deref())?;

    // CLI flags override the config file
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.static_dir {
        config.server.static_dir = Some(dir);
    }

    let root_arg = cli
        .root
        .or_else(|| config.library.root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let root = config::resolve_root(&root_arg)?;
    config.library.root = Some(root.path().to_path_buf());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(server::start_server(config, root))
}

use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use postbook_server::{PostbookServer, ServerConfig};
use postbook_store::Blog;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve(args) => cmd_serve(config, args),
        Command::Config(args) => cmd_config(&config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!(
        "{} Postbook on {} (page limit {}, max {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.default_page_limit,
        config.max_page_limit,
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let server = PostbookServer::new(config, Blog::in_memory());
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_config(config: &ServerConfig, args: ConfigArgs) -> anyhow::Result<()> {
    let rendered = match args.format {
        OutputFormat::Toml => toml::to_string_pretty(config)?,
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
    };
    println!("{rendered}");
    Ok(())
}

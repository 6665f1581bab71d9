use agate_server::{AgateServer, ServerConfig};
use agate_store::Database;
use anyhow::Context;
use colored::Colorize;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::InitDb(args) => cmd_init_db(args).await,
        Command::Config(args) => cmd_config(args, cli.format),
    }
}

/// Layer file, environment, and flags into one configuration.
fn resolve_config(source: &ConfigSource) -> anyhow::Result<ServerConfig> {
    resolve_config_with(source, |key| std::env::var(key).ok())
}

fn resolve_config_with(
    source: &ConfigSource,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ServerConfig> {
    let mut config = match &source.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    config.apply_env_with(lookup);
    if let Some(url) = &source.database {
        config.database.url = url.clone();
    }
    Ok(config)
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = resolve_config(&args.source)?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }

    let server = AgateServer::connect(config)
        .await
        .context("failed to open database")?;
    println!(
        "{} Agate on {} (database: {})",
        "✓".green().bold(),
        server.config().bind_addr.to_string().bold(),
        server.config().database.url.cyan()
    );
    server.serve().await?;
    Ok(())
}

async fn cmd_init_db(args: InitDbArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.source)?;
    let db = Database::open(&config.database)
        .with_context(|| format!("failed to open {}", config.database.url))?;
    db.ping().await?;
    println!(
        "{} Database ready at {}",
        "✓".green().bold(),
        config.database.url.bold()
    );
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = resolve_config(&args.source)?;
    println!("{}", render_config(&config, &format)?);
    Ok(())
}

fn render_config(config: &ServerConfig, format: &OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => config.to_toml_string()?,
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
    })
}

use admin_bootstrap::{init_logging, AdminContext, AppConfig, SeaOrmConnector};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Shop admin bootstrap CLI
#[derive(Parser, Debug)]
#[command(name = "shop-admin", version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "SHOP_ADMIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load configuration, connect to the database and report
    Check,
    /// Print the effective configuration with secrets masked
    Config {
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },
    /// Print the base and admin URLs
    Urls,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let output = run(cli.command, config).await?;
    println!("{output}");
    Ok(())
}

/// Load configuration and install logging before any command runs
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = AppConfig::load(path).context("failed to load configuration")?;
    init_logging(&config.logging)?;
    tracing::debug!(config = ?config.redacted(), "configuration loaded");
    Ok(config)
}

/// Execute a command and return what it prints on stdout
async fn run(command: Command, config: AppConfig) -> Result<String> {
    match command {
        Command::Check => check(config).await,
        Command::Config { format } => render_config(&config, format),
        Command::Urls => urls(&config),
    }
}

async fn check(config: AppConfig) -> Result<String> {
    let ctx = AdminContext::bootstrap(config, &SeaOrmConnector::new())
        .await
        .context("admin bootstrap failed")?;

    tracing::info!(
        db = %ctx.target(),
        base_url = ctx.urls().base(),
        admin_url = ctx.urls().admin(),
        now = %ctx.now(),
        "bootstrap check passed"
    );

    let summary = format!(
        "ok: {} ({}), admin at {}, timezone {}",
        ctx.target(),
        ctx.target().driver(),
        ctx.urls().admin(),
        ctx.timezone()
    );
    ctx.close().await?;
    Ok(summary)
}

fn urls(config: &AppConfig) -> Result<String> {
    let resolved = config.resolve()?;
    Ok(format!(
        "BASE_URL  {}\nADMIN_URL {}",
        resolved.urls.base(),
        resolved.urls.admin()
    ))
}

fn render_config(config: &AppConfig, format: OutputFormat) -> Result<String> {
    let redacted = config.redacted();
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(&redacted)?,
        OutputFormat::Json => serde_json::to_string_pretty(&redacted)?,
    })
}

use anyhow::{Context, Result};
use clap::Parser;
use portico_engine::config::{ConfigLoader, LoginConfig, validate};
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "portico", version, about = "Scripted login workflow driver")]
pub struct Args {
    /// YAML config file (default: ./portico.yaml, then ~/.portico/config.yaml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Login page URL
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, env = "PORTICO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Operation timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Launch browser in visible mode (not headless)
    #[arg(long)]
    pub visible: bool,

    /// Chrome/Chromium executable
    #[arg(long, env = "CHROME_BIN")]
    pub chrome_path: Option<PathBuf>,

    /// Attach to a running browser via its DevTools WebSocket URL
    #[arg(long, value_name = "WS_URL")]
    pub connect: Option<String>,

    /// Directory for diagnostic screenshots
    #[arg(long)]
    pub screenshot_dir: Option<PathBuf>,

    #[arg(long)]
    pub no_screenshots: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub async fn load(args: &Args) -> Result<LoginConfig> {
    let base = match &args.config {
        Some(path) => ConfigLoader::load_from(path)
            .await
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConfigLoader::load_default()
            .await
            .context("loading default config")?,
    };
    let config = apply(base, args);
    validate(&config)?;
    Ok(config)
}

/// Flags and environment win over file values.
pub fn apply(mut config: LoginConfig, args: &Args) -> LoginConfig {
    if let Some(url) = &args.url {
        config.target_url = url.clone();
    }
    if let Some(username) = &args.username {
        config.username = username.clone();
    }
    if let Some(password) = &args.password {
        config.password = password.clone();
    }
    if let Some(timeout) = args.timeout {
        config.timeouts.operation_ms = timeout;
    }
    if args.visible {
        config.headless = false;
    }
    if let Some(path) = &args.chrome_path {
        config.chrome_path = Some(path.clone());
    }
    if let Some(url) = &args.connect {
        config.remote_url = Some(url.clone());
    }
    if let Some(dir) = &args.screenshot_dir {
        config.screenshots.dir = dir.clone();
    }
    if args.no_screenshots {
        config.screenshots.enabled = false;
    }
    config
}

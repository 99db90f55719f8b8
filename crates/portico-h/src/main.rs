use clap::Parser as ClapParser;
use portico_engine::config::LoginConfig;
use portico_engine::workflow::WorkflowRunner;
use portico_h::backend::HeadlessBackend;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Run the login workflow in a local Chromium", long_about = None)]
struct Args {
    /// Login page URL
    #[arg(long)]
    url: Option<String>,

    #[arg(long)]
    username: Option<String>,

    #[arg(long, env = "PORTICO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Launch browser in visible mode (not headless)
    #[arg(long)]
    visible: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = LoginConfig::default();
    if let Some(url) = args.url {
        config.target_url = url;
    }
    if let Some(username) = args.username {
        config.username = username;
    }
    if let Some(password) = args.password {
        config.password = password;
    }
    config.headless = !args.visible;

    let mut runner = WorkflowRunner::new(HeadlessBackend::new(), config);
    let outcome = runner.run().await;
    runner.cleanup().await;

    match outcome {
        Ok(result) if result.success => {
            println!("Login succeeded");
            ExitCode::SUCCESS
        }
        Ok(result) => {
            println!(
                "Login failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Workflow error: {}", e);
            ExitCode::FAILURE
        }
    }
}

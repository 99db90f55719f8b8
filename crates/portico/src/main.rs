mod settings;

use clap::Parser;
use portico_engine::WorkflowResult;
use portico_engine::workflow::WorkflowRunner;
use portico_h::backend::HeadlessBackend;
use settings::Args;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout only carries the result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let outcome = run(&args).await;
    report(&outcome, args.json);
    ExitCode::from(exit_status(&outcome))
}

async fn run(args: &Args) -> anyhow::Result<WorkflowResult> {
    let config = settings::load(args).await?;
    tracing::debug!("Resolved configuration: {:?}", config);

    let mut runner = WorkflowRunner::new(HeadlessBackend::new(), config);
    let outcome = runner.run().await;
    runner.cleanup().await;
    Ok(outcome?)
}

fn report(outcome: &anyhow::Result<WorkflowResult>, json: bool) {
    match outcome {
        Ok(result) if json => match serde_json::to_string_pretty(result) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => eprintln!("Failed to render result: {}", e),
        },
        Ok(result) if result.success => println!("Workflow completed successfully"),
        Ok(result) => println!(
            "Workflow failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        ),
        Err(e) if json => {
            let rendered = serde_json::json!({ "success": false, "error": format!("{:#}", e) });
            println!("{}", rendered);
        }
        Err(e) => eprintln!("Workflow error: {:#}", e),
    }
}

/// 0 only for a verified login; 1 for a rejected, ambiguous or aborted run.
fn exit_status(outcome: &anyhow::Result<WorkflowResult>) -> u8 {
    match outcome {
        Ok(result) if result.success => 0,
        _ => 1,
    }
}

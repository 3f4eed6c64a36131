use anyhow::Result;
use clap::Parser;
use sitewright_agent::config::AgentArgs;
use sitewright_agent::pipeline;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = AgentArgs::parse();
    info!("sitewright starting (site dir: {})", args.site_dir.display());

    let summary = pipeline::run_with_args(args).await?;

    info!(
        "issue #{}: {} file(s) written, {} block(s) discarded, {} rejected (model {})",
        summary.issue_number,
        summary.report.written.len(),
        summary.parsed.abandoned.len(),
        summary.report.rejected.len(),
        summary.model.name
    );
    for path in &summary.report.written {
        info!("wrote {}", path.display());
    }
    Ok(())
}

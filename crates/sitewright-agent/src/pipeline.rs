use anyhow::{Context, Result};
use sitewright_core::{FileSnapshot, ModelSelection};
use sitewright_prompts::{assemble_prompt, PromptContext};
use tracing::{debug, info, warn};

use crate::applier::{self, ApplyReport};
use crate::client::gemini::GeminiClient;
use crate::client::ModelClient;
use crate::config::{AgentArgs, AgentConfig};
use crate::response_parser::{self, ParsedResponse};
use crate::selector;

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub issue_number: u64,
    pub model: ModelSelection,
    pub parsed: ParsedResponse,
    pub report: ApplyReport,
}

/// Validate `args`, build the Gemini client, and run the pipeline.
/// Nothing is read or sent when validation fails.
pub async fn run_with_args(args: AgentArgs) -> Result<RunSummary> {
    let config = AgentConfig::from_args(args)?;
    let client = GeminiClient::new(
        &config.api_base_url,
        config.api_key.clone(),
        config.request_timeout,
    )?;
    run(&config, &client).await
}

/// select model → read files → build prompt → generate → parse → write.
pub async fn run(config: &AgentConfig, client: &dyn ModelClient) -> Result<RunSummary> {
    info!(
        "handling issue #{} ({})",
        config.issue_number,
        config.repo_name.as_deref().unwrap_or("unknown repo")
    );
    for warning in config.warnings() {
        warn!("{}", warning.message());
    }

    let model = selector::select_model(client, config.model_override.as_deref()).await;

    let snapshot = FileSnapshot::read(&config.site_dir).context("read target files")?;
    for entry in snapshot.entries().iter().filter(|e| !e.exists()) {
        info!("{} does not exist yet", entry.name);
    }

    let prompt = assemble_prompt(&PromptContext {
        request: config.issue_body.clone(),
        snapshot,
    });
    debug!("prompt: {} bytes", prompt.len());

    info!("sending request to {} ({})...", client.name(), model.name);
    let reply = client
        .generate(&model.name, &prompt)
        .await
        .with_context(|| format!("generate content with {}", model.name))?;
    info!("received response ({} bytes)", reply.len());

    let parsed = response_parser::parse_response(&reply);
    for (file, reason) in &parsed.abandoned {
        warn!("discarding block for {file}: {}", reason.as_str());
    }
    if parsed.updates.is_empty() {
        if parsed.abandoned.is_empty() {
            warn!("response contained no file blocks; nothing changed");
        } else {
            warn!("response contained only incomplete file blocks; nothing changed");
        }
    }

    let report =
        applier::apply_updates(&config.site_dir, &parsed.updates).context("apply file updates")?;

    Ok(RunSummary {
        issue_number: config.issue_number,
        model,
        parsed,
        report,
    })
}

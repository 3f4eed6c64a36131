use sitewright_core::{ModelSelection, ModelSource};
use tracing::{info, warn};

use crate::client::ModelClient;

/// Choose the model for this run.
///
/// An explicit override wins without contacting the provider. Otherwise the
/// catalog is fetched once and matched against the priority list; a failed
/// fetch or an empty match falls back. Never fails.
pub async fn select_model(client: &dyn ModelClient, model_override: Option<&str>) -> ModelSelection {
    if let Some(name) = model_override {
        let selection = ModelSelection::overridden(name);
        info!("selected model: {} ({})", selection.name, selection.source);
        return selection;
    }

    info!("listing available models from {}", client.name());
    let available: Vec<String> = match client.list_models().await {
        Ok(models) => models
            .into_iter()
            .filter(|m| m.supports_generate_content())
            .inspect(|m| info!("found supported model: {}", m.name))
            .map(|m| m.name)
            .collect(),
        Err(e) => {
            warn!("error listing models: {e}");
            Vec::new()
        }
    };

    let selection = ModelSelection::from_catalog(&available);
    if selection.source == ModelSource::Fallback {
        warn!(
            "no preferred model available; falling back to '{}'",
            selection.name
        );
    }
    info!("selected model: {} ({})", selection.name, selection.source);
    selection
}

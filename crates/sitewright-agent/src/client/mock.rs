use std::sync::Mutex;

use async_trait::async_trait;

use super::{ClientError, ModelClient, ModelInfo, GENERATE_CONTENT};

/// A call observed by [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListModels,
    Generate { model: String, prompt: String },
}

/// A canned model client for tests. Records every call it receives.
pub struct MockClient {
    catalog: Result<Vec<ModelInfo>, String>,
    response: Result<String, String>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockClient {
    /// A client whose catalog holds `models` (all generation-capable) and
    /// whose generate call returns `response`.
    pub fn new(models: &[&str], response: &str) -> Self {
        let catalog = models
            .iter()
            .map(|name| ModelInfo {
                name: (*name).to_string(),
                supported_generation_methods: vec![GENERATE_CONTENT.to_string()],
            })
            .collect();
        Self {
            catalog: Ok(catalog),
            response: Ok(response.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the catalog with explicit entries.
    pub fn with_catalog(mut self, catalog: Vec<ModelInfo>) -> Self {
        self.catalog = Ok(catalog);
        self
    }

    /// Make `list_models` fail.
    pub fn with_catalog_error(mut self, message: &str) -> Self {
        self.catalog = Err(message.to_string());
        self
    }

    /// Make `generate` fail.
    pub fn with_generate_error(mut self, message: &str) -> Self {
        self.response = Err(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl ModelClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ClientError> {
        self.record(MockCall::ListModels);
        self.catalog.clone().map_err(ClientError::Transport)
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ClientError> {
        self.record(MockCall::Generate {
            model: model.to_string(),
            prompt: prompt.to_string(),
        });
        self.response.clone().map_err(ClientError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_canned_values_and_records_calls() {
        let mock = MockClient::new(&["models/gemini-pro"], "reply");
        let models = mock.list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert!(models[0].supports_generate_content());

        let text = mock.generate("models/gemini-pro", "prompt").await.unwrap();
        assert_eq!(text, "reply");

        assert_eq!(
            mock.calls(),
            vec![
                MockCall::ListModels,
                MockCall::Generate {
                    model: "models/gemini-pro".into(),
                    prompt: "prompt".into(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn canned_errors() {
        let mock = MockClient::new(&[], "")
            .with_catalog_error("boom")
            .with_generate_error("quota exceeded");
        let err = mock.list_models().await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        let err = mock.generate("m", "p").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn name_is_mock() {
        assert_eq!(MockClient::new(&[], "").name(), "mock");
    }
}

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ClientError, ModelClient, ModelInfo};

const PAGE_SIZE: &str = "1000";
/// Upper bound on catalog pages fetched by one `list_models` call.
pub const MAX_CATALOG_PAGES: usize = 100;

/// Gemini REST client (`generativelanguage.googleapis.com`).
pub struct GeminiClient {
    /// Base URL including the API version, e.g. ".../v1beta".
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("sitewright")
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn list_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse, ClientError> {
        let mut builder = self
            .client
            .get(self.api_url("models"))
            .header("x-goog-api-key", &self.api_key)
            .query(&[("pageSize", PAGE_SIZE)]);
        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        handle_response(resp).await
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ClientError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens: HashSet<String> = HashSet::new();
        let mut pages = 0;

        loop {
            if pages == MAX_CATALOG_PAGES {
                return Err(ClientError::Decode(format!(
                    "model catalog exceeds {MAX_CATALOG_PAGES} pages"
                )));
            }
            let page = self.list_page(page_token.as_deref()).await?;
            pages += 1;
            models.extend(page.models.into_iter().map(|m| ModelInfo {
                name: m.name,
                supported_generation_methods: m.supported_generation_methods,
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        warn!("gemini: catalog page token {token:?} repeats, stopping");
                        break;
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        debug!("gemini: catalog lists {} models", models.len());
        Ok(models)
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ClientError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = self.api_url(&format!("{}:generateContent", resource_name(model)));
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let parsed: GenerateResponse = handle_response(resp).await?;
        parsed.text()
    }
}

/// Qualify a bare model name ("gemini-pro") as an API resource ("models/gemini-pro").
pub fn resource_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Result<String, ClientError> {
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let texts: Vec<String> = parts.into_iter().filter_map(|p| p.text).collect();
        if texts.is_empty() {
            return Err(ClientError::EmptyResponse);
        }
        Ok(texts.concat())
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(parse_api_error(status, &body))
    }
}

/// Gemini errors look like `{"error": {"code": 400, "message": "...", "status": "..."}}`.
fn parse_api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string());

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_name_prefixes_bare_names() {
        assert_eq!(resource_name("gemini-pro"), "models/gemini-pro");
        assert_eq!(resource_name("models/gemini-2.5-pro"), "models/gemini-2.5-pro");
        assert_eq!(resource_name("tunedModels/my-model"), "tunedModels/my-model");
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client =
            GeminiClient::new("http://localhost:1234/v1beta/", "k".into(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.api_url("models"), "http://localhost:1234/v1beta/models");
    }

    #[test]
    fn decode_model_list() {
        let json = r#"{
            "models": [
                {"name": "models/gemini-2.5-pro", "supportedGenerationMethods": ["generateContent", "countTokens"]},
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]},
                {"name": "models/aqa"}
            ],
            "nextPageToken": "abc"
        }"#;
        let parsed: ListModelsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.models.len(), 3);
        assert_eq!(parsed.models[0].supported_generation_methods.len(), 2);
        assert!(parsed.models[2].supported_generation_methods.is_empty());
        assert_eq!(parsed.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn decode_empty_model_list() {
        let parsed: ListModelsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.models.is_empty());
        assert!(parsed.next_page_token.is_none());
    }

    #[test]
    fn generate_request_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hello" }],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"contents": [{"role": "user", "parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "FILE: a\n"}, {"text": "```\nx\n```"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().unwrap(), "FILE: a\n```\nx\n```");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(matches!(parsed.text(), Err(ClientError::EmptyResponse)));
    }

    #[test]
    fn candidate_without_content_is_empty() {
        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(matches!(parsed.text(), Err(ClientError::EmptyResponse)));
    }

    #[test]
    fn api_error_uses_json_message() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        match parse_api_error(StatusCode::BAD_REQUEST, body) {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        match parse_api_error(StatusCode::BAD_GATEWAY, "upstream unavailable") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

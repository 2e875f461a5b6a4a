use super::{build_prompt, AdvisoryComposer, PromptContext};
use crate::config::GeminiConfig;
use crate::error::{Result, WeatherWatchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

// generateContent response structures
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| WeatherWatchError::Composer(format!("Gemini: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherWatchError::Composer(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            WeatherWatchError::Composer(format!(
                "Failed to parse Gemini response: {}",
                e.without_url()
            ))
        })?;

        tracing::debug!(
            latency_ms = started.elapsed().as_secs_f64() * 1000.0,
            model = %self.config.model,
            "Gemini response received"
        );

        Self::extract_text(parsed)
    }

    fn extract_text(response: GenerateResponse) -> Result<String> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(WeatherWatchError::Composer(
                "Gemini returned no text".into(),
            ))
        } else {
            Ok(text)
        }
    }
}

#[async_trait]
impl AdvisoryComposer for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn compose(&self, question: &str, context: &PromptContext) -> Result<String> {
        let prompt = build_prompt(question, context);
        self.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_key: "k".into(),
            model: "gemini-2.5-flash".into(),
            enabled: true,
            api_base: base.to_string(),
        })
    }

    #[tokio::test]
    async fn compose_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [
                    {"content": {"parts": [{"text": "Wear "}, {"text": "a jacket."}]}}
                ]
            })))
            .mount(&server)
            .await;

        let ctx = PromptContext::unavailable("Dresden", "offline");
        let reply = client(&server.uri()).compose("Jacket?", &ctx).await.unwrap();
        assert_eq!(reply, "Wear a jacket.");
    }

    #[tokio::test]
    async fn empty_candidates_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let ctx = PromptContext::unavailable("Dresden", "offline");
        assert!(matches!(
            client(&server.uri()).compose("?", &ctx).await,
            Err(WeatherWatchError::Composer(_))
        ));
    }

    #[tokio::test]
    async fn connection_error_does_not_reveal_api_key() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "SUPERSECRETKEY".into(),
            model: "gemini-2.5-flash".into(),
            enabled: true,
            api_base: "http://127.0.0.1:1".into(),
        });

        let ctx = PromptContext::unavailable("Dresden", "offline");
        let err = client.compose("?", &ctx).await.unwrap_err();
        let reply = format!("Gemini is busy: {}", err);
        assert!(matches!(err, WeatherWatchError::Composer(_)));
        assert!(!reply.contains("SUPERSECRETKEY"), "{}", reply);
    }
}

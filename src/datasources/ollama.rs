use crate::config::OllamaConfig;
use crate::error::{Result, WindWatchError};
use crate::logic::Summarizer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), endpoint)
    }

    /// Single non-streaming completion
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| WindWatchError::DataSourceUnavailable(format!("Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WindWatchError::DataSourceUnavailable(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WindWatchError::DataSourceUnavailable(format!("Ollama: {}", e)))?;
        let generated: GenerateResponse = serde_json::from_str(&body)?;

        Ok(generated.response)
    }

    /// Test connection to the Ollama server
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .send()
            .await
            .map_err(|e| WindWatchError::DataSourceUnavailable(format!("Ollama: {}", e)))?;

        Ok(response.status().is_success())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Summarizer for OllamaClient {
    async fn summarize(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OllamaClient {
        OllamaClient::new(OllamaConfig {
            host: format!("{}/", server.uri()),
            model: "llama3.1".into(),
        })
    }

    #[tokio::test]
    async fn generate_posts_non_streaming_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(serde_json::json!({
                "model": "llama3.1",
                "prompt": "Summarize",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.1",
                "response": "Mostly westerly, easterly from Thursday.",
                "done": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let summary = client(&mock_server).generate("Summarize").await.unwrap();
        assert_eq!(summary, "Mostly westerly, easterly from Thursday.");
    }

    #[tokio::test]
    async fn generate_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&mock_server)
            .await;

        match client(&mock_server).summarize("x").await {
            Err(WindWatchError::DataSourceUnavailable(msg)) => {
                assert!(msg.contains("404"));
                assert!(msg.contains("model not found"));
            }
            other => panic!("expected DataSourceUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn generate_rejects_non_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"response\": \"par"))
            .mount(&mock_server)
            .await;

        assert!(matches!(
            client(&mock_server).generate("x").await,
            Err(WindWatchError::Json(_))
        ));
    }

    #[tokio::test]
    async fn generate_unreachable_host() {
        let client = OllamaClient::new(OllamaConfig {
            host: "http://127.0.0.1:1".into(),
            model: "llama3.1".into(),
        });
        assert!(matches!(
            client.generate("x").await,
            Err(WindWatchError::DataSourceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn connection_test_uses_tags() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": []
            })))
            .mount(&mock_server)
            .await;

        assert!(client(&mock_server).test_connection().await.unwrap());
    }
}

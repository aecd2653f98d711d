use std::time::Duration;

use docqa_core::LlmError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Thin client for the `/api/generate` and `/api/show` endpoints of an
/// Ollama-compatible model server.
#[derive(Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    timeout: Duration,
    http: Client,
}

/// Per-request generation options. Sampling is always greedy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub max_tokens: usize,
    pub stop: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ShowRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions<'a>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions<'a> {
    temperature: f32,
    num_predict: usize,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let http = Client::builder()
            .build()
            .map_err(|err| LlmError::Provider(err.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
            http,
        })
    }

    /// Upper bound on one generation request, including the wait for the
    /// first byte.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Checks that the server is reachable and has the model installed.
    pub async fn probe(&self) -> Result<(), LlmError> {
        let unavailable = |reason: String| LlmError::Unavailable {
            backend: self.model.clone(),
            reason,
        };
        let response = self
            .http
            .post(self.url("/api/show"))
            .json(&ShowRequest { name: &self.model })
            .send()
            .await
            .map_err(|err| unavailable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(format!("server answered {}", response.status())));
        }
        Ok(())
    }

    /// Runs one non-streaming completion and returns the raw model output.
    pub async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, LlmError> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: 0.0,
                num_predict: options.max_tokens,
                stop: &options.stop,
            },
        };

        let call = async {
            let response: OllamaGenerateResponse = self
                .http
                .post(self.url("/api/generate"))
                .json(&request)
                .send()
                .await
                .map_err(|err| LlmError::Provider(err.to_string()))?
                .error_for_status()
                .map_err(|err| LlmError::Provider(err.to_string()))?
                .json()
                .await
                .map_err(|err| LlmError::Provider(err.to_string()))?;
            Ok::<_, LlmError>(response.response)
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                backend: self.model.clone(),
                after: self.timeout,
            }),
        }
    }
}

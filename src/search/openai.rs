//! OpenAI-compatible embedding client.
//!
//! Works against any server exposing `POST {base_url}/embeddings` with the
//! OpenAI request/response shape (OpenAI itself, or a local server hosting a
//! sentence-transformers model such as `all-MiniLM-L6-v2`).

use std::thread;
use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FfcsError, Result};
use crate::search::embeddings::{Embedder, ensure_dims};

/// Blocking embeddings client.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dims: usize,
    max_retries: usize,
    batch_size: usize,
}

impl OpenAiEmbedder {
    /// Build a client. `api_key` may be empty for local servers without auth.
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        dims: usize,
        timeout: Duration,
        max_retries: usize,
        batch_size: usize,
    ) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(FfcsError::Config("missing embedding model name".to_string()));
        }
        if dims == 0 {
            return Err(FfcsError::Config("embedding dims must be positive".to_string()));
        }

        let mut headers = HeaderMap::new();
        if !api_key.trim().is_empty() {
            let auth = format!("Bearer {}", api_key.trim());
            let value = HeaderValue::from_str(&auth)
                .map_err(|err| FfcsError::Config(format!("invalid embedding API key: {err}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| FfcsError::Embedding(format!("build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            dims,
            max_retries: max_retries.max(1),
            batch_size: batch_size.max(1),
        })
    }

    fn request(&self, inputs: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let mut attempt = 0usize;
        loop {
            let body = EmbeddingRequest {
                model: &self.model,
                input: inputs,
            };
            match self.client.post(&self.endpoint).json(&body).send() {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let mut parsed: EmbeddingResponse = resp
                            .json()
                            .context("failed to parse embedding response")?;
                        parsed.data.sort_by_key(|entry| entry.index);
                        anyhow::ensure!(
                            parsed.data.len() == inputs.len(),
                            "provider returned {} embeddings for {} inputs",
                            parsed.data.len(),
                            inputs.len()
                        );
                        return Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect());
                    }

                    let text = resp
                        .text()
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        warn!(%status, attempt, "embedding request failed, retrying");
                        thread::sleep(retry_backoff(attempt));
                        continue;
                    }
                    anyhow::bail!("embedding request failed ({status}): {text}");
                }
                Err(err) => {
                    if is_retryable(&err) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        warn!(error = %err, attempt, "embedding transport error, retrying");
                        thread::sleep(retry_backoff(attempt));
                        continue;
                    }
                    return Err(err).context(format!("POST {}", self.endpoint));
                }
            }
        }
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| FfcsError::Embedding("provider returned no embedding".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            debug!(batch = chunk.len(), model = %self.model, "requesting embeddings");
            let vectors = self
                .request(chunk)
                .map_err(|err| FfcsError::Embedding(format!("{err:#}")))?;
            for vector in &vectors {
                ensure_dims(self.dims, vector)?;
            }
            out.extend(vectors);
        }
        Ok(out)
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_body() || err.is_request()
}

fn retry_backoff(attempt: usize) -> Duration {
    #[allow(clippy::cast_possible_truncation)]
    let capped = attempt.min(5) as u32;
    Duration::from_millis(100 * (1 << capped))
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

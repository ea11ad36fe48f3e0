use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EMBED_PATH;
use crate::error::{RagError, Result};
use crate::service::http::ServiceClient;

/// A dense vector produced by the embedding model.
pub type Embedding = Vec<f32>;

const SERVICE: &str = "embedding";

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: EmbedInput<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EmbedInput<'a> {
    One(&'a str),
    Many(&'a [&'a str]),
}

/// Either response shape the service may use. `embedding` is the
/// single-input form, `embeddings` the batch form (also used for a single
/// input by newer servers).
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embedding: Option<Embedding>,
    #[serde(default)]
    embeddings: Option<Vec<Embedding>>,
}

impl EmbedResponse {
    /// Single-input decode order: `embedding`, then `embeddings[0]`.
    fn into_single(self) -> Result<Embedding> {
        let vector = match (self.embedding, self.embeddings) {
            (Some(vector), _) => vector,
            (None, Some(batch)) => batch.into_iter().next().ok_or_else(|| {
                RagError::malformed("embedding response has an empty `embeddings` list")
            })?,
            (None, None) => {
                return Err(RagError::malformed(
                    "embedding response has neither `embedding` nor `embeddings`",
                ));
            }
        };
        if vector.is_empty() {
            return Err(RagError::malformed("embedding vector is empty"));
        }
        Ok(vector)
    }

    /// Batch decode: `embeddings` must exist and hold one vector per input.
    fn into_batch(self, expected: usize) -> Result<Vec<Embedding>> {
        let batch = self
            .embeddings
            .ok_or_else(|| RagError::malformed("embedding response has no `embeddings` list"))?;
        if batch.len() != expected {
            return Err(RagError::malformed(format!(
                "expected {expected} embeddings, service returned {}",
                batch.len()
            )));
        }
        Ok(batch)
    }
}

/// Client for the embedding endpoint.
#[derive(Clone)]
pub struct EmbeddingClient {
    service: ServiceClient,
    model: String,
}

impl EmbeddingClient {
    pub fn new(service: ServiceClient, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed a single query string.
    pub fn embed_query(&self, text: &str) -> Result<Embedding> {
        let request = EmbedRequest {
            model: &self.model,
            input: EmbedInput::One(text),
        };
        let response: EmbedResponse = self.service.post_json(SERVICE, EMBED_PATH, &request)?;
        let vector = response.into_single()?;
        debug!(model = %self.model, dimension = vector.len(), "Query embedded");
        Ok(vector)
    }

    /// Embed `texts` in one request. The result has the same length and
    /// order as the input. An empty input makes no request.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbedRequest {
            model: &self.model,
            input: EmbedInput::Many(texts),
        };
        let response: EmbedResponse = self.service.post_json(SERVICE, EMBED_PATH, &request)?;
        let batch = response.into_batch(texts.len())?;
        debug!(model = %self.model, count = batch.len(), "Batch embedded");
        Ok(batch)
    }
}

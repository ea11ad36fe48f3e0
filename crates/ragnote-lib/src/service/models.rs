use serde::Deserialize;
use tracing::debug;

use crate::config::{EMBEDDING_MODEL_MARKER, MODELS_PATH};
use crate::error::Result;
use crate::service::http::ServiceClient;

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    model: String,
}

/// Installed model names split by capability.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModelCatalog {
    pub embedding: Vec<String>,
    pub completion: Vec<String>,
}

impl ModelCatalog {
    /// Partition names by a case-insensitive `embed` substring. Everything
    /// else is treated as a completion model. Service order is kept.
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let (embedding, completion): (Vec<String>, Vec<String>) = names
            .into_iter()
            .partition(|name| is_embedding_model(name));
        Self {
            embedding,
            completion,
        }
    }
}

pub fn is_embedding_model(name: &str) -> bool {
    name.to_lowercase().contains(EMBEDDING_MODEL_MARKER)
}

/// Fetch the installed models from the service.
pub fn list_models(service: &ServiceClient) -> Result<ModelCatalog> {
    let response: TagsResponse = service.get_json("model listing", MODELS_PATH)?;
    let catalog = ModelCatalog::from_names(response.models.into_iter().map(|m| m.model));
    debug!(
        embedding = catalog.embedding.len(),
        completion = catalog.completion.len(),
        "Model catalog fetched"
    );
    Ok(catalog)
}

//! Request and response bodies in the shape spoken by an Ollama server,
//! for use with mock HTTP servers.

use serde_json::{Value, json};

/// Embedding response in the batch (`embeddings`) form.
pub fn embed_body(vectors: &[Vec<f32>]) -> String {
    json!({ "model": "nomic-embed-text", "embeddings": vectors }).to_string()
}

/// Expected request body for embedding a single text.
pub fn single_embed_request(model: &str, text: &str) -> Value {
    json!({ "model": model, "input": text })
}

/// Expected request body for embedding several texts.
pub fn batch_embed_request(model: &str, texts: &[&str]) -> Value {
    json!({ "model": model, "input": texts })
}

/// Chat response carrying `answer` as the assistant message.
pub fn chat_body(answer: &str) -> String {
    json!({
        "model": "llama3",
        "created_at": "2026-01-01T00:00:00Z",
        "message": { "role": "assistant", "content": answer },
        "done": true
    })
    .to_string()
}

/// Expected request body for a non-streaming two-message chat.
pub fn chat_request(model: &str, system: &str, user: &str) -> Value {
    json!({
        "model": model,
        "stream": false,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user }
        ]
    })
}

/// Model listing response for the given names.
pub fn tags_body(names: &[&str]) -> String {
    let models: Vec<Value> = names
        .iter()
        .map(|name| json!({ "name": name, "model": name, "size": 1 }))
        .collect();
    json!({ "models": models }).to_string()
}

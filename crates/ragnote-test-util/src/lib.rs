pub mod ollama;
pub mod vault;

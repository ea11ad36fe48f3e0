use std::time::Duration;

/// Function words dropped from a query before keyword matching.
pub const STOP_WORDS: &[&str] = &[
    "what", "are", "the", "is", "of", "on", "to", "in", "and", "or", "a", "an", "for", "this",
    "that", "with",
];

/// Characters kept before the first keyword hit when cutting a snippet.
pub const SNIPPET_CHARS_BEFORE: usize = 50;

/// Characters kept from the first keyword hit onwards when cutting a snippet.
pub const SNIPPET_CHARS_AFTER: usize = 150;

/// Approximate token overhead of the `File: ...` label and separators that
/// accompany every snippet in the assembled context.
pub const CHUNK_OVERHEAD_TOKENS: usize = 20;

/// Stabilizer added to the cosine denominator so zero vectors score 0.
pub const COSINE_EPSILON: f64 = 1e-8;

/// Smallest token budget accepted from settings.
pub const MIN_TOKEN_BUDGET: usize = 256;

/// Largest token budget accepted from settings.
pub const MAX_TOKEN_BUDGET: usize = 8192;

/// Token budget used when none has been configured.
pub const DEFAULT_TOKEN_BUDGET: usize = 2048;

/// Base URL of a locally running Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

pub const DEFAULT_COMPLETION_MODEL: &str = "llama3";

/// Per-request deadline. Completion on a local model can be slow, so this is
/// generous.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub const EMBED_PATH: &str = "/api/embed";

pub const CHAT_PATH: &str = "/api/chat";

pub const MODELS_PATH: &str = "/api/tags";

/// Answer reported when the completion service returns neither
/// `message.content` nor `response`.
pub const NO_RESPONSE_PLACEHOLDER: &str = "[no response]";

/// System message sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Answer only using the provided \
     context. If the context does not contain the answer, say that you don't know.";

/// Case-insensitive marker that identifies embedding-capable model names.
pub const EMBEDDING_MODEL_MARKER: &str = "embed";

/// Name of the settings file inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// File extensions (without the dot) exposed by a directory vault.
pub const NOTE_EXTENSIONS: &[&str] = &["md", "txt"];

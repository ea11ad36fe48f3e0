use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CHAT_PATH, NO_RESPONSE_PLACEHOLDER, SYSTEM_INSTRUCTION};
use crate::error::Result;
use crate::service::http::ServiceClient;

const SERVICE: &str = "completion";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ReplyMessage>,
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Decode order: `message.content`, then `response`, then the
    /// placeholder.
    fn into_answer(self) -> String {
        self.message
            .and_then(|m| m.content)
            .or(self.response)
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string())
    }
}

/// Render the user message for a context and query.
pub fn user_prompt(context: &str, query: &str) -> String {
    format!("Context:\n{context}\n\nQuery: {query}")
}

/// Client for the chat-completion endpoint. Streaming is always disabled.
#[derive(Clone)]
pub struct CompletionClient {
    service: ServiceClient,
    model: String,
}

impl CompletionClient {
    pub fn new(service: ServiceClient, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model to answer `query` from `context`.
    pub fn complete(&self, context: &str, query: &str) -> Result<String> {
        let prompt = user_prompt(context, query);
        let request = ChatRequest {
            model: &self.model,
            stream: false,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!(
            model = %self.model,
            context_len = context.len(),
            query_len = query.len(),
            "Requesting completion"
        );
        let response: ChatResponse = self.service.post_json(SERVICE, CHAT_PATH, &request)?;
        Ok(response.into_answer())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mockito::{Matcher, Server};
    use ragnote_test_util::ollama::{chat_body, chat_request};
    use serde_json::json;

    use super::*;
    use crate::error::RagError;

    fn client(server: &Server) -> CompletionClient {
        let service = ServiceClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        CompletionClient::new(service, "llama3")
    }

    #[test]
    fn user_prompt_uses_context_then_query() {
        assert_eq!(
            user_prompt("File: A\nnotes", "what?"),
            "Context:\nFile: A\nnotes\n\nQuery: what?"
        );
    }

    #[test]
    fn complete_sends_system_and_user_messages_without_streaming() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::Json(chat_request(
                "llama3",
                SYSTEM_INSTRUCTION,
                "Context:\nFile: A\nthe cat\n\nQuery: cat?",
            )))
            .with_body(chat_body("A cat."))
            .create();

        let answer = client(&server).complete("File: A\nthe cat", "cat?").unwrap();
        assert_eq!(answer, "A cat.");
        mock.assert();
    }

    #[test]
    fn falls_back_to_response_field() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/chat")
            .with_body(json!({"response": "generated"}).to_string())
            .create();

        assert_eq!(client(&server).complete("c", "q").unwrap(), "generated");
    }

    #[test]
    fn message_without_content_falls_back_to_response() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/chat")
            .with_body(json!({"message": {"role": "assistant"}, "response": "r"}).to_string())
            .create();

        assert_eq!(client(&server).complete("c", "q").unwrap(), "r");
    }

    #[test]
    fn neither_field_yields_placeholder() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/chat")
            .with_body(json!({"done": true}).to_string())
            .create();

        assert_eq!(client(&server).complete("c", "q").unwrap(), "[no response]");
    }

    #[test]
    fn unparseable_body_is_malformed() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/chat")
            .with_body("internal error")
            .create();

        let err = client(&server).complete("c", "q").unwrap_err();
        assert!(matches!(err, RagError::MalformedResponse { .. }));
    }

    #[test]
    fn http_error_is_service_status() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/chat")
            .with_status(404)
            .with_body(r#"{"error":"model 'llama3' not found"}"#)
            .create();

        let err = client(&server).complete("c", "q").unwrap_err();
        assert!(matches!(err, RagError::ServiceStatus { status: 404, .. }));
    }
}

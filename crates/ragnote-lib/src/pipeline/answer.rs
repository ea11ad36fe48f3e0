use tracing::{debug, warn};

use crate::error::Result;
use crate::pipeline::assemble::{pack, render};
use crate::pipeline::lexical::{extract_keywords, filter};
use crate::pipeline::rank::{RankedCandidate, rank};
use crate::service::complete::CompletionClient;
use crate::service::embed::EmbeddingClient;
use crate::service::http::ServiceClient;
use crate::settings::Settings;
use crate::vault::{Document, DocumentStore, load_documents};

/// A note that contributed to the context, with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub document_id: String,
    pub similarity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    /// The context that was sent to the completion service.
    pub context: String,
    /// Notes included in the context, best first.
    pub sources: Vec<Source>,
}

/// Result of a query that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No note matched the query's keywords. No service was called.
    NoMatches,
    Answered(Answer),
}

/// The retrieval-augmented answering pipeline for one settings snapshot.
///
/// Stateless between calls; a single instance may serve any number of
/// queries.
pub struct Pipeline {
    embedder: EmbeddingClient,
    completer: CompletionClient,
    token_budget: usize,
}

impl Pipeline {
    pub fn new(settings: &Settings) -> Result<Self> {
        let service = ServiceClient::new(&settings.base_url, settings.request_timeout())?;
        Ok(Self {
            embedder: EmbeddingClient::new(service.clone(), settings.embedding_model.as_str()),
            completer: CompletionClient::new(service, settings.completion_model.as_str()),
            token_budget: settings.token_budget,
        })
    }

    /// Override the token budget taken from settings.
    #[must_use]
    pub fn with_token_budget(mut self, token_budget: usize) -> Self {
        self.token_budget = token_budget;
        self
    }

    pub fn token_budget(&self) -> usize {
        self.token_budget
    }

    /// Answer `query` from the documents in `store`.
    pub fn run(&self, store: &dyn DocumentStore, query: &str) -> Result<Outcome> {
        if extract_keywords(query).is_empty() {
            debug!("Query has no keywords after stop-word removal");
            return Ok(Outcome::NoMatches);
        }
        let documents = load_documents(store)?;
        self.answer(&documents, query)
    }

    /// Answer `query` from an already loaded document set.
    ///
    /// Stages run in order: lexical filter, query embedding, snippet
    /// embeddings, ranking, context assembly, completion. Any failure aborts
    /// the query.
    pub fn answer(&self, documents: &[Document], query: &str) -> Result<Outcome> {
        debug!(
            query_len = query.len(),
            documents = documents.len(),
            token_budget = self.token_budget,
            "Answering query"
        );

        // Phase 1: lexical filter
        let candidates = filter(query, documents);
        debug!(candidates = candidates.len(), "Phase 1: lexical filter");
        if candidates.is_empty() {
            return Ok(Outcome::NoMatches);
        }

        // Phase 2: embed query and snippets
        let query_embedding = self.embedder.embed_query(query)?;
        let snippets: Vec<&str> = candidates.iter().map(|c| c.snippet.as_str()).collect();
        let snippet_embeddings = self.embedder.embed_batch(&snippets)?;
        debug!(
            dimension = query_embedding.len(),
            snippets = snippet_embeddings.len(),
            "Phase 2: embeddings"
        );

        // Phase 3: rank by cosine similarity
        let ranked = rank(
            &query_embedding,
            candidates.into_iter().zip(snippet_embeddings).collect(),
        )?;
        debug!(
            best = ranked.first().map(|r| r.similarity),
            "Phase 3: ranked"
        );

        // Phase 4: greedy context assembly
        let packing = pack(&ranked, self.token_budget);
        let included = &ranked[..packing.included];
        let context = render(included);
        debug!(
            included = packing.included,
            tokens = packing.tokens,
            "Phase 4: context assembled"
        );
        if included.is_empty() {
            warn!(
                token_budget = self.token_budget,
                "No snippet fits the token budget; sending an empty context"
            );
        }

        // Phase 5: completion
        let text = self.completer.complete(&context, query)?;
        debug!(answer_len = text.len(), "Phase 5: completion received");

        Ok(Outcome::Answered(Answer {
            text,
            context,
            sources: included.iter().map(Source::from).collect(),
        }))
    }
}

impl From<&RankedCandidate<'_>> for Source {
    fn from(ranked: &RankedCandidate<'_>) -> Self {
        Self {
            document_id: ranked.document_id().to_string(),
            similarity: ranked.similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use ragnote_test_util::ollama::{
        batch_embed_request, chat_body, chat_request, embed_body, single_embed_request,
    };
    use serde_json::json;

    use super::*;
    use crate::config::SYSTEM_INSTRUCTION;
    use crate::error::RagError;
    use crate::test_util::settings_for;
    use crate::vault::MemoryVault;

    #[test]
    fn answers_from_single_matching_note() {
        let mut server = Server::new();
        let query_mock = server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(single_embed_request(
                "nomic-embed-text",
                "what is a cat",
            )))
            .with_body(embed_body(&[vec![1.0, 0.0]]))
            .expect(1)
            .create();
        let batch_mock = server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(batch_embed_request(
                "nomic-embed-text",
                &["the cat sat on the mat"],
            )))
            .with_body(embed_body(&[vec![1.0, 0.0]]))
            .expect(1)
            .create();
        let chat_mock = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::Json(chat_request(
                "llama3",
                SYSTEM_INSTRUCTION,
                "Context:\nFile: A\nthe cat sat on the mat\n\nQuery: what is a cat",
            )))
            .with_body(chat_body("A cat is a small animal that sits on mats."))
            .expect(1)
            .create();

        let pipeline = Pipeline::new(&settings_for(&server.url())).unwrap();
        let store = MemoryVault::new().with_note("A", "the cat sat on the mat");
        let outcome = pipeline.run(&store, "what is a cat").unwrap();

        let Outcome::Answered(answer) = outcome else {
            panic!("expected an answer");
        };
        assert_eq!(answer.text, "A cat is a small animal that sits on mats.");
        assert_eq!(answer.context, "File: A\nthe cat sat on the mat");
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].document_id, "A");
        assert!((answer.sources[0].similarity - 1.0).abs() < 1e-6);

        query_mock.assert();
        batch_mock.assert();
        chat_mock.assert();
    }

    #[test]
    fn stop_word_query_makes_no_service_calls() {
        let mut server = Server::new();
        let any_call = server.mock("POST", Matcher::Any).expect(0).create();

        let pipeline = Pipeline::new(&settings_for(&server.url())).unwrap();
        let store = MemoryVault::new().with_note("A", "what is the meaning");
        assert_eq!(pipeline.run(&store, "what is the").unwrap(), Outcome::NoMatches);
        any_call.assert();
    }

    #[test]
    fn unmatched_keywords_make_no_service_calls() {
        let mut server = Server::new();
        let any_call = server.mock("POST", Matcher::Any).expect(0).create();

        let pipeline = Pipeline::new(&settings_for(&server.url())).unwrap();
        let store = MemoryVault::new().with_note("A", "dogs and birds");
        assert_eq!(pipeline.run(&store, "giraffe").unwrap(), Outcome::NoMatches);
        any_call.assert();
    }

    #[test]
    fn empty_batch_embeddings_fail_the_query() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(single_embed_request(
                "nomic-embed-text",
                "cat facts",
            )))
            .with_body(embed_body(&[vec![1.0, 0.0]]))
            .create();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(batch_embed_request(
                "nomic-embed-text",
                &["the cat sat on the mat"],
            )))
            .with_body(json!({"embeddings": []}).to_string())
            .create();
        let chat_mock = server.mock("POST", "/api/chat").expect(0).create();

        let pipeline = Pipeline::new(&settings_for(&server.url())).unwrap();
        let store = MemoryVault::new().with_note("A", "the cat sat on the mat");
        let err = pipeline.run(&store, "cat facts").unwrap_err();

        assert!(matches!(err, RagError::MalformedResponse { .. }));
        chat_mock.assert();
    }

    #[test]
    fn dimension_mismatch_fails_before_completion() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(single_embed_request(
                "nomic-embed-text",
                "cat",
            )))
            .with_body(embed_body(&[vec![1.0, 0.0, 0.0]]))
            .create();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(batch_embed_request(
                "nomic-embed-text",
                &["cat"],
            )))
            .with_body(embed_body(&[vec![1.0, 0.0]]))
            .create();
        let chat_mock = server.mock("POST", "/api/chat").expect(0).create();

        let pipeline = Pipeline::new(&settings_for(&server.url())).unwrap();
        let store = MemoryVault::new().with_note("A", "cat");
        let err = pipeline.run(&store, "cat").unwrap_err();

        assert!(matches!(err, RagError::ContractViolation(_)));
        chat_mock.assert();
    }

    #[test]
    fn budget_limits_context_to_best_snippet() {
        // Each note is 10 words, so each costs 30 approximate tokens.
        let near = "rust borrow checker rules keep references valid at all times";
        let far = "rust compile times improve with incremental builds and build caching";

        let mut server = Server::new();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(single_embed_request(
                "nomic-embed-text",
                "rust",
            )))
            .with_body(embed_body(&[vec![1.0, 0.0]]))
            .create();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(batch_embed_request(
                "nomic-embed-text",
                &[far, near],
            )))
            .with_body(embed_body(&[vec![0.0, 1.0], vec![1.0, 0.1]]))
            .create();
        let chat_mock = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::Json(chat_request(
                "llama3",
                SYSTEM_INSTRUCTION,
                &format!("Context:\nFile: near.md\n{near}\n\nQuery: rust"),
            )))
            .with_body(chat_body("Borrowing."))
            .create();

        let pipeline = Pipeline::new(&settings_for(&server.url()))
            .unwrap()
            .with_token_budget(40);
        let store = MemoryVault::new()
            .with_note("far.md", far)
            .with_note("near.md", near);
        let outcome = pipeline.run(&store, "rust").unwrap();

        let Outcome::Answered(answer) = outcome else {
            panic!("expected an answer");
        };
        assert_eq!(answer.text, "Borrowing.");
        let ids: Vec<_> = answer.sources.iter().map(|s| s.document_id.as_str()).collect();
        assert_eq!(ids, vec!["near.md"]);
        chat_mock.assert();
    }

    #[test]
    fn completion_failure_propagates() {
        let mut server = Server::new();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(single_embed_request(
                "nomic-embed-text",
                "cat",
            )))
            .with_body(embed_body(&[vec![1.0]]))
            .create();
        server
            .mock("POST", "/api/embed")
            .match_body(Matcher::Json(batch_embed_request(
                "nomic-embed-text",
                &["cat"],
            )))
            .with_body(embed_body(&[vec![1.0]]))
            .create();
        server
            .mock("POST", "/api/chat")
            .with_status(503)
            .with_body("busy")
            .create();

        let pipeline = Pipeline::new(&settings_for(&server.url())).unwrap();
        let store = MemoryVault::new().with_note("A", "cat");
        let err = pipeline.run(&store, "cat").unwrap_err();
        assert!(matches!(err, RagError::ServiceStatus { status: 503, .. }));
    }
}

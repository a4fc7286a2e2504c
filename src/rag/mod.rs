//! Retrieval engine for question answering over the journal.
//!
//! Embeds a question, retrieves the nearest transcript entries from the
//! similarity index, assembles a grounded prompt, and asks a chat-completion
//! backend for the answer.

use crate::completion::ChatClient;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::index::VectorIndex;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Fixed instruction preamble for every answer prompt.
const PROMPT_PREAMBLE: &str =
    "You are a journal assistant. Based on the entries below, answer the question.";

/// Answer shown when the index holds no entries at all.
const EMPTY_JOURNAL_ANSWER: &str =
    "Your journal has no entries yet. Ingest a recording first, then ask again.";

/// A transcript entry retrieved for a question.
#[derive(Debug, Clone)]
pub struct RetrievedEntry {
    /// Position of the entry in the corpus (its index/document position).
    pub position: usize,
    /// Transcript text.
    pub content: String,
    /// Squared L2 distance from the question embedding (lower is closer).
    pub distance: f32,
}

/// An answer with the entries that grounded it.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    /// The generated answer text.
    pub answer: String,
    /// Retrieved entries, nearest first.
    pub matches: Vec<RetrievedEntry>,
}

/// Retrieval engine.
pub struct RagEngine {
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatClient>,
    top_k: usize,
}

impl RagEngine {
    /// Create an engine retrieving `top_k` entries per question.
    pub fn new(embedder: Arc<dyn Embedder>, chat: Arc<dyn ChatClient>, top_k: usize) -> Self {
        Self {
            embedder,
            chat,
            top_k,
        }
    }

    /// Answer a question from the journal.
    ///
    /// Retrieves `min(top_k, corpus size)` entries; an empty corpus yields a
    /// fixed answer with no matches and no LLM call.
    #[instrument(skip(self, index), fields(question = %question))]
    pub async fn answer(&self, question: &str, index: &VectorIndex) -> Result<RagAnswer> {
        if index.is_empty() {
            return Ok(RagAnswer {
                answer: EMPTY_JOURNAL_ANSWER.to_string(),
                matches: Vec::new(),
            });
        }

        let query = self.embedder.embed(question).await?;
        let matches: Vec<RetrievedEntry> = index
            .index
            .search(&query, self.top_k)
            .into_iter()
            .map(|(position, distance)| RetrievedEntry {
                position,
                content: index.documents[position].clone(),
                distance,
            })
            .collect();

        debug!("Retrieved {} entries", matches.len());

        let prompt = build_prompt(&matches, question);
        let answer = self.chat.complete(&prompt).await?;
        info!("Answered with {} grounding entries", matches.len());

        Ok(RagAnswer { answer, matches })
    }
}

/// Assemble the deterministic answer prompt.
///
/// Preamble, the retrieved entries nearest-first separated by blank lines,
/// then the literal question. No deduplication, no truncation.
fn build_prompt(matches: &[RetrievedEntry], question: &str) -> String {
    let context = matches
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\nJournal Entries:\n{}\n\nUser Question: {}\nAnswer:",
        PROMPT_PREAMBLE, context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DagbokError;
    use crate::index::FlatIndex;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Embedder stub returning fixed, distinguishable axis vectors by keyword.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            if lower.contains("run") {
                Ok(vec![1.0, 0.0, 0.0])
            } else if lower.contains("dinner") || lower.contains("eat") || lower.contains("cook") {
                Ok(vec![0.0, 1.0, 0.0])
            } else {
                Ok(vec![0.0, 0.0, 1.0])
            }
        }

        fn dimensions(&self) -> usize {
            3
        }
    }

    /// Chat client stub that records the prompt it was given.
    struct RecordingChat {
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingChat {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatClient for RecordingChat {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("You cooked dinner.".to_string())
        }
    }

    async fn journal_index(texts: &[&str]) -> VectorIndex {
        let embedder = KeywordEmbedder;
        let mut index = FlatIndex::new(3);
        let mut vectors = Vec::new();
        for text in texts {
            let v = embedder.embed(text).await.unwrap();
            index.add(v.clone()).unwrap();
            vectors.push(v);
        }
        VectorIndex {
            index,
            documents: texts.iter().map(|s| s.to_string()).collect(),
            vectors,
        }
    }

    #[tokio::test]
    async fn test_nearest_entry_leads_the_prompt() {
        let index = journal_index(&[
            "I went for a run",
            "I cooked dinner",
            "I read a book",
        ])
        .await;

        let chat = Arc::new(RecordingChat::new());
        let engine = RagEngine::new(Arc::new(KeywordEmbedder), chat.clone(), 3);

        let response = engine.answer("What did I eat?", &index).await.unwrap();

        assert_eq!(response.matches.len(), 3);
        assert_eq!(response.matches[0].content, "I cooked dinner");
        assert_eq!(response.answer, "You cooked dinner.");

        let prompts = chat.prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.starts_with(PROMPT_PREAMBLE));
        assert!(prompt.ends_with("User Question: What did I eat?\nAnswer:"));
        // All three entries present, dinner entry first
        for doc in ["I went for a run", "I cooked dinner", "I read a book"] {
            assert!(prompt.contains(doc));
        }
        assert!(
            prompt.find("I cooked dinner").unwrap() < prompt.find("I went for a run").unwrap()
        );
    }

    #[tokio::test]
    async fn test_small_corpus_returns_all_matches() {
        let index = journal_index(&["I cooked dinner"]).await;
        let engine = RagEngine::new(Arc::new(KeywordEmbedder), Arc::new(RecordingChat::new()), 3);

        let response = engine.answer("What did I eat?", &index).await.unwrap();
        assert_eq!(response.matches.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_corpus_answers_without_llm() {
        let index = VectorIndex {
            index: FlatIndex::new(3),
            documents: Vec::new(),
            vectors: Vec::new(),
        };
        let chat = Arc::new(RecordingChat::new());
        let engine = RagEngine::new(Arc::new(KeywordEmbedder), chat.clone(), 3);

        let response = engine.answer("Anything?", &index).await.unwrap();
        assert!(response.matches.is_empty());
        assert!(!response.answer.is_empty());
        assert!(chat.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        struct FailingChat;

        #[async_trait]
        impl ChatClient for FailingChat {
            async fn complete(&self, _prompt: &str) -> Result<String> {
                Err(DagbokError::Completion("model overloaded".into()))
            }
        }

        let index = journal_index(&["I cooked dinner"]).await;
        let engine = RagEngine::new(Arc::new(KeywordEmbedder), Arc::new(FailingChat), 3);
        assert!(engine.answer("What did I eat?", &index).await.is_err());
    }
}

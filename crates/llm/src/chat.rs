//! Retrieval-augmented answers: retrieve, assemble the prompt, complete,
//! then pick scripture references out of the reply.

use std::sync::{Arc, LazyLock};

use amanah_core::config::{LlmConfig, RetrievalConfig};
use amanah_core::ScoredDocument;
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::prompt::{build_system_prompt, SYSTEM_INSTRUCTIONS};
use crate::provider::{LlmError, LlmProvider, Message, Role};
use crate::retrieval::Retriever;

/// Reply used when the model returns no text.
pub const EMPTY_REPLY_FALLBACK: &str = "I apologize, but I could not generate a response.";

static QURAN_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)quran[^,\n]*,[^"\n]*"#).expect("valid citation regex"));
static HADITH_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)hadith[^,\n]*,[^"\n]*"#).expect("valid citation regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationKind {
    Quran,
    Hadith,
}

/// A scripture reference mentioned in an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    #[serde(rename = "type")]
    pub kind: CitationKind,
    pub reference: String,
}

/// Quran references first, then hadith references, each in text order.
pub fn extract_citations(text: &str) -> Vec<Citation> {
    [(CitationKind::Quran, &*QURAN_REF), (CitationKind::Hadith, &*HADITH_REF)]
        .into_iter()
        .flat_map(|(kind, re)| {
            re.find_iter(text).map(move |m| Citation {
                kind,
                reference: m.as_str().trim().to_string(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub message: String,
    pub citations: Vec<Citation>,
    pub context_docs: Vec<ScoredDocument>,
}

/// Knobs for one chat session.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub instructions: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub match_count: usize,
    pub match_threshold: f32,
    /// Most recent history messages forwarded to the model.
    pub history_limit: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            instructions: SYSTEM_INSTRUCTIONS.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            match_count: 5,
            match_threshold: 0.7,
            history_limit: 10,
        }
    }
}

impl ChatSettings {
    pub fn from_config(llm: &LlmConfig, retrieval: &RetrievalConfig) -> Self {
        Self {
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            match_count: retrieval.match_count,
            match_threshold: retrieval.match_threshold,
            history_limit: retrieval.history_limit,
            ..Self::default()
        }
    }
}

pub struct RagChat {
    retriever: Retriever,
    provider: Arc<dyn LlmProvider>,
    settings: ChatSettings,
}

impl RagChat {
    pub fn new(retriever: Retriever, provider: Arc<dyn LlmProvider>, settings: ChatSettings) -> Self {
        Self {
            retriever,
            provider,
            settings,
        }
    }

    /// The message list sent to the model: system prompt, the tail of the
    /// conversation, then the question.
    pub fn build_messages(&self, question: &str, history: &[Message], docs: &[ScoredDocument]) -> Vec<Message> {
        let conversation: Vec<&Message> = history.iter().filter(|m| m.role != Role::System).collect();
        let recent = &conversation[conversation.len().saturating_sub(self.settings.history_limit)..];

        let mut messages = Vec::with_capacity(recent.len() + 2);
        messages.push(Message::system(build_system_prompt(&self.settings.instructions, docs)));
        messages.extend(recent.iter().map(|m| (*m).clone()));
        messages.push(Message::user(question));
        messages
    }

    /// Answer `question` grounded in retrieved documents.
    ///
    /// A failed retrieval is logged and the answer proceeds without context.
    pub async fn answer(&self, question: &str, history: &[Message]) -> Result<ChatAnswer, LlmError> {
        let docs = match self
            .retriever
            .retrieve(question, self.settings.match_count, self.settings.match_threshold)
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                warn!(error = %e, "retrieval failed, answering without context");
                Vec::new()
            }
        };

        let messages = self.build_messages(question, history, &docs);
        let reply = self
            .provider
            .complete(messages, self.settings.temperature, self.settings.max_tokens)
            .await?;

        let message = if reply.trim().is_empty() {
            EMPTY_REPLY_FALLBACK.to_string()
        } else {
            reply
        };
        let citations = extract_citations(&message);

        info!(
            context_docs = docs.len(),
            citations = citations.len(),
            "answer generated"
        );

        Ok(ChatAnswer {
            message,
            citations,
            context_docs: docs,
        })
    }
}

#[cfg(test)]
mod tests;

use std::sync::Mutex;

use amanah_core::DocId;
use amanah_ingest::{DocumentStore, Embedder, EmbeddingError, MemoryStore, StoreError};
use async_trait::async_trait;

use super::*;

/// One dimension per keyword plus a constant bias.
struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                vec![
                    f32::from(u8::from(t.contains("riba"))),
                    f32::from(u8::from(t.contains("sukuk"))),
                    0.1,
                ]
            })
            .collect())
    }
    fn dimensions(&self) -> usize {
        3
    }
    fn model(&self) -> &str {
        "kw"
    }
}

/// Records every request and answers with a fixed reply.
struct ScriptedProvider {
    reply: Result<String, u16>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> Vec<Message> {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, messages: Vec<Message>, _t: f32, _m: u32) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(messages);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::ApiError {
                status: *status,
                body: "unavailable".into(),
            }),
        }
    }
}

/// Search always fails; declares no model.
struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn insert(&self, _title: &str, _content: &str) -> Result<DocId, StoreError> {
        Err(StoreError::NotConfigured("broken".into()))
    }
    async fn search(&self, _q: &[f32], _t: f32, _l: usize) -> Result<Vec<ScoredDocument>, StoreError> {
        Err(StoreError::Search {
            status: 500,
            body: "rpc failed".into(),
        })
    }
    fn embedding_model(&self) -> Option<&str> {
        None
    }
}

async fn chat_with(provider: Arc<ScriptedProvider>, settings: ChatSettings) -> RagChat {
    let embedder: Arc<dyn Embedder> = Arc::new(KeywordEmbedder);
    let store = Arc::new(MemoryStore::new(embedder.clone()));
    store.insert("Riba", "Riba is prohibited in Islamic finance.").await.unwrap();
    store.insert("Sukuk", "Sukuk are asset-backed certificates.").await.unwrap();
    let retriever = Retriever::new(embedder, store).unwrap();
    RagChat::new(retriever, provider, settings)
}

#[test]
fn settings_take_retrieval_limits_from_config() {
    let mut config = amanah_core::Config::for_profile("AMNTESTCHAT");
    config.retrieval.match_count = 3;
    config.retrieval.match_threshold = 0.55;
    config.retrieval.history_limit = 4;
    config.llm.max_tokens = 512;

    let settings = ChatSettings::from_config(&config.llm, &config.retrieval);
    assert_eq!(settings.match_count, 3);
    assert_eq!(settings.match_threshold, 0.55);
    assert_eq!(settings.history_limit, 4);
    assert_eq!(settings.max_tokens, 512);
    assert_eq!(settings.instructions, SYSTEM_INSTRUCTIONS);
}

#[tokio::test]
async fn config_limits_bound_the_context() {
    let provider = ScriptedProvider::replying("ok");
    let mut config = amanah_core::Config::for_profile("AMNTESTCHAT");
    config.retrieval.match_count = 1;
    config.retrieval.match_threshold = 0.0;
    let chat = chat_with(provider, ChatSettings::from_config(&config.llm, &config.retrieval)).await;

    let answer = chat.answer("riba and sukuk", &[]).await.unwrap();
    assert_eq!(answer.context_docs.len(), 1);
}

#[tokio::test]
async fn relevant_documents_become_context() {
    let provider = ScriptedProvider::replying("Riba is forbidden.");
    let chat = chat_with(provider.clone(), ChatSettings::default()).await;

    let answer = chat.answer("Is riba allowed?", &[]).await.unwrap();
    assert_eq!(answer.message, "Riba is forbidden.");
    assert_eq!(answer.context_docs.len(), 1);
    assert_eq!(answer.context_docs[0].title, "Riba");

    let sent = provider.last_request();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].role, Role::System);
    assert!(sent[0]
        .content
        .ends_with("\n\nContext:\nDocument: Riba\nRiba is prohibited in Islamic finance."));
    assert_eq!(sent[1], Message::user("Is riba allowed?"));
}

#[tokio::test]
async fn strict_threshold_answers_without_context() {
    let provider = ScriptedProvider::replying("General guidance.");
    let settings = ChatSettings {
        match_threshold: 0.99,
        ..ChatSettings::default()
    };
    let chat = chat_with(provider.clone(), settings).await;

    let answer = chat.answer("How does takaful work?", &[]).await.unwrap();
    assert!(answer.context_docs.is_empty());
    assert_eq!(answer.message, "General guidance.");
    assert_eq!(provider.last_request()[0].content, SYSTEM_INSTRUCTIONS);
}

#[tokio::test]
async fn failed_retrieval_is_treated_as_empty_context() {
    let provider = ScriptedProvider::replying("Still answering.");
    let retriever = Retriever::new(Arc::new(KeywordEmbedder), Arc::new(BrokenStore)).unwrap();
    let chat = RagChat::new(retriever, provider.clone(), ChatSettings::default());

    let answer = chat.answer("riba?", &[]).await.unwrap();
    assert!(answer.context_docs.is_empty());
    assert!(!provider.last_request()[0].content.contains("Context:"));
}

#[tokio::test]
async fn only_recent_history_is_forwarded() {
    let provider = ScriptedProvider::replying("ok");
    let chat = chat_with(provider.clone(), ChatSettings::default()).await;

    let mut history = vec![Message::system("stale system prompt")];
    history.extend((0..15).map(|i| {
        if i % 2 == 0 {
            Message::user(format!("q{i}"))
        } else {
            Message::assistant(format!("a{i}"))
        }
    }));

    chat.answer("next", &history).await.unwrap();
    let sent = provider.last_request();
    assert_eq!(sent.len(), 12);
    assert_eq!(sent[1].content, "a5");
    assert_eq!(sent[10].content, "q14");
    assert_eq!(sent[11], Message::user("next"));
    assert_eq!(sent.iter().filter(|m| m.role == Role::System).count(), 1);
}

#[tokio::test]
async fn empty_reply_uses_fallback() {
    let provider = ScriptedProvider::replying("  ");
    let chat = chat_with(provider, ChatSettings::default()).await;
    let answer = chat.answer("riba", &[]).await.unwrap();
    assert_eq!(answer.message, EMPTY_REPLY_FALLBACK);
    assert!(answer.citations.is_empty());
}

#[tokio::test]
async fn provider_errors_propagate() {
    let provider = Arc::new(ScriptedProvider {
        reply: Err(503),
        requests: Mutex::new(Vec::new()),
    });
    let chat = chat_with(provider, ChatSettings::default()).await;
    assert!(matches!(
        chat.answer("riba", &[]).await,
        Err(LlmError::ApiError { status: 503, .. })
    ));
}

#[test]
fn citations_are_grouped_by_kind() {
    let text = "Hadith Bukhari 2086, the Prophet cursed riba.\n\
                As stated in Quran 2:275, Allah has permitted trade.";
    let citations = extract_citations(text);
    assert_eq!(
        citations,
        vec![
            Citation {
                kind: CitationKind::Quran,
                reference: "Quran 2:275, Allah has permitted trade.".into(),
            },
            Citation {
                kind: CitationKind::Hadith,
                reference: "Hadith Bukhari 2086, the Prophet cursed riba.".into(),
            },
        ]
    );
}

#[test]
fn reference_without_comma_is_not_a_citation() {
    assert!(extract_citations("The Quran forbids riba.").is_empty());
}

#[test]
fn citation_serializes_with_type_field() {
    let c = Citation {
        kind: CitationKind::Hadith,
        reference: "Hadith Muslim 1598, riba".into(),
    };
    assert_eq!(
        serde_json::to_value(&c).unwrap(),
        serde_json::json!({"type": "hadith", "reference": "Hadith Muslim 1598, riba"})
    );
}

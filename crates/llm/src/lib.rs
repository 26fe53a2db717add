pub mod chat;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod retrieval;

pub use chat::{ChatAnswer, ChatSettings, Citation, CitationKind, RagChat};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
pub use retrieval::{RetrievalError, Retriever};

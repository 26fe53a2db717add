use std::process::ExitCode;
use std::sync::Arc;

use amanah_core::Config;
use amanah_ingest::{create_embedder, SupabaseStore};
use amanah_llm::{create_provider, ChatSettings, RagChat, Retriever};
use anyhow::{Context, Result};

use crate::cli::AskArgs;
use crate::terminal::Terminal;

pub async fn run(args: AskArgs, config: &Config, terminal: &Terminal) -> Result<ExitCode> {
    let embedder =
        create_embedder(&config.embedding, &config.ollama).context("failed to create embedder")?;
    let store = SupabaseStore::from_config(&config.supabase).context("document store is not configured")?;
    let retriever = Retriever::new(embedder, Arc::new(store)).context("cannot search the document store")?;
    let provider = create_provider(&config.llm, &config.ollama).context("failed to create LLM provider")?;

    let mut settings = ChatSettings::from_config(&config.llm, &config.retrieval);
    if let Some(k) = args.match_count {
        settings.match_count = k;
    }
    if let Some(threshold) = args.threshold {
        settings.match_threshold = threshold;
    }

    let chat = RagChat::new(retriever, provider, settings);
    let answer = chat
        .answer(&args.question, &[])
        .await
        .context("failed to generate an answer")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        terminal.print_answer(&answer, args.show_context)?;
    }
    Ok(ExitCode::SUCCESS)
}

//! Batch Lifecycle - submit, wait, stream, clean up
//!
//! Submits a small batch, polls until the provider reports a terminal
//! status, then streams the results. Ctrl-C stops the result stream at the
//! next line.
//!
//! ## Setup
//! ```bash
//! export ANTHROPIC_API_KEY="your-key"
//! # or: export BATCHWISE_PROVIDER=openai OPENAI_API_KEY="your-key"
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=batchwise=debug,batchwise_core=debug cargo run --example batch_lifecycle
//! ```

use std::time::Duration;

use batchwise::prelude::*;
use futures_util::StreamExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let provider: BatchProvider = std::env::var("BATCHWISE_PROVIDER")
        .unwrap_or_else(|_| "anthropic".to_string())
        .parse()?;
    let model = match provider {
        BatchProvider::OpenAi => "gpt-4o-mini",
        BatchProvider::Anthropic => "claude-3-5-haiku-latest",
    };

    let client = BatchClient::builder().provider(provider).build()?;

    let prompts = [
        ("capital-fr", "What is the capital of France? One word."),
        ("capital-jp", "What is the capital of Japan? One word."),
        ("capital-pe", "What is the capital of Peru? One word."),
    ];
    let batch = BatchRequest::new()
        .with_items(prompts.iter().map(|(id, prompt)| {
            BatchRequestItem::new(
                *id,
                ChatRequest::builder()
                    .model(model)
                    .message(ChatMessage::user(*prompt).build())
                    .max_tokens(32)
                    .build(),
            )
        }))
        .with_metadata("demo", "batch_lifecycle");

    let mut job = client.create(&batch).await?;
    println!("Created {} ({})", job.id, job.status.as_str());

    while !job.status.is_terminal() {
        tokio::time::sleep(Duration::from_secs(30)).await;
        job = client.retrieve(&job.id).await?;
        if let Some(counts) = &job.request_counts {
            println!(
                "{}: {}/{} done",
                job.status.as_str(),
                counts.succeeded + counts.errored,
                counts.total
            );
        }
    }

    let mut results = client.stream_results(&job).await?;
    let cancel = results.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    while let Some(result) = results.next().await {
        let result = result?;
        match result.message().and_then(|m| m.content_text()) {
            Some(text) => println!("{:>12}: {}", result.custom_id, text.trim()),
            None => println!("{:>12}: {:?}", result.custom_id, result.status()),
        }
    }

    Ok(())
}

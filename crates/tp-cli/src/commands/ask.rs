//! Ask command for questions to the travel assistant.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;
use tp_db::Database;
use tp_llm::{Assistant, Client, Reply};

use super::plan::Plan;
use crate::config::AssistantConfig;

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question, e.g. "what should I do on Friday?"
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

/// Builds the assistant described by the configuration.
///
/// A disabled or unusable model configuration gives an offline assistant
/// that only uses scripted replies.
pub fn assistant(config: &AssistantConfig) -> Assistant {
    if !config.enabled {
        return Assistant::offline();
    }
    match Client::new(&config.model_settings()) {
        Ok(client) => Assistant::new(client),
        Err(err) => {
            tracing::warn!(error = %err, "invalid assistant settings, using scripted replies");
            Assistant::offline()
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    assistant: &Assistant,
    args: &AskArgs,
) -> Result<Reply> {
    let question = args.question.join(" ");
    if question.trim().is_empty() {
        bail!("ask a question, e.g. tp ask what should I do on Friday?");
    }
    let plan = Plan::require(db)?;

    let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    let reply = rt.block_on(assistant.reply(&plan.store, &question));
    tracing::debug!(source = ?reply.source, "assistant replied");

    writeln!(writer, "{}", reply.text.trim())?;
    Ok(reply)
}

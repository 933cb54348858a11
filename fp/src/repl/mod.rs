//! Interactive REPL for FitPlanner
//!
//! Collects the profile form, generates a plan, then answers follow-up
//! questions about it, with slash commands for regenerating and reviewing.

mod form;
mod session;

pub use form::{LineSource, collect_profile};
pub use session::ReplSession;

use std::path::Path;
use std::sync::Arc;

use eyre::{Context, Result};
use rustyline::DefaultEditor;
use tracing::debug;

use crate::config::Config;
use crate::conversation::ConversationController;
use crate::llm::create_client;
use crate::prompts::PromptLoader;
use crate::session::SessionStore;

/// Build the conversation controller from configuration
///
/// Fails when the API key is missing or a prompt template is broken.
pub fn build_controller(config: &Config, base_dir: &Path) -> Result<ConversationController> {
    debug!(?base_dir, "build_controller: called");
    config.validate()?;
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = Arc::new(PromptLoader::new(base_dir).context("Failed to load prompt templates")?);
    Ok(ConversationController::new(llm, prompts, config.llm.max_tokens))
}

/// Run the interactive REPL
///
/// This is the main entry point for `fp chat` (and bare `fp`).
pub async fn run_interactive(config: &Config) -> Result<()> {
    let base_dir = std::env::current_dir()?;
    let controller = build_controller(config, &base_dir)?;

    let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
    let store = Arc::new(SessionStore::new());

    let mut session = ReplSession::new(controller, store, editor)?;
    session.run().await
}

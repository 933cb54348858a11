//! FitPlanner - personalized diet and workout plans
//!
//! Collects a fitness profile, asks a hosted LLM for a diet plan and a workout
//! plan, then answers follow-up questions about that plan.
//!
//! # Core Concepts
//!
//! - **One Plan per Session**: a session holds at most one current plan
//! - **Transcript follows the Plan**: a new plan always starts a new chat
//! - **Errors stay visible**: a failed answer is recorded as an `Error: ...` turn
//! - **Isolated Sessions**: each session's state lives behind its own lock
//!
//! # Modules
//!
//! - [`domain`] - Profile, plan, and chat types
//! - [`prompts`] - Plan and chat prompt templates
//! - [`llm`] - LLM client trait and OpenAI-compatible implementation
//! - [`session`] - Per-session state and the session registry
//! - [`conversation`] - Generate/ask state machine
//! - [`repl`] - Interactive form and chat
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ConfigError, LlmConfig};
pub use conversation::{ConversationController, ConversationError};
pub use domain::{ChatRole, ChatTurn, Gender, Plan, ProfileBuilder, SessionId, UserProfile};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use prompts::PromptLoader;
pub use session::{Phase, SessionState, SessionStore};

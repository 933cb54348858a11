//! Conversation controller
//!
//! Drives one session through the generate/ask cycle:
//!
//! - `Idle --generate--> PlanReady` when the service answers
//! - `PlanReady --generate--> PlanReady` with a fresh transcript on success;
//!   a failed regeneration leaves the old plan and transcript untouched
//! - `PlanReady --ask--> PlanReady`, appending the question and the answer
//!   (or the error text) to the transcript
//!
//! `ask` while `Idle` is rejected without touching the session.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::domain::{ChatTurn, Plan, UserProfile};
use crate::llm::{self, LlmClient, LlmError};
use crate::prompts::PromptLoader;
use crate::session::SessionState;

/// Errors surfaced by the controller
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error(transparent)]
    Service(#[from] LlmError),

    #[error(transparent)]
    Prompt(#[from] ConfigError),

    #[error("No plan yet. Generate a plan before asking questions.")]
    NoPlan,

    #[error("Question is empty")]
    EmptyQuestion,
}

/// Orchestrates prompt rendering, completion calls, and session updates
pub struct ConversationController {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl ConversationController {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "ConversationController::new: called");
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Generate a plan for `profile` and make it the session's current plan
    ///
    /// On success the transcript starts over. On failure the session is left
    /// exactly as it was.
    pub async fn generate(&self, state: &mut SessionState, profile: &UserProfile) -> Result<Plan, ConversationError> {
        debug!(phase = ?state.phase(), weeks = profile.number_of_weeks, "ConversationController::generate: called");
        let prompt = self.prompts.render_plan_prompt(profile)?;

        match llm::complete_prompt(self.llm.as_ref(), &prompt, self.max_tokens).await {
            Ok(text) => {
                let plan = Plan::new(text);
                state.set_plan(plan.clone());
                info!(plan_len = plan.as_str().len(), "Plan generated");
                Ok(plan)
            }
            Err(e) => {
                log_service_error("generate", &e);
                Err(e.into())
            }
        }
    }

    /// Ask a question about the current plan
    ///
    /// Returns the assistant turn that was appended. A service failure does not
    /// fail the call: the error text becomes the assistant turn.
    pub async fn ask(&self, state: &mut SessionState, question: &str) -> Result<ChatTurn, ConversationError> {
        debug!(phase = ?state.phase(), question_len = question.len(), "ConversationController::ask: called");
        let question = question.trim();
        if question.is_empty() {
            debug!("ConversationController::ask: empty question");
            return Err(ConversationError::EmptyQuestion);
        }

        let plan = state.plan().ok_or(ConversationError::NoPlan)?;
        let prompt = self.prompts.render_chat_prompt(plan.as_str(), question)?;

        state.append_turn(ChatTurn::user(question));

        let reply = match llm::complete_prompt(self.llm.as_ref(), &prompt, self.max_tokens).await {
            Ok(answer) => ChatTurn::assistant(answer),
            Err(e) => {
                log_service_error("ask", &e);
                ChatTurn::assistant(format!("Error: {}", e))
            }
        };

        state.append_turn(reply.clone());
        Ok(reply)
    }
}

fn log_service_error(action: &str, e: &LlmError) {
    if e.is_rate_limit() {
        warn!(%action, retry_after = ?e.retry_after(), error = %e, "Completion rate limited");
    } else if e.is_auth_error() {
        warn!(%action, error = %e, "Completion rejected the API key");
    } else {
        warn!(%action, error = %e, "Completion failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatRole, Gender};
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use crate::session::Phase;

    fn controller(client: Arc<MockLlmClient>) -> ConversationController {
        let prompts = Arc::new(PromptLoader::embedded_only().unwrap());
        ConversationController::new(client, prompts, 2048)
    }

    fn profile() -> UserProfile {
        UserProfile::builder()
            .workout_type("Weight Loss")
            .diet_type("Indian")
            .current_weight(75.0)
            .target_weight(68.0)
            .age(30)
            .gender(Gender::Male)
            .number_of_weeks(4)
            .build()
    }

    #[tokio::test]
    async fn test_generate_from_idle() {
        let client = Arc::new(MockLlmClient::with_texts(&["P1"]));
        let ctrl = controller(client.clone());
        let mut state = SessionState::new();

        let plan = ctrl.generate(&mut state, &profile()).await.unwrap();

        assert_eq!(plan, Plan::new("P1"));
        assert_eq!(state.phase(), Phase::PlanReady);
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("4 weeks"));
        assert_eq!(requests[0].max_tokens, 2048);
    }

    #[tokio::test]
    async fn test_generate_failure_stays_idle() {
        let ctrl = controller(Arc::new(MockLlmClient::scripted(vec![None])));
        let mut state = SessionState::new();

        let err = ctrl.generate(&mut state, &profile()).await.unwrap_err();

        assert!(matches!(err, ConversationError::Service(_)));
        assert!(err.to_string().contains("mock failure"));
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.plan().is_none());
    }

    #[tokio::test]
    async fn test_regenerate_replaces_plan_and_clears_transcript() {
        let ctrl = controller(Arc::new(MockLlmClient::with_texts(&["P2"])));
        let mut state = SessionState::new();
        state.set_plan(Plan::new("P1"));
        state.append_turn(ChatTurn::user("Q1"));
        state.append_turn(ChatTurn::assistant("A1"));

        ctrl.generate(&mut state, &profile()).await.unwrap();

        assert_eq!(state.plan(), Some(&Plan::new("P2")));
        assert!(state.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_failed_regenerate_preserves_plan_and_transcript() {
        let ctrl = controller(Arc::new(MockLlmClient::scripted(vec![None])));
        let mut state = SessionState::new();
        state.set_plan(Plan::new("P1"));
        state.append_turn(ChatTurn::user("Q1"));
        state.append_turn(ChatTurn::assistant("A1"));

        assert!(ctrl.generate(&mut state, &profile()).await.is_err());

        assert_eq!(state.plan(), Some(&Plan::new("P1")));
        assert_eq!(state.transcript(), &[ChatTurn::user("Q1"), ChatTurn::assistant("A1")]);
    }

    #[tokio::test]
    async fn test_ask_appends_question_and_answer() {
        let client = Arc::new(MockLlmClient::with_texts(&["Answer X"]));
        let ctrl = controller(client.clone());
        let mut state = SessionState::new();
        state.set_plan(Plan::new("P1"));

        let reply = ctrl.ask(&mut state, "How many calories?").await.unwrap();

        assert_eq!(reply, ChatTurn::assistant("Answer X"));
        assert_eq!(
            state.transcript(),
            &[ChatTurn::user("How many calories?"), ChatTurn::assistant("Answer X")]
        );
        let prompt = &client.requests()[0].prompt;
        assert!(prompt.contains("Plan: P1"));
        assert!(prompt.contains("Question: How many calories?"));
    }

    #[tokio::test]
    async fn test_ask_failure_becomes_error_turn() {
        let ctrl = controller(Arc::new(MockLlmClient::scripted(vec![None])));
        let mut state = SessionState::new();
        state.set_plan(Plan::new("P1"));

        let reply = ctrl.ask(&mut state, "Can I swap rice for quinoa?").await.unwrap();

        assert_eq!(reply.role, ChatRole::Assistant);
        assert!(reply.content.starts_with("Error: "));
        assert!(reply.content.contains("mock failure"));
        assert_eq!(state.transcript().len(), 2);
        assert_eq!(state.plan(), Some(&Plan::new("P1")));
    }

    #[tokio::test]
    async fn test_ask_empty_completion_becomes_error_turn() {
        let ctrl = controller(Arc::new(MockLlmClient::new(vec![CompletionResponse {
            content: None,
            ..CompletionResponse::text("")
        }])));
        let mut state = SessionState::new();
        state.set_plan(Plan::new("P1"));

        let reply = ctrl.ask(&mut state, "Rest days?").await.unwrap();
        assert!(reply.content.contains("Invalid response"));
    }

    #[tokio::test]
    async fn test_ask_while_idle_is_rejected() {
        let client = Arc::new(MockLlmClient::with_texts(&["unused"]));
        let ctrl = controller(client.clone());
        let mut state = SessionState::new();

        let err = ctrl.ask(&mut state, "Anything?").await.unwrap_err();

        assert!(matches!(err, ConversationError::NoPlan));
        assert!(state.transcript().is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ask_empty_question_is_rejected() {
        let client = Arc::new(MockLlmClient::with_texts(&["unused"]));
        let ctrl = controller(client.clone());
        let mut state = SessionState::new();
        state.set_plan(Plan::new("P1"));

        let err = ctrl.ask(&mut state, "   ").await.unwrap_err();

        assert!(matches!(err, ConversationError::EmptyQuestion));
        assert!(state.transcript().is_empty());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_full_cycle_keeps_chronological_order() {
        let ctrl = controller(Arc::new(MockLlmClient::with_texts(&["P1", "A1", "A2"])));
        let mut state = SessionState::new();

        ctrl.generate(&mut state, &profile()).await.unwrap();
        ctrl.ask(&mut state, "Q1").await.unwrap();
        ctrl.ask(&mut state, "Q2").await.unwrap();

        let contents: Vec<&str> = state.transcript().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["Q1", "A1", "Q2", "A2"]);
    }
}

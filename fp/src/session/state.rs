//! Per-session plan and transcript

use tracing::debug;

use crate::domain::{ChatTurn, Plan};

/// Where a session is in the generate/ask cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No plan yet; only generate is possible
    Idle,
    /// A plan exists and questions can be asked about it
    PlanReady,
}

/// One session's current plan and the chat transcript about it
///
/// The transcript always belongs to the current plan: `set_plan` is the only
/// way to replace the plan and it clears the transcript.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    plan: Option<Plan>,
    transcript: Vec<ChatTurn>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Replace the current plan and start an empty transcript
    pub fn set_plan(&mut self, plan: Plan) {
        debug!(
            plan_len = plan.as_str().len(),
            dropped_turns = self.transcript.len(),
            "SessionState::set_plan: called"
        );
        self.plan = Some(plan);
        self.transcript.clear();
    }

    pub fn append_turn(&mut self, turn: ChatTurn) {
        debug!(role = %turn.role, turn_count = self.transcript.len() + 1, "SessionState::append_turn: called");
        self.transcript.push(turn);
    }

    /// Chat turns in the order they were appended
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn phase(&self) -> Phase {
        if self.plan.is_some() { Phase::PlanReady } else { Phase::Idle }
    }
}

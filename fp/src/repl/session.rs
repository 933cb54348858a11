//! REPL session management

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use tracing::{debug, info};

use super::form::{LineSource, collect_profile};
use crate::conversation::{ConversationController, ConversationError};
use crate::domain::{ChatRole, ProfileBuilder, ProfileField, SessionId, UserProfile};
use crate::session::{Phase, SessionHandle, SessionStore};

/// Interactive planner session
///
/// Owns one entry in the session store for as long as it runs.
pub struct ReplSession<L: LineSource> {
    controller: ConversationController,
    store: Arc<SessionStore>,
    id: SessionId,
    state: SessionHandle,
    profile: Option<UserProfile>,
    input: L,
}

impl<L: LineSource> ReplSession<L> {
    /// Create a new REPL session in `store`
    pub fn new(controller: ConversationController, store: Arc<SessionStore>, input: L) -> Result<Self> {
        let id = store.create();
        let state = store
            .get(&id)
            .ok_or_else(|| eyre::eyre!("Session {} vanished right after creation", id))?;
        Ok(Self {
            controller,
            store,
            id,
            state,
            profile: None,
            input,
        })
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        if !self.new_plan().await? {
            self.finish();
            return Ok(());
        }

        loop {
            let Some(line) = self.input.read_line(&format!("{} ", ">".bright_green()), "")? else {
                println!();
                break;
            };
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            if input.starts_with('/') {
                match self.handle_slash_command(input).await? {
                    SlashResult::Continue => continue,
                    SlashResult::Quit => break,
                }
            } else {
                self.ask(input).await?;
            }
        }

        self.finish();
        Ok(())
    }

    fn finish(&self) {
        self.store.remove(&self.id);
        println!("Goodbye!");
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "Fitness and Diet Planner".bright_cyan().bold());
        println!("Session {}", self.id.short().dimmed());
        println!("Press Enter to keep a suggested value, Ctrl+D to quit");
    }

    /// Collect a profile and generate a plan for it
    ///
    /// Returns false if the user cancelled the form.
    async fn new_plan(&mut self) -> Result<bool> {
        let start = self.profile.clone().map(ProfileBuilder::from).unwrap_or_default();
        let Some(profile) = collect_profile(&mut self.input, start)? else {
            return Ok(false);
        };
        self.profile = Some(profile.clone());

        println!();
        println!("{}", "Generating your personalized plans...".dimmed());

        let mut state = self.state.lock().await;
        match self.controller.generate(&mut state, &profile).await {
            Ok(plan) => {
                info!(session = %self.id.short(), "Plan ready");
                println!("{}", "Plans generated successfully!".bright_green());
                println!();
                println!("{}", "Your Plans:".bright_cyan().bold());
                println!("{}", plan);
                println!();
                println!("{}", "Ask About Your Plan".bright_cyan());
                println!("Type a question, or {} for commands", "/help".yellow());
            }
            Err(e) => {
                println!("{} An error occurred: {}", "Error:".red(), e);
                if state.phase() == Phase::Idle {
                    println!("Use {} to try again", "/new".yellow());
                } else {
                    println!("{}", "Your previous plan and chat are unchanged.".dimmed());
                }
            }
        }
        Ok(true)
    }

    async fn ask(&mut self, question: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        match self.controller.ask(&mut state, question).await {
            Ok(reply) => {
                println!();
                println!("{}", reply.content);
                println!();
            }
            Err(ConversationError::NoPlan) => {
                println!("{} No plan yet. Use {} to generate one.", "?".yellow(), "/new".yellow());
            }
            Err(ConversationError::EmptyQuestion) => {}
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
        Ok(())
    }

    /// Handle slash commands
    async fn handle_slash_command(&mut self, input: &str) -> Result<SlashResult> {
        let cmd = input.split_whitespace().next().unwrap_or("");
        debug!(%cmd, "handle_slash_command: called");

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return Ok(SlashResult::Quit),
            "/new" | "/n" => {
                self.new_plan().await?;
            }
            "/plan" => self.print_plan().await,
            "/history" => self.print_history().await,
            "/profile" => self.print_profile(),
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        Ok(SlashResult::Continue)
    }

    /// Print help message
    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Enter new details and regenerate the plan", "/new".yellow());
        println!("  {:14} Show the current plan", "/plan".yellow());
        println!("  {:14} Show the chat about this plan", "/history".yellow());
        println!("  {:14} Show the details used for the plan", "/profile".yellow());
        println!("  {:14} Exit", "/quit".yellow());
        println!();
    }

    async fn print_plan(&self) {
        let state = self.state.lock().await;
        match state.plan() {
            Some(plan) => {
                println!();
                println!("{}", "Your Plans:".bright_cyan().bold());
                println!("{}", plan);
                println!();
            }
            None => println!("{}", "No plan yet.".dimmed()),
        }
    }

    /// Print conversation history
    async fn print_history(&self) {
        let state = self.state.lock().await;
        if state.transcript().is_empty() {
            println!("{}", "No conversation history.".dimmed());
            return;
        }

        println!();
        for turn in state.transcript() {
            let role = match turn.role {
                ChatRole::User => "You".bright_green(),
                ChatRole::Assistant => "Planner".bright_blue(),
            };
            println!("{}: {}", role, turn.content);
            println!();
        }
    }

    fn print_profile(&self) {
        let Some(profile) = &self.profile else {
            println!("{}", "No details entered yet.".dimmed());
            return;
        };
        let builder = ProfileBuilder::from(profile.clone());
        println!();
        for field in ProfileField::ALL {
            println!("  {:48} {}", field.label().dimmed(), builder.current(field));
        }
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

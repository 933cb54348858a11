//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{
    DEFAULT_AGE, DEFAULT_CURRENT_WEIGHT, DEFAULT_TARGET_WEIGHT, DEFAULT_WEEKS, Gender, ProfileBuilder, ProfileError,
    UserProfile,
};

/// FitPlanner - personalized diet and workout plans
#[derive(Parser)]
#[command(
    name = "fp",
    about = "Generate a diet and workout plan with an LLM, then ask questions about it",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill in the form interactively, generate a plan, then chat about it
    Chat,

    /// Generate a plan in one shot and print it
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Follow-up question to ask once the plan exists (repeatable)
        #[arg(short, long = "question", value_name = "TEXT")]
        questions: Vec<String>,
    },

    /// Print the rendered plan prompt without calling the service
    Prompt {
        #[command(flatten)]
        profile: ProfileArgs,
    },
}

/// Profile fields as command-line flags
///
/// Numbers outside the form's ranges are clamped, not rejected.
#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Workout type (e.g., Weight Loss, Muscle Gain)
    #[arg(long, default_value = "")]
    pub workout_type: String,

    /// Diet type (e.g., Indian, Mediterranean)
    #[arg(long, default_value = "")]
    pub diet_type: String,

    /// Current weight in kg (30-200)
    #[arg(long, default_value_t = DEFAULT_CURRENT_WEIGHT)]
    pub current_weight: f64,

    /// Target weight in kg (30-200)
    #[arg(long, default_value_t = DEFAULT_TARGET_WEIGHT)]
    pub target_weight: f64,

    /// Dietary restrictions (e.g., No dairy, Low sugar)
    #[arg(long, default_value = "")]
    pub dietary_restrictions: String,

    /// Health conditions
    #[arg(long, default_value = "")]
    pub health_conditions: String,

    /// Age (10-100)
    #[arg(long, default_value_t = DEFAULT_AGE)]
    pub age: u32,

    /// Gender (Male, Female, Other)
    #[arg(long, default_value = "Male")]
    pub gender: String,

    /// Number of weeks (1-12)
    #[arg(short, long, default_value_t = DEFAULT_WEEKS)]
    pub weeks: u32,

    /// Additional comments
    #[arg(long, default_value = "")]
    pub comments: String,
}

impl ProfileArgs {
    /// Build a profile, clamping numbers into range
    pub fn to_profile(&self) -> Result<UserProfile, ProfileError> {
        debug!(?self, "ProfileArgs::to_profile: called");
        let gender: Gender = self.gender.parse()?;
        Ok(ProfileBuilder::new()
            .workout_type(&self.workout_type)
            .diet_type(&self.diet_type)
            .current_weight(self.current_weight)
            .target_weight(self.target_weight)
            .dietary_restrictions(&self.dietary_restrictions)
            .health_conditions(&self.health_conditions)
            .age(self.age)
            .gender(gender)
            .number_of_weeks(self.weeks)
            .comments(&self.comments)
            .build())
    }
}

/// Path of the log file written by the binary
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fitplanner")
        .join("logs")
        .join("fitplanner.log")
}

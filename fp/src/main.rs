//! FitPlanner - personalized diet and workout plans
//!
//! CLI entry point.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use fitplanner::cli::{Cli, Command, ProfileArgs, get_log_path};
use fitplanner::config::Config;
use fitplanner::conversation::ConversationError;
use fitplanner::prompts::PromptLoader;
use fitplanner::repl;
use fitplanner::session::SessionState;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Credentials may live in a .env file next to the working directory
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "FitPlanner loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        None | Some(Command::Chat) => repl::run_interactive(&config).await,
        Some(Command::Generate { profile, questions }) => cmd_generate(&config, &profile, &questions).await,
        Some(Command::Prompt { profile }) => cmd_prompt(&profile),
    }
}

/// One-shot generation: print the plan, then the answer to each question
async fn cmd_generate(config: &Config, args: &ProfileArgs, questions: &[String]) -> Result<()> {
    let profile = args.to_profile()?;
    let controller = repl::build_controller(config, &std::env::current_dir()?)?;
    let mut state = SessionState::new();

    eprintln!("{}", "Generating your personalized plans...".dimmed());
    let plan = match controller.generate(&mut state, &profile).await {
        Ok(plan) => plan,
        Err(e) => {
            warn!(error = %e, "cmd_generate: generation failed");
            return Err(eyre::eyre!("An error occurred: {}", e));
        }
    };
    println!("{}", plan);

    for question in questions {
        match controller.ask(&mut state, question).await {
            Ok(reply) => {
                println!();
                println!("{} {}", "Q:".bright_green(), question);
                println!("{}", reply.content);
            }
            Err(ConversationError::EmptyQuestion) => debug!("cmd_generate: skipping blank question"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Print the rendered plan prompt
fn cmd_prompt(args: &ProfileArgs) -> Result<()> {
    let profile = args.to_profile()?;
    let base_dir: PathBuf = std::env::current_dir()?;
    let loader = PromptLoader::new(&base_dir)?;
    print!("{}", loader.render_plan_prompt(&profile)?);
    Ok(())
}

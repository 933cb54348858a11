//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::config::ConfigError;
use crate::domain::{UserProfile, format_weight};

const PLAN_TEMPLATE: &str = "plan";
const CHAT_TEMPLATE: &str = "chat";

/// Values substituted into the plan template
///
/// Every field is pre-formatted so the rendered text shows exactly what the
/// form showed (weights with one decimal place).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanPromptContext {
    pub workout_type: String,
    pub diet_type: String,
    pub current_weight: String,
    pub target_weight: String,
    pub dietary_restrictions: String,
    pub health_conditions: String,
    pub age: String,
    pub gender: String,
    pub number_of_weeks: String,
    pub comments: String,
}

impl From<&UserProfile> for PlanPromptContext {
    fn from(profile: &UserProfile) -> Self {
        Self {
            workout_type: profile.workout_type.clone(),
            diet_type: profile.diet_type.clone(),
            current_weight: format_weight(profile.current_weight),
            target_weight: format_weight(profile.target_weight),
            dietary_restrictions: profile.dietary_restrictions.clone(),
            health_conditions: profile.health_conditions.clone(),
            age: profile.age.to_string(),
            gender: profile.gender.to_string(),
            number_of_weeks: profile.number_of_weeks.to_string(),
            comments: profile.comments.clone(),
        }
    }
}

/// Values substituted into the chat template
#[derive(Debug, Clone, Serialize)]
pub struct ChatPromptContext<'a> {
    pub plan: &'a str,
    pub question: &'a str,
}

/// Loads and renders prompt templates
///
/// Both templates are registered and test-rendered on construction, so a
/// loader that was built successfully renders any well-typed input.
pub struct PromptLoader {
    hbs: Handlebars<'static>,
}

impl std::fmt::Debug for PromptLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptLoader").finish_non_exhaustive()
    }
}

impl PromptLoader {
    /// Create a loader that checks `base_dir` for template overrides
    ///
    /// Looks in `{base_dir}/.fitplanner/prompts/` then `{base_dir}/prompts/`
    /// before falling back to the embedded templates.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let base_dir = base_dir.as_ref();
        debug!(?base_dir, "PromptLoader::new: called");
        let dirs: Vec<PathBuf> = [base_dir.join(".fitplanner/prompts"), base_dir.join("prompts")]
            .into_iter()
            .filter(|d| d.is_dir())
            .collect();
        debug!(?dirs, "PromptLoader::new: override directories");
        Self::with_dirs(&dirs)
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Result<Self, ConfigError> {
        debug!("PromptLoader::embedded_only: called");
        Self::with_dirs(&[])
    }

    fn with_dirs(dirs: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);

        for name in [PLAN_TEMPLATE, CHAT_TEMPLATE] {
            let source = load_template(dirs, name)?;
            hbs.register_template_string(name, source)
                .map_err(|e| ConfigError::Template(format!("{}: {}", name, e)))?;
        }

        let loader = Self { hbs };
        loader.check()?;
        Ok(loader)
    }

    /// Render both templates once with placeholder values
    fn check(&self) -> Result<(), ConfigError> {
        let profile = UserProfile::builder().build();
        self.render(PLAN_TEMPLATE, &PlanPromptContext::from(&profile))?;
        self.render(
            CHAT_TEMPLATE,
            &ChatPromptContext {
                plan: "",
                question: "",
            },
        )?;
        Ok(())
    }

    fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, ConfigError> {
        self.hbs
            .render(name, context)
            .map_err(|e| ConfigError::Template(format!("Failed to render template {}: {}", name, e)))
    }

    /// Render the plan request prompt for a profile
    pub fn render_plan_prompt(&self, profile: &UserProfile) -> Result<String, ConfigError> {
        debug!(weeks = profile.number_of_weeks, "PromptLoader::render_plan_prompt: called");
        self.render(PLAN_TEMPLATE, &PlanPromptContext::from(profile))
    }

    /// Render the follow-up chat prompt for the current plan and a question
    pub fn render_chat_prompt(&self, plan: &str, question: &str) -> Result<String, ConfigError> {
        debug!(
            plan_len = plan.len(),
            question_len = question.len(),
            "PromptLoader::render_chat_prompt: called"
        );
        self.render(CHAT_TEMPLATE, &ChatPromptContext { plan, question })
    }
}

/// Load a template by name
///
/// Checks each override directory in order, then the embedded fallback.
fn load_template(dirs: &[PathBuf], name: &str) -> Result<String, ConfigError> {
    debug!(%name, "load_template: called");
    for dir in dirs {
        let path = dir.join(format!("{}.pmt", name));
        if path.exists() {
            info!("Using prompt template {}", path.display());
            return std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Template(format!("Failed to read {}: {}", path.display(), e)));
        }
    }

    embedded::get_embedded(name)
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Template(format!("Prompt template not found: {}", name)))
}

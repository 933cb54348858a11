//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for plan generation and
//! follow-up chat.
//!
//! Template loading chain:
//! 1. `.fitplanner/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (repo default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution. Substituted
//! values are inserted verbatim and never evaluated as template syntax.

pub mod embedded;
mod loader;

pub use loader::{ChatPromptContext, PlanPromptContext, PromptLoader};

//! Domain types for FitPlanner
//!
//! Core domain types: UserProfile, Plan, ChatTurn, SessionId

mod chat;
mod id;
mod profile;

pub use chat::{ChatRole, ChatTurn, Plan};
pub use id::SessionId;
pub use profile::{
    AGE_RANGE, DEFAULT_AGE, DEFAULT_CURRENT_WEIGHT, DEFAULT_TARGET_WEIGHT, DEFAULT_WEEKS, Gender, ProfileBuilder,
    ProfileError, ProfileField, UserProfile, WEEKS_RANGE, WEIGHT_RANGE, format_weight,
};

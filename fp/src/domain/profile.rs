//! User profile collected from the form
//!
//! The only validation is clamping numeric fields into the ranges the form
//! widgets allow, plus parsing the gender choice.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Allowed body weight in kilograms
pub const WEIGHT_RANGE: RangeInclusive<f64> = 30.0..=200.0;

/// Allowed age in years
pub const AGE_RANGE: RangeInclusive<u32> = 10..=100;

/// Allowed plan length in weeks
pub const WEEKS_RANGE: RangeInclusive<u32> = 1..=12;

pub const DEFAULT_CURRENT_WEIGHT: f64 = 75.0;
pub const DEFAULT_TARGET_WEIGHT: f64 = 68.0;
pub const DEFAULT_AGE: u32 = 30;
pub const DEFAULT_WEEKS: u32 = 4;

/// Errors from parsing raw form input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid gender '{0}'. Expected Male, Female or Other")]
    InvalidGender(String),
}

/// Gender choice offered by the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            _ => Err(ProfileError::InvalidGender(s.trim().to_string())),
        }
    }
}

/// Personal fitness parameters for one plan request
///
/// Built through [`ProfileBuilder`]; a new generation always gets a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub workout_type: String,
    pub diet_type: String,
    pub current_weight: f64,
    pub target_weight: f64,
    pub dietary_restrictions: String,
    pub health_conditions: String,
    pub age: u32,
    pub gender: Gender,
    pub number_of_weeks: u32,
    pub comments: String,
}

impl UserProfile {
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder::new()
    }
}

/// The ten form fields, in the order the form asks for them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    WorkoutType,
    DietType,
    CurrentWeight,
    TargetWeight,
    DietaryRestrictions,
    HealthConditions,
    Age,
    Gender,
    NumberOfWeeks,
    Comments,
}

impl ProfileField {
    pub const ALL: [ProfileField; 10] = [
        ProfileField::WorkoutType,
        ProfileField::DietType,
        ProfileField::CurrentWeight,
        ProfileField::TargetWeight,
        ProfileField::DietaryRestrictions,
        ProfileField::HealthConditions,
        ProfileField::Age,
        ProfileField::Gender,
        ProfileField::NumberOfWeeks,
        ProfileField::Comments,
    ];

    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Self::WorkoutType => "Workout Type (e.g., Weight Loss, Muscle Gain)",
            Self::DietType => "Diet Type (e.g., Indian, Mediterranean)",
            Self::CurrentWeight => "Current Weight (kg, 30-200)",
            Self::TargetWeight => "Target Weight (kg, 30-200)",
            Self::DietaryRestrictions => "Dietary Restrictions (e.g., No dairy, Low sugar)",
            Self::HealthConditions => "Health Conditions",
            Self::Age => "Age (10-100)",
            Self::Gender => "Gender (Male/Female/Other)",
            Self::NumberOfWeeks => "Number of Weeks (1-12)",
            Self::Comments => "Additional Comments",
        }
    }

    /// Field name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::WorkoutType => "workout_type",
            Self::DietType => "diet_type",
            Self::CurrentWeight => "current_weight",
            Self::TargetWeight => "target_weight",
            Self::DietaryRestrictions => "dietary_restrictions",
            Self::HealthConditions => "health_conditions",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::NumberOfWeeks => "number_of_weeks",
            Self::Comments => "comments",
        }
    }
}

/// Collects form values, applying defaults and range clamps
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    profile: UserProfile,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self {
            profile: UserProfile {
                workout_type: String::new(),
                diet_type: String::new(),
                current_weight: DEFAULT_CURRENT_WEIGHT,
                target_weight: DEFAULT_TARGET_WEIGHT,
                dietary_restrictions: String::new(),
                health_conditions: String::new(),
                age: DEFAULT_AGE,
                gender: Gender::default(),
                number_of_weeks: DEFAULT_WEEKS,
                comments: String::new(),
            },
        }
    }

    pub fn workout_type(mut self, value: impl Into<String>) -> Self {
        self.profile.workout_type = value.into();
        self
    }

    pub fn diet_type(mut self, value: impl Into<String>) -> Self {
        self.profile.diet_type = value.into();
        self
    }

    pub fn current_weight(mut self, kg: f64) -> Self {
        self.profile.current_weight = clamp_weight(kg, DEFAULT_CURRENT_WEIGHT);
        self
    }

    pub fn target_weight(mut self, kg: f64) -> Self {
        self.profile.target_weight = clamp_weight(kg, DEFAULT_TARGET_WEIGHT);
        self
    }

    pub fn dietary_restrictions(mut self, value: impl Into<String>) -> Self {
        self.profile.dietary_restrictions = value.into();
        self
    }

    pub fn health_conditions(mut self, value: impl Into<String>) -> Self {
        self.profile.health_conditions = value.into();
        self
    }

    pub fn age(mut self, years: u32) -> Self {
        self.profile.age = years.clamp(*AGE_RANGE.start(), *AGE_RANGE.end());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.profile.gender = gender;
        self
    }

    pub fn number_of_weeks(mut self, weeks: u32) -> Self {
        self.profile.number_of_weeks = weeks.clamp(*WEEKS_RANGE.start(), *WEEKS_RANGE.end());
        self
    }

    pub fn comments(mut self, value: impl Into<String>) -> Self {
        self.profile.comments = value.into();
        self
    }

    /// Apply raw text input for one field
    ///
    /// Blank input keeps the current value for numeric and choice fields and
    /// sets free-text fields to empty.
    pub fn set_raw(self, field: ProfileField, input: &str) -> Result<Self, ProfileError> {
        debug!(field = field.name(), "ProfileBuilder::set_raw: called");
        let input = input.trim();
        let keep_current = input.is_empty();

        let builder = match field {
            ProfileField::WorkoutType => self.workout_type(input),
            ProfileField::DietType => self.diet_type(input),
            ProfileField::DietaryRestrictions => self.dietary_restrictions(input),
            ProfileField::HealthConditions => self.health_conditions(input),
            ProfileField::Comments => self.comments(input),
            _ if keep_current => {
                debug!("ProfileBuilder::set_raw: blank input, keeping current value");
                self
            }
            ProfileField::CurrentWeight => self.current_weight(parse_number(field, input)?),
            ProfileField::TargetWeight => self.target_weight(parse_number(field, input)?),
            ProfileField::Age => self.age(parse_count(field, input)?),
            ProfileField::NumberOfWeeks => self.number_of_weeks(parse_count(field, input)?),
            ProfileField::Gender => self.gender(input.parse()?),
        };
        Ok(builder)
    }

    /// Current value of a field, formatted for display as a form default
    pub fn current(&self, field: ProfileField) -> String {
        let p = &self.profile;
        match field {
            ProfileField::WorkoutType => p.workout_type.clone(),
            ProfileField::DietType => p.diet_type.clone(),
            ProfileField::CurrentWeight => format_weight(p.current_weight),
            ProfileField::TargetWeight => format_weight(p.target_weight),
            ProfileField::DietaryRestrictions => p.dietary_restrictions.clone(),
            ProfileField::HealthConditions => p.health_conditions.clone(),
            ProfileField::Age => p.age.to_string(),
            ProfileField::Gender => p.gender.to_string(),
            ProfileField::NumberOfWeeks => p.number_of_weeks.to_string(),
            ProfileField::Comments => p.comments.clone(),
        }
    }

    pub fn build(self) -> UserProfile {
        self.profile
    }
}

impl From<UserProfile> for ProfileBuilder {
    /// Start from an earlier profile, e.g. to prefill the form on `/new`
    fn from(profile: UserProfile) -> Self {
        Self { profile }
    }
}

/// Format a weight without losing precision; whole numbers keep a ".0"
pub fn format_weight(kg: f64) -> String {
    if kg.fract() == 0.0 {
        format!("{:.1}", kg)
    } else {
        kg.to_string()
    }
}

fn clamp_weight(kg: f64, fallback: f64) -> f64 {
    if kg.is_nan() {
        return fallback;
    }
    kg.clamp(*WEIGHT_RANGE.start(), *WEIGHT_RANGE.end())
}

fn parse_number(field: ProfileField, input: &str) -> Result<f64, ProfileError> {
    input.parse::<f64>().map_err(|_| ProfileError::InvalidNumber {
        field: field.name(),
        value: input.to_string(),
    })
}

/// Parse an integer field, accepting "30" as well as "30.0"; negatives clamp to zero
fn parse_count(field: ProfileField, input: &str) -> Result<u32, ProfileError> {
    let value = parse_number(field, input)?;
    if !value.is_finite() {
        return Err(ProfileError::InvalidNumber {
            field: field.name(),
            value: input.to_string(),
        });
    }
    Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
}

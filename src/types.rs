/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Gender used for gender-aware reference ranges.
/// `Unspecified` selects the blended fallback thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    /// Lenient parse for query parameters: case-insensitive, anything
    /// unrecognised (or absent) maps to `Unspecified`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("MALE") => Gender::Male,
            Some("FEMALE") => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

/// Lifecycle of a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "IN_PROGRESS",
            SessionStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IN_PROGRESS" => Some(SessionStatus::InProgress),
            "COMPLETED" => Some(SessionStatus::Completed),
            _ => None,
        }
    }
}

/// What a single set row inside a session describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    #[default]
    Exercise,
    Rest,
    Cardio,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Exercise => "EXERCISE",
            ItemType::Rest => "REST",
            ItemType::Cardio => "CARDIO",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EXERCISE" => Some(ItemType::Exercise),
            "REST" => Some(ItemType::Rest),
            "CARDIO" => Some(ItemType::Cardio),
            _ => None,
        }
    }
}

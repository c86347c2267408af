//! Core types for prediction requests
//!
//! A `UsageRecord` is the typed form submission; an `EncodedVector` is what the
//! classifier consumes once the record has passed validation.

use crate::error::ValidationError;
use crate::schema::{FEATURE_COLUMNS, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender as offered by the prediction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
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

    /// Integer code expected by the classifier
    pub fn code(&self) -> u8 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Other => 2,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == value.trim())
            .ok_or_else(|| ValidationError::UnknownCategory {
                field: "gender",
                value: value.to_string(),
            })
    }
}

/// Operating system as offered by the prediction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingSystem {
    Android,
    #[serde(rename = "iOS")]
    Ios,
}

impl OperatingSystem {
    pub const ALL: [OperatingSystem; 2] = [OperatingSystem::Android, OperatingSystem::Ios];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingSystem::Android => "Android",
            OperatingSystem::Ios => "iOS",
        }
    }

    /// Integer code expected by the classifier
    pub fn code(&self) -> u8 {
        match self {
            OperatingSystem::Android => 0,
            OperatingSystem::Ios => 1,
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingSystem {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OperatingSystem::ALL
            .into_iter()
            .find(|os| os.as_str() == value.trim())
            .ok_or_else(|| ValidationError::UnknownCategory {
                field: "operating system",
                value: value.to_string(),
            })
    }
}

/// One user's phone usage, as entered in the prediction form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Age in years (18-80)
    pub age: u32,
    pub gender: Gender,
    /// Screen time (hours/day)
    pub screen_time_hours: f64,
    /// Mobile data usage (GB/month)
    pub data_usage_gb: f64,
    /// Calls duration (minutes/day)
    pub calls_duration_min: f64,
    /// Number of apps installed
    pub apps_installed: u32,
    /// Social media time (hours/day)
    pub social_media_hours: f64,
    /// E-commerce spend (INR/month)
    pub ecommerce_spend: f64,
    /// Streaming time (hours/day)
    pub streaming_hours: f64,
    /// Gaming time (hours/day)
    pub gaming_hours: f64,
    /// Monthly recharge cost (INR)
    pub monthly_cost_inr: f64,
    pub operating_system: OperatingSystem,
}

impl UsageRecord {
    /// Hours per day spent across the tracked activities
    pub fn total_active_hours(&self) -> f64 {
        self.screen_time_hours + self.social_media_hours + self.gaming_hours + self.streaming_hours
    }
}

/// Classifier input vector, ordered as `schema::FEATURE_COLUMNS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedVector {
    values: [f64; FEATURE_COUNT],
}

impl EncodedVector {
    pub(crate) fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a value by its schema column name
    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i])
    }

    /// Iterate `(column, value)` pairs in schema order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }
}

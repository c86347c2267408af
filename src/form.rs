//! Prediction form
//!
//! Input constraints for every form field (min, max, default, step). Raw input
//! arrives with any subset of fields set; missing fields take their defaults
//! and every value is bounds-checked before the record reaches the encoder.

use crate::error::FormError;
use crate::types::{Gender, OperatingSystem, UsageRecord};
use serde::{Deserialize, Serialize};

/// Constraints for one numeric form field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
    pub default: f64,
    /// Widget increment; informational, values are not snapped
    pub step: f64,
}

impl FieldSpec {
    /// Check a value against this field's bounds
    pub fn check(&self, value: f64) -> Result<f64, FormError> {
        match self.max {
            Some(max) if !(self.min..=max).contains(&value) => Err(FormError::OutOfRange {
                field: self.name,
                value,
                min: self.min,
                max,
            }),
            None if !value.is_finite() || value < self.min => Err(FormError::BelowMinimum {
                field: self.name,
                value,
                min: self.min,
            }),
            _ => Ok(value),
        }
    }
}

pub const AGE: FieldSpec = FieldSpec {
    name: "age",
    label: "Age",
    min: 18.0,
    max: Some(80.0),
    default: 25.0,
    step: 1.0,
};

pub const SCREEN_TIME: FieldSpec = FieldSpec {
    name: "screen_time",
    label: "Screen Time (hrs/day)",
    min: 0.5,
    max: Some(24.0),
    default: 4.0,
    step: 0.5,
};

pub const DATA_USAGE: FieldSpec = FieldSpec {
    name: "data_usage",
    label: "Data Usage (GB/month)",
    min: 1.0,
    max: None,
    default: 30.0,
    step: 1.0,
};

pub const CALLS_DURATION: FieldSpec = FieldSpec {
    name: "calls_duration",
    label: "Calls Duration (mins/day)",
    min: 1.0,
    max: None,
    default: 45.0,
    step: 5.0,
};

pub const APPS_INSTALLED: FieldSpec = FieldSpec {
    name: "apps_installed",
    label: "Number of Apps Installed",
    min: 5.0,
    max: None,
    default: 25.0,
    step: 1.0,
};

pub const SOCIAL_MEDIA: FieldSpec = FieldSpec {
    name: "social_media",
    label: "Social Media Time (hrs/day)",
    min: 0.0,
    max: Some(24.0),
    default: 2.5,
    step: 0.5,
};

pub const ECOMMERCE_SPEND: FieldSpec = FieldSpec {
    name: "ecommerce_spend",
    label: "E-commerce Spend (INR/month)",
    min: 0.0,
    max: None,
    default: 2000.0,
    step: 100.0,
};

pub const STREAMING: FieldSpec = FieldSpec {
    name: "streaming",
    label: "Streaming Time (hrs/day)",
    min: 0.0,
    max: Some(24.0),
    default: 1.5,
    step: 0.5,
};

pub const GAMING: FieldSpec = FieldSpec {
    name: "gaming",
    label: "Gaming Time (hrs/day)",
    min: 0.0,
    max: Some(24.0),
    default: 1.0,
    step: 0.5,
};

pub const MONTHLY_COST: FieldSpec = FieldSpec {
    name: "monthly_cost",
    label: "Monthly Recharge Cost (INR)",
    min: 200.0,
    max: None,
    default: 699.0,
    step: 50.0,
};

/// All numeric fields, in form order
pub const NUMERIC_FIELDS: [FieldSpec; 10] = [
    AGE,
    SCREEN_TIME,
    DATA_USAGE,
    CALLS_DURATION,
    APPS_INSTALLED,
    SOCIAL_MEDIA,
    ECOMMERCE_SPEND,
    STREAMING,
    GAMING,
    MONTHLY_COST,
];

pub const DEFAULT_GENDER: Gender = Gender::Male;
pub const DEFAULT_OS: OperatingSystem = OperatingSystem::Android;

/// Raw form submission; unset fields fall back to their defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UsageForm {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub screen_time: Option<f64>,
    pub data_usage: Option<f64>,
    pub calls_duration: Option<f64>,
    pub apps_installed: Option<u32>,
    pub social_media: Option<f64>,
    pub ecommerce_spend: Option<f64>,
    pub streaming: Option<f64>,
    pub gaming: Option<f64>,
    pub monthly_cost: Option<f64>,
    pub os: Option<String>,
}

impl UsageForm {
    /// Parse a form submission from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply defaults, check bounds and parse the category fields
    pub fn into_record(self) -> Result<UsageRecord, FormError> {
        let age = AGE.check(self.age.map_or(AGE.default, f64::from))?;
        let apps = APPS_INSTALLED.check(
            self.apps_installed
                .map_or(APPS_INSTALLED.default, f64::from),
        )?;

        let gender = match self.gender {
            Some(g) => g.parse::<Gender>()?,
            None => DEFAULT_GENDER,
        };
        let operating_system = match self.os {
            Some(os) => os.parse::<OperatingSystem>()?,
            None => DEFAULT_OS,
        };

        Ok(UsageRecord {
            age: age as u32,
            gender,
            screen_time_hours: field(&SCREEN_TIME, self.screen_time)?,
            data_usage_gb: field(&DATA_USAGE, self.data_usage)?,
            calls_duration_min: field(&CALLS_DURATION, self.calls_duration)?,
            apps_installed: apps as u32,
            social_media_hours: field(&SOCIAL_MEDIA, self.social_media)?,
            ecommerce_spend: field(&ECOMMERCE_SPEND, self.ecommerce_spend)?,
            streaming_hours: field(&STREAMING, self.streaming)?,
            gaming_hours: field(&GAMING, self.gaming)?,
            monthly_cost_inr: field(&MONTHLY_COST, self.monthly_cost)?,
            operating_system,
        })
    }
}

fn field(spec: &FieldSpec, value: Option<f64>) -> Result<f64, FormError> {
    spec.check(value.unwrap_or(spec.default))
}

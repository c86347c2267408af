//! Prediction request validator/encoder
//!
//! Checks the daily activity budget and lays a `UsageRecord` out as the
//! positional vector the classifier was trained on.

use crate::error::ValidationError;
use crate::schema::FEATURE_COUNT;
use crate::types::{EncodedVector, Gender, OperatingSystem, UsageRecord};

/// Upper bound on screen + social media + gaming + streaming hours per day
pub const MAX_ACTIVE_HOURS: f64 = 24.0;

/// Encode a gender label (`Male`, `Female`, `Other`) to its classifier code
pub fn encode_gender(value: &str) -> Result<u8, ValidationError> {
    value.parse::<Gender>().map(|g| g.code())
}

/// Encode an operating system label (`Android`, `iOS`) to its classifier code
pub fn encode_os(value: &str) -> Result<u8, ValidationError> {
    value.parse::<OperatingSystem>().map(|os| os.code())
}

/// Validate a usage record and encode it for the classifier.
///
/// The only business-rule rejection is the activity budget: a record whose
/// tracked activities add up to more than 24 hours never reaches the model.
pub fn validate(record: &UsageRecord) -> Result<EncodedVector, ValidationError> {
    let total_hours = record.total_active_hours();
    if total_hours > MAX_ACTIVE_HOURS {
        return Err(ValidationError::BudgetExceeded { total_hours });
    }

    // Order must match schema::FEATURE_COLUMNS
    let values: [f64; FEATURE_COUNT] = [
        record.age as f64,
        record.gender.code() as f64,
        record.screen_time_hours,
        record.data_usage_gb,
        record.calls_duration_min,
        record.apps_installed as f64,
        record.social_media_hours,
        record.ecommerce_spend,
        record.streaming_hours,
        record.gaming_hours,
        record.monthly_cost_inr,
        record.operating_system.code() as f64,
    ];

    Ok(EncodedVector::new(values))
}

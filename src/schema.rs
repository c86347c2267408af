//! Feature schema shared by the encoder, the dataset and the classifier
//!
//! The classifier consumes a positional vector with no schema of its own, so a
//! wrong column order produces wrong predictions rather than an error. The
//! schema below names every position and is checked against the classifier
//! artifact when it is loaded.

use crate::classifier::Classifier;
use crate::error::ClassifierLoadError;

/// Current feature schema version
pub const SCHEMA_VERSION: &str = "phone_usage.features.v1";

/// Number of classifier input features
pub const FEATURE_COUNT: usize = 12;

pub const AGE_COLUMN: &str = "Age";
pub const GENDER_COLUMN: &str = "Gender";
pub const SCREEN_TIME_COLUMN: &str = "Screen Time (hrs/day)";
pub const DATA_USAGE_COLUMN: &str = "Data Usage (GB/month)";
pub const CALLS_DURATION_COLUMN: &str = "Calls Duration (mins/day)";
pub const APPS_INSTALLED_COLUMN: &str = "Number of Apps Installed";
pub const SOCIAL_MEDIA_COLUMN: &str = "Social Media Time (hrs/day)";
pub const ECOMMERCE_SPEND_COLUMN: &str = "E-commerce Spend (INR/month)";
pub const STREAMING_COLUMN: &str = "Streaming Time (hrs/day)";
pub const GAMING_COLUMN: &str = "Gaming Time (hrs/day)";
pub const MONTHLY_COST_COLUMN: &str = "Monthly Recharge Cost (INR)";
pub const OS_COLUMN: &str = "OS";

/// Dataset column holding the primary-use category code
pub const PRIMARY_USE_COLUMN: &str = "Primary Use";

/// Prefix of dataset columns holding cluster assignments
pub const CLUSTER_PREFIX: &str = "cluster_";

/// Classifier input columns, in vector order
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    AGE_COLUMN,
    GENDER_COLUMN,
    SCREEN_TIME_COLUMN,
    DATA_USAGE_COLUMN,
    CALLS_DURATION_COLUMN,
    APPS_INSTALLED_COLUMN,
    SOCIAL_MEDIA_COLUMN,
    ECOMMERCE_SPEND_COLUMN,
    STREAMING_COLUMN,
    GAMING_COLUMN,
    MONTHLY_COST_COLUMN,
    OS_COLUMN,
];

/// Named feature schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    pub version: &'static str,
    pub columns: &'static [&'static str],
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            columns: &FEATURE_COLUMNS,
        }
    }
}

impl FeatureSchema {
    /// Verify that a classifier expects exactly this schema's inputs.
    ///
    /// The input width must match; feature names are compared position by
    /// position when the classifier carries them.
    pub fn check(&self, classifier: &dyn Classifier) -> Result<(), ClassifierLoadError> {
        let expected = self.columns.len();
        let actual = classifier.n_features();
        if actual != expected {
            return Err(ClassifierLoadError::SchemaMismatch(format!(
                "{} expects {} features, schema {} has {}",
                classifier.name(),
                actual,
                self.version,
                expected
            )));
        }

        if let Some(names) = classifier.feature_names() {
            if names.len() != expected {
                return Err(ClassifierLoadError::SchemaMismatch(format!(
                    "{} lists {} feature names, expected {}",
                    classifier.name(),
                    names.len(),
                    expected
                )));
            }
            for (index, (name, column)) in names.iter().zip(self.columns).enumerate() {
                if name != column {
                    return Err(ClassifierLoadError::SchemaMismatch(format!(
                        "feature {index} is '{name}', expected '{column}'"
                    )));
                }
            }
        }

        Ok(())
    }
}

//! Phone Usage Insights - dataset summaries, user segments and primary-use prediction
//!
//! Works over a pre-computed phone-usage dataset (with cluster assignments) and
//! a pre-trained decision tree. A prediction request flows through:
//! form bounds → validation/encoding → classifier → category decoding.
//!
//! ## Modules
//!
//! - **Prediction**: `form`, `encoder`, `classifier`, `predictor`, `categories`
//! - **Exploration**: `dataset`, `stats`, `views`
//! - **Surface**: `dashboard`, `report`, `config`

pub mod categories;
pub mod classifier;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod form;
pub mod predictor;
pub mod report;
pub mod schema;
pub mod stats;
pub mod types;
pub mod views;

pub use categories::{CategoryTable, CategoryTableVersion, PrimaryUse};
pub use classifier::{load_classifier, Classifier, DecisionTree};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, Outcome};
pub use dataset::Dataset;
pub use encoder::validate;
pub use error::{DashboardError, PredictionError, ValidationError};
pub use form::UsageForm;
pub use predictor::{predict, Prediction, Predictor};
pub use schema::{FeatureSchema, FEATURE_COLUMNS, SCHEMA_VERSION};
pub use types::{EncodedVector, Gender, OperatingSystem, UsageRecord};

/// Crate version embedded in all reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "phone-usage-insights";

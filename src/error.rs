//! Error types for Phone Usage Insights
//!
//! Each failure domain gets its own enum so callers can decide how far an error
//! propagates: dataset failures only disable the dataset views, classifier
//! failures only disable prediction, and request errors are user-correctable.

use thiserror::Error;

/// Errors raised while loading the usage dataset
#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("Failed to open dataset {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse dataset at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Errors raised while loading the classifier artifact
#[derive(Debug, Error)]
pub enum ClassifierLoadError {
    #[error("Failed to read classifier artifact {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid classifier JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed classifier artifact: {0}")]
    InvalidStructure(String),

    #[error("Classifier does not match feature schema: {0}")]
    SchemaMismatch(String),
}

/// Errors raised by the request validator/encoder
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Total time across activities is {total_hours:.1} hours, which exceeds 24 hours")]
    BudgetExceeded { total_hours: f64 },

    #[error("Unknown {field} category: {value}")]
    UnknownCategory { field: &'static str, value: String },
}

/// Failures raised inside a classifier while scoring a vector
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierFault {
    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch { expected: usize, actual: usize },

    #[error("Feature {index} is not a finite number")]
    NonFiniteFeature { index: usize },

    #[error("Tree traversal did not reach a leaf after {steps} steps")]
    TraversalOverflow { steps: usize },

    #[error("{0}")]
    Other(String),
}

/// Errors raised by the prediction round-trip
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Classifier is unavailable")]
    ClassifierUnavailable,

    #[error("Inference failed: {0}")]
    Inference(#[source] ClassifierFault),
}

/// Errors raised while turning raw form input into a usage record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        value: f64,
        min: f64,
    },

    #[error(transparent)]
    Category(#[from] ValidationError),
}

/// Errors raised while building a dashboard view
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("Dataset is unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("Unknown feature '{feature}', choose one of: {}", choices.join(", "))]
    UnknownFeature {
        feature: String,
        choices: Vec<String>,
    },

    #[error("Column '{column}' is not present in this dataset")]
    MissingColumn { column: String },

    #[error("Histogram bin count {bins} is out of range, use 1 to {max}")]
    InvalidBins { bins: usize, max: usize },

    #[error("Unknown cluster column '{column}', choose one of: {}", choices.join(", "))]
    UnknownClusterColumn {
        column: String,
        choices: Vec<String>,
    },

    #[error("No cluster columns found in the dataset")]
    NoClusters,
}

/// Umbrella error for library entry points
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Dataset(#[from] DatasetLoadError),

    #[error(transparent)]
    Classifier(#[from] ClassifierLoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

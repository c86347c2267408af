//! Prediction round-trip
//!
//! Encoded vector → classifier → category label. The classifier is loaded once
//! and only read afterwards; when it failed to load the predictor runs in a
//! degraded mode where every request fails fast with `ClassifierUnavailable`.

use crate::categories::CategoryTable;
use crate::classifier::Classifier;
use crate::error::{ClassifierLoadError, PredictionError};
use crate::schema::FeatureSchema;
use crate::types::EncodedVector;
use serde::Serialize;

/// Result of one successful prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    /// Class code returned by the classifier
    pub code: i64,
    /// Decoded category label
    pub category: &'static str,
}

/// Run one encoded vector through an optional classifier and decode the result.
///
/// A missing classifier fails with `ClassifierUnavailable` without invoking
/// anything; classifier failures are wrapped in `PredictionError::Inference`.
pub fn predict(
    vector: &EncodedVector,
    classifier: Option<&dyn Classifier>,
    categories: &CategoryTable,
) -> Result<Prediction, PredictionError> {
    let classifier = classifier.ok_or(PredictionError::ClassifierUnavailable)?;
    let code = classifier
        .predict(vector.as_slice())
        .map_err(PredictionError::Inference)?;

    Ok(Prediction {
        code,
        category: categories.decode(code),
    })
}

/// Holds the process-wide classifier and the category table used to decode it
pub struct Predictor {
    classifier: Option<Box<dyn Classifier>>,
    categories: CategoryTable,
}

impl Predictor {
    /// Create a predictor around a classifier after checking it against the feature schema
    pub fn new(
        classifier: Box<dyn Classifier>,
        categories: CategoryTable,
    ) -> Result<Self, ClassifierLoadError> {
        FeatureSchema::default().check(classifier.as_ref())?;
        Ok(Self {
            classifier: Some(classifier),
            categories,
        })
    }

    /// Create a predictor in degraded mode
    pub fn unavailable(categories: CategoryTable) -> Self {
        Self {
            classifier: None,
            categories,
        }
    }

    pub fn is_available(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    /// Name of the loaded classifier, if any
    pub fn classifier_name(&self) -> Option<&str> {
        self.classifier.as_deref().map(|c| c.name())
    }

    pub fn predict(&self, vector: &EncodedVector) -> Result<Prediction, PredictionError> {
        predict(vector, self.classifier.as_deref(), &self.categories)
    }
}

//! Dashboard orchestration
//!
//! Loads the dataset and the classifier once, then answers independent view
//! and prediction requests. A dataset failure only disables the dataset views
//! and a classifier failure only disables prediction; both failures are kept
//! so they can be shown to the user.

use crate::categories::CategoryTable;
use crate::classifier::{load_classifier, Classifier};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::encoder::validate;
use crate::error::{
    ClassifierLoadError, DashboardError, DatasetLoadError, FormError, PredictionError,
    ValidationError, ViewError,
};
use crate::form::UsageForm;
use crate::predictor::{Prediction, Predictor};
use crate::types::UsageRecord;
use crate::views::{self, ClusterView, FeatureDistribution, OverviewMetrics};
use serde::Serialize;

/// User-visible result of a prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The classifier produced a category
    Predicted { code: i64, category: String },
    /// The input must be corrected by the user
    Rejected { message: String, hint: Option<String> },
    /// Prediction could not be made
    Failed { message: String, hint: Option<String> },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Predicted { .. })
    }

    /// Message for display
    pub fn message(&self) -> String {
        match self {
            Outcome::Predicted { category, .. } => format!("Predicted Primary Use: {category}"),
            Outcome::Rejected { message, .. } | Outcome::Failed { message, .. } => message.clone(),
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Outcome::Predicted { .. } => None,
            Outcome::Rejected { hint, .. } | Outcome::Failed { hint, .. } => hint.as_deref(),
        }
    }
}

impl From<Prediction> for Outcome {
    fn from(prediction: Prediction) -> Self {
        Outcome::Predicted {
            code: prediction.code,
            category: prediction.category.to_string(),
        }
    }
}

impl From<DashboardError> for Outcome {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Validation(ValidationError::BudgetExceeded { .. }) => Outcome::Rejected {
                message: "Total time across activities exceeds 24 hours. Please adjust your inputs."
                    .to_string(),
                hint: Some(err.to_string()),
            },
            DashboardError::Validation(e) | DashboardError::Form(FormError::Category(e)) => {
                Outcome::Rejected {
                    message: e.to_string(),
                    hint: Some("Please ensure all input values are valid.".to_string()),
                }
            }
            DashboardError::Form(e) => Outcome::Rejected {
                message: e.to_string(),
                hint: Some("Please ensure all input values are valid.".to_string()),
            },
            DashboardError::Prediction(PredictionError::ClassifierUnavailable) => Outcome::Failed {
                message: "Prediction is unavailable: the classifier could not be loaded."
                    .to_string(),
                hint: Some("Run 'usage doctor' to see why the model failed to load".to_string()),
            },
            other => Outcome::Failed {
                message: format!("Error making prediction: {other}"),
                hint: Some("Please ensure all input values are valid.".to_string()),
            },
        }
    }
}

/// Load status of one dashboard component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentStatus {
    pub name: &'static str,
    pub available: bool,
    pub detail: String,
}

/// Loaded dashboard state
pub struct Dashboard {
    config: DashboardConfig,
    categories: CategoryTable,
    dataset: Result<Dataset, DatasetLoadError>,
    predictor: Predictor,
    classifier_error: Option<ClassifierLoadError>,
}

impl Dashboard {
    /// Load the dataset and classifier named by the config
    pub fn open(config: DashboardConfig) -> Self {
        let dataset = Dataset::load(&config.dataset_path);
        let classifier = load_classifier(&config.model_path)
            .map(|tree| Box::new(tree) as Box<dyn Classifier>);
        Self::from_parts(config, dataset, classifier)
    }

    /// Assemble a dashboard from already-loaded parts
    pub fn from_parts(
        config: DashboardConfig,
        dataset: Result<Dataset, DatasetLoadError>,
        classifier: Result<Box<dyn Classifier>, ClassifierLoadError>,
    ) -> Self {
        let categories = CategoryTable::new(config.category_table);

        if let Err(e) = &dataset {
            log::error!("Dataset unavailable: {}", e);
        }

        let (predictor, classifier_error) =
            match classifier.and_then(|c| Predictor::new(c, categories)) {
                Ok(predictor) => (predictor, None),
                Err(e) => {
                    log::warn!("Classifier unavailable, prediction disabled: {}", e);
                    (Predictor::unavailable(categories), Some(e))
                }
            };

        Self {
            config,
            categories,
            dataset,
            predictor,
            classifier_error,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn dataset(&self) -> Result<&Dataset, ViewError> {
        self.dataset
            .as_ref()
            .map_err(|e| ViewError::DatasetUnavailable(e.to_string()))
    }

    pub fn prediction_available(&self) -> bool {
        self.predictor.is_available()
    }

    pub fn classifier_error(&self) -> Option<&ClassifierLoadError> {
        self.classifier_error.as_ref()
    }

    pub fn overview(&self) -> Result<OverviewMetrics, ViewError> {
        Ok(views::overview(self.dataset()?, &self.categories))
    }

    /// Distribution of one feature; `bins` defaults to the configured count
    pub fn distribution(
        &self,
        feature: &str,
        bins: Option<usize>,
    ) -> Result<FeatureDistribution, ViewError> {
        let bins = bins.unwrap_or(self.config.histogram_bins);
        views::distribution(self.dataset()?, feature, bins)
    }

    pub fn clusters(&self, column: Option<&str>) -> Result<ClusterView, ViewError> {
        views::clusters(self.dataset()?, column, &self.categories)
    }

    /// Validate, encode and classify one record
    pub fn predict_record(&self, record: &UsageRecord) -> Result<Prediction, DashboardError> {
        let vector = validate(record)?;
        let prediction = self.predictor.predict(&vector)?;
        log::debug!(
            "Predicted code {} ({}) for record with {:.1} active hours",
            prediction.code,
            prediction.category,
            record.total_active_hours()
        );
        Ok(prediction)
    }

    /// Run a raw form submission end to end and convert any failure into a message
    pub fn predict_form(&self, form: UsageForm) -> Outcome {
        let result = form
            .into_record()
            .map_err(DashboardError::from)
            .and_then(|record| self.predict_record(&record));

        match result {
            Ok(prediction) => prediction.into(),
            Err(e) => {
                log::info!("Prediction request not completed: {}", e);
                e.into()
            }
        }
    }

    /// Load status of the dataset and the classifier
    pub fn status(&self) -> Vec<ComponentStatus> {
        let dataset = match &self.dataset {
            Ok(ds) => ComponentStatus {
                name: "dataset",
                available: true,
                detail: format!(
                    "{} ({} users, {} cluster columns)",
                    self.config.dataset_path.display(),
                    ds.len(),
                    ds.cluster_columns().len()
                ),
            },
            Err(e) => ComponentStatus {
                name: "dataset",
                available: false,
                detail: e.to_string(),
            },
        };

        let classifier = match (&self.classifier_error, self.predictor.classifier_name()) {
            (None, Some(name)) => ComponentStatus {
                name: "classifier",
                available: true,
                detail: format!("{} loaded from {}", name, self.config.model_path.display()),
            },
            (Some(e), _) => ComponentStatus {
                name: "classifier",
                available: false,
                detail: e.to_string(),
            },
            (None, None) => ComponentStatus {
                name: "classifier",
                available: false,
                detail: "not loaded".to_string(),
            },
        };

        vec![dataset, classifier]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClassifierFault;
    use crate::schema::FEATURE_COUNT;

    struct Constant(i64);

    impl Classifier for Constant {
        fn predict(&self, _features: &[f64]) -> Result<i64, ClassifierFault> {
            Ok(self.0)
        }

        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _features: &[f64]) -> Result<i64, ClassifierFault> {
            Err(ClassifierFault::Other("shape mismatch".to_string()))
        }

        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }
    }

    fn sample_dataset() -> Dataset {
        let csv = "Screen Time (hrs/day),Data Usage (GB/month),Primary Use,cluster_kmeans\n\
                   3.0,20,1,0\n\
                   5.0,40,1,1\n";
        Dataset::from_reader(csv.as_bytes()).unwrap()
    }

    fn dashboard_with(classifier: Result<Box<dyn Classifier>, ClassifierLoadError>) -> Dashboard {
        Dashboard::from_parts(DashboardConfig::default(), Ok(sample_dataset()), classifier)
    }

    #[test]
    fn test_predict_form_success() {
        let dashboard = dashboard_with(Ok(Box::new(Constant(3))));
        let outcome = dashboard.predict_form(UsageForm::default());

        assert_eq!(
            outcome,
            Outcome::Predicted {
                code: 3,
                category: "Professional".to_string(),
            }
        );
        assert_eq!(outcome.message(), "Predicted Primary Use: Professional");
    }

    #[test]
    fn test_predict_form_budget_exceeded() {
        let dashboard = dashboard_with(Ok(Box::new(Constant(0))));
        let outcome = dashboard.predict_form(UsageForm {
            screen_time: Some(20.0),
            social_media: Some(3.0),
            gaming: Some(1.0),
            streaming: Some(1.0),
            ..Default::default()
        });

        assert!(matches!(outcome, Outcome::Rejected { .. }));
        assert!(outcome.message().contains("exceeds 24 hours"));
    }

    #[test]
    fn test_predict_form_out_of_range() {
        let dashboard = dashboard_with(Ok(Box::new(Constant(0))));
        let outcome = dashboard.predict_form(UsageForm {
            age: Some(90),
            ..Default::default()
        });

        assert!(matches!(outcome, Outcome::Rejected { .. }));
        assert!(outcome.message().contains("age"));
    }

    #[test]
    fn test_classifier_failure_degrades_only_prediction() {
        let dashboard = dashboard_with(Err(ClassifierLoadError::InvalidStructure(
            "tree has no nodes".to_string(),
        )));

        assert!(!dashboard.prediction_available());
        assert!(dashboard.overview().is_ok());

        let outcome = dashboard.predict_form(UsageForm::default());
        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert!(outcome.hint().unwrap().contains("doctor"));

        let status = dashboard.status();
        assert!(status[0].available);
        assert!(!status[1].available);
        assert!(status[1].detail.contains("tree has no nodes"));
    }

    #[test]
    fn test_inference_error_surfaces_message() {
        let dashboard = dashboard_with(Ok(Box::new(Broken)));
        let outcome = dashboard.predict_form(UsageForm::default());

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert!(outcome.message().contains("shape mismatch"));
    }

    #[test]
    fn test_dataset_failure_degrades_only_views() {
        let dashboard = Dashboard::from_parts(
            DashboardConfig::default(),
            Err(DatasetLoadError::MissingColumn("Primary Use".to_string())),
            Ok(Box::new(Constant(1))),
        );

        assert!(matches!(
            dashboard.overview(),
            Err(ViewError::DatasetUnavailable(_))
        ));
        assert!(matches!(
            dashboard.clusters(None),
            Err(ViewError::DatasetUnavailable(_))
        ));
        assert!(dashboard.predict_form(UsageForm::default()).is_success());
    }

    #[test]
    fn test_views_use_configured_bins() {
        let config = DashboardConfig {
            histogram_bins: 4,
            ..DashboardConfig::default()
        };
        let dashboard = Dashboard::from_parts(config, Ok(sample_dataset()), Ok(Box::new(Constant(0))));

        let dist = dashboard.distribution("Screen Time (hrs/day)", None).unwrap();
        assert_eq!(dist.histogram.unwrap().bins.len(), 4);

        let dist = dashboard.distribution("Screen Time (hrs/day)", Some(2)).unwrap();
        assert_eq!(dist.histogram.unwrap().bins.len(), 2);

        let view = dashboard.clusters(None).unwrap();
        assert_eq!(view.summaries.len(), 2);
        assert_eq!(view.summaries[0].most_common_use, "Gaming");
    }
}

//! Dashboard views
//!
//! Each view is a pure function of the dataset: overview metrics, the
//! distribution of one usage feature, and cluster segmentation.

use crate::categories::{CategoryTable, UNKNOWN_CATEGORY};
use crate::dataset::Dataset;
use crate::error::ViewError;
use crate::schema::{
    DATA_USAGE_COLUMN, ECOMMERCE_SPEND_COLUMN, GAMING_COLUMN, MONTHLY_COST_COLUMN,
    SCREEN_TIME_COLUMN, SOCIAL_MEDIA_COLUMN, STREAMING_COLUMN,
};
use crate::stats::{self, Histogram, MAX_HISTOGRAM_BINS};
use serde::Serialize;

/// Features offered by the distribution view
pub const DISTRIBUTION_FEATURES: [&str; 7] = [
    SCREEN_TIME_COLUMN,
    SOCIAL_MEDIA_COLUMN,
    STREAMING_COLUMN,
    GAMING_COLUMN,
    DATA_USAGE_COLUMN,
    ECOMMERCE_SPEND_COLUMN,
    MONTHLY_COST_COLUMN,
];

/// Headline metrics for the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total_users: usize,
    pub avg_screen_time_hours: Option<f64>,
    pub avg_data_usage_gb: Option<f64>,
    /// Most common primary-use code; `None` when missing codes dominate
    pub most_common_code: Option<i64>,
    pub most_common_use: String,
}

/// Histogram of one usage feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDistribution {
    pub feature: String,
    pub histogram: Option<Histogram>,
    /// Rows with no value for the feature
    pub missing: usize,
}

/// One user plotted by screen time and data usage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterPoint {
    pub screen_time_hours: f64,
    pub data_usage_gb: f64,
    pub cluster: i64,
}

/// Per-cluster characteristics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    pub cluster: i64,
    pub users: usize,
    pub avg_screen_time_hours: Option<f64>,
    pub avg_data_usage_gb: Option<f64>,
    pub most_common_use: String,
}

/// Segmentation by one cluster column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterView {
    pub column: String,
    pub available_columns: Vec<String>,
    pub points: Vec<ClusterPoint>,
    pub summaries: Vec<ClusterSummary>,
}

/// Most common primary-use code.
///
/// Ties go to the smallest value, and missing sorts before every known code.
/// `Some(None)` means missing values are the most frequent; `None` means the
/// column is empty.
pub fn most_common_code(codes: &[Option<i64>]) -> Option<Option<i64>> {
    stats::mode(codes.iter().copied())
}

/// Build the overview metrics
pub fn overview(dataset: &Dataset, categories: &CategoryTable) -> OverviewMetrics {
    let most_common_code = most_common_code(dataset.primary_use()).flatten();
    let most_common_use = match most_common_code {
        Some(code) => categories.decode(code).to_string(),
        None => UNKNOWN_CATEGORY.to_string(),
    };

    OverviewMetrics {
        total_users: dataset.len(),
        avg_screen_time_hours: stats::mean(dataset.screen_time()),
        avg_data_usage_gb: stats::mean(dataset.data_usage()),
        most_common_code,
        most_common_use,
    }
}

/// Build the distribution of one of `DISTRIBUTION_FEATURES`
pub fn distribution(
    dataset: &Dataset,
    feature: &str,
    bins: usize,
) -> Result<FeatureDistribution, ViewError> {
    if !DISTRIBUTION_FEATURES.contains(&feature) {
        return Err(ViewError::UnknownFeature {
            feature: feature.to_string(),
            choices: DISTRIBUTION_FEATURES.iter().map(|f| f.to_string()).collect(),
        });
    }
    if bins == 0 || bins > MAX_HISTOGRAM_BINS {
        return Err(ViewError::InvalidBins {
            bins,
            max: MAX_HISTOGRAM_BINS,
        });
    }
    let values = dataset
        .column(feature)
        .ok_or_else(|| ViewError::MissingColumn {
            column: feature.to_string(),
        })?;

    Ok(FeatureDistribution {
        feature: feature.to_string(),
        histogram: stats::histogram(values, bins),
        missing: values.iter().filter(|v| v.is_none()).count(),
    })
}

/// Build the segmentation view for a cluster column (first column by default)
pub fn clusters(
    dataset: &Dataset,
    column: Option<&str>,
    categories: &CategoryTable,
) -> Result<ClusterView, ViewError> {
    let available_columns: Vec<String> = dataset
        .cluster_columns()
        .iter()
        .map(|c| c.name.clone())
        .collect();

    let selected = match column {
        Some(name) => dataset
            .cluster(name)
            .ok_or_else(|| ViewError::UnknownClusterColumn {
                column: name.to_string(),
                choices: available_columns.clone(),
            })?,
        None => dataset
            .cluster_columns()
            .first()
            .ok_or(ViewError::NoClusters)?,
    };

    let screen_time = dataset.screen_time();
    let data_usage = dataset.data_usage();
    let primary_use = dataset.primary_use();

    let points = selected
        .labels
        .iter()
        .enumerate()
        .filter_map(|(row, label)| {
            Some(ClusterPoint {
                screen_time_hours: screen_time.get(row).copied().flatten()?,
                data_usage_gb: data_usage.get(row).copied().flatten()?,
                cluster: (*label)?,
            })
        })
        .collect();

    let mut cluster_ids: Vec<i64> = selected.labels.iter().flatten().copied().collect();
    cluster_ids.sort_unstable();
    cluster_ids.dedup();

    let summaries = cluster_ids
        .into_iter()
        .map(|cluster| {
            let rows: Vec<usize> = selected
                .labels
                .iter()
                .enumerate()
                .filter(|(_, label)| **label == Some(cluster))
                .map(|(row, _)| row)
                .collect();

            let pick = |column: &[Option<f64>]| -> Vec<Option<f64>> {
                rows.iter().map(|&r| column.get(r).copied().flatten()).collect()
            };
            let codes: Vec<Option<i64>> = rows
                .iter()
                .map(|&r| primary_use.get(r).copied().flatten())
                .collect();

            let most_common_use = match most_common_code(&codes).flatten() {
                Some(code) => categories.decode_or_code(code),
                None => UNKNOWN_CATEGORY.to_string(),
            };

            ClusterSummary {
                cluster,
                users: rows.len(),
                avg_screen_time_hours: stats::mean(&pick(screen_time)),
                avg_data_usage_gb: stats::mean(&pick(data_usage)),
                most_common_use,
            }
        })
        .collect();

    Ok(ClusterView {
        column: selected.name.clone(),
        available_columns,
        points,
        summaries,
    })
}

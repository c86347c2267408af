//! Report encoding
//!
//! Wraps view results in a JSON envelope with producer metadata, and renders
//! the same results as plain text for terminals.

use crate::categories::CategoryTable;
use crate::error::DashboardError;
use crate::form::NUMERIC_FIELDS;
use crate::predictor::Prediction;
use crate::schema::{FeatureSchema, FEATURE_COLUMNS};
use crate::stats::Histogram;
use crate::views::{ClusterView, FeatureDistribution, OverviewMetrics};
use crate::{PRODUCER_NAME, VERSION};
use chrono::Utc;
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

/// Current report envelope version
pub const REPORT_VERSION: &str = "1.0.0";

/// Width of the longest histogram bar in text output
const BAR_WIDTH: usize = 40;

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// JSON envelope around one view's data
#[derive(Debug, Clone, Serialize)]
pub struct Report<T: Serialize> {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub view: String,
    pub data: T,
}

/// Report encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn encode<T: Serialize>(&self, view: &str, data: T) -> Report<T> {
        Report {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            view: view.to_string(),
            data,
        }
    }

    pub fn encode_to_json<T: Serialize>(&self, view: &str, data: T) -> Result<String, DashboardError> {
        Ok(serde_json::to_string(&self.encode(view, data))?)
    }

    pub fn encode_to_json_pretty<T: Serialize>(
        &self,
        view: &str,
        data: T,
    ) -> Result<String, DashboardError> {
        Ok(serde_json::to_string_pretty(&self.encode(view, data))?)
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"))
}

pub fn render_overview(metrics: &OverviewMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dashboard Overview");
    let _ = writeln!(out, "==================");
    let _ = writeln!(out, "Total Users:         {}", metrics.total_users);
    let _ = writeln!(
        out,
        "Average Screen Time: {} hrs/day",
        fmt_opt(metrics.avg_screen_time_hours)
    );
    let _ = writeln!(
        out,
        "Average Data Usage:  {} GB/month",
        fmt_opt(metrics.avg_data_usage_gb)
    );
    let _ = writeln!(out, "Most Common Use:     {}", metrics.most_common_use);
    out
}

fn render_histogram(out: &mut String, histogram: &Histogram) {
    let peak = histogram.peak().max(1);
    for bin in &histogram.bins {
        let bar = "#".repeat(bin.count * BAR_WIDTH / peak);
        let _ = writeln!(
            out,
            "  [{:>10.2}, {:>10.2})  {:>6}  {}",
            bin.lower, bin.upper, bin.count, bar
        );
    }
}

pub fn render_distribution(distribution: &FeatureDistribution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Distribution of {}", distribution.feature);
    let _ = writeln!(out, "{}", "=".repeat(16 + distribution.feature.len()));
    match &distribution.histogram {
        Some(histogram) => {
            let _ = writeln!(
                out,
                "Count: {}  Min: {:.2}  Max: {:.2}  Missing: {}",
                histogram.total, histogram.min, histogram.max, distribution.missing
            );
            render_histogram(&mut out, histogram);
        }
        None => {
            let _ = writeln!(out, "No values to plot (missing: {})", distribution.missing);
        }
    }
    out
}

pub fn render_clusters(view: &ClusterView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User Segmentation: {}", view.column);
    let _ = writeln!(out, "{}", "=".repeat(19 + view.column.len()));
    let _ = writeln!(out, "Cluster columns: {}", view.available_columns.join(", "));
    let _ = writeln!(out, "Plotted users:   {}", view.points.len());
    let _ = writeln!(out, "\nCluster Characteristics:");
    for summary in &view.summaries {
        let _ = writeln!(out, "  Cluster {}", summary.cluster);
        let _ = writeln!(out, "    Number of Users: {}", summary.users);
        let _ = writeln!(
            out,
            "    Avg Screen Time: {} hrs/day",
            fmt_opt(summary.avg_screen_time_hours)
        );
        let _ = writeln!(
            out,
            "    Avg Data Usage:  {} GB/month",
            fmt_opt(summary.avg_data_usage_gb)
        );
        let _ = writeln!(out, "    Most Common Use: {}", summary.most_common_use);
    }
    out
}

pub fn render_prediction(prediction: &Prediction) -> String {
    format!("Predicted Primary Use: {}\n", prediction.category)
}

/// Describe the feature schema, form constraints and category table
pub fn render_schema(schema: &FeatureSchema, categories: &CategoryTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Feature Schema: {}", schema.version);
    let _ = writeln!(out);
    for (i, column) in FEATURE_COLUMNS.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {}", i, column);
    }

    let _ = writeln!(out, "\nForm fields (min / max / default / step):");
    for field in NUMERIC_FIELDS {
        let max = field.max.map_or_else(|| "-".to_string(), |m| m.to_string());
        let _ = writeln!(
            out,
            "  {:<16} {} / {} / {} / {}",
            field.name, field.min, max, field.default, field.step
        );
    }
    let _ = writeln!(out, "  {:<16} Male | Female | Other", "gender");
    let _ = writeln!(out, "  {:<16} Android | iOS", "os");

    let _ = writeln!(
        out,
        "\nCategory table ({}):",
        categories.version().as_str()
    );
    for (code, label) in categories.entries() {
        let _ = writeln!(out, "  {code} = {label}");
    }
    out
}

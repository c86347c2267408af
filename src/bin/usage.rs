//! Usage CLI - Command-line dashboard for Phone Usage Insights
//!
//! Commands:
//! - overview: Headline metrics for the dataset
//! - distribution: Histogram of one usage feature
//! - predict: Predict a user's primary phone use
//! - clusters: Cluster scatter data and per-cluster characteristics
//! - doctor: Diagnose dataset and classifier loading
//! - schema: Print the feature schema, form constraints and categories

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use phone_usage::categories::CategoryTableVersion;
use phone_usage::config::DashboardConfig;
use phone_usage::dashboard::{ComponentStatus, Dashboard, Outcome};
use phone_usage::error::{DashboardError, ViewError};
use phone_usage::form::UsageForm;
use phone_usage::report::{self, ReportEncoder};
use phone_usage::schema::{FeatureSchema, FEATURE_COLUMNS, SCHEMA_VERSION};
use phone_usage::stats::MAX_HISTOGRAM_BINS;
use phone_usage::{PRODUCER_NAME, VERSION};

/// Usage - phone usage analysis from the command line
#[derive(Parser)]
#[command(name = "usage")]
#[command(version = VERSION)]
#[command(about = "Explore phone usage data and predict primary use", long_about = None)]
struct Cli {
    /// Config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Clustering results CSV
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Classifier artifact (JSON decision tree)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Category table used to decode primary-use codes
    #[arg(long, global = true)]
    categories: Option<CategoryTableArg>,

    /// Output format (defaults to text on a terminal, JSON otherwise)
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline metrics for the dataset
    Overview,

    /// Histogram of one usage feature
    Distribution {
        /// Feature column, e.g. "Screen Time (hrs/day)"
        #[arg(short, long)]
        feature: String,

        /// Number of histogram bins
        #[arg(long)]
        bins: Option<usize>,
    },

    /// Predict a user's primary phone use
    Predict {
        /// Read form values from a JSON file (use - for stdin); flags override it
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[arg(long)]
        age: Option<u32>,

        /// Male, Female or Other
        #[arg(long)]
        gender: Option<String>,

        /// Screen time (hrs/day)
        #[arg(long)]
        screen_time: Option<f64>,

        /// Data usage (GB/month)
        #[arg(long)]
        data_usage: Option<f64>,

        /// Calls duration (mins/day)
        #[arg(long)]
        calls_duration: Option<f64>,

        /// Number of apps installed
        #[arg(long)]
        apps_installed: Option<u32>,

        /// Social media time (hrs/day)
        #[arg(long)]
        social_media: Option<f64>,

        /// E-commerce spend (INR/month)
        #[arg(long)]
        ecommerce_spend: Option<f64>,

        /// Streaming time (hrs/day)
        #[arg(long)]
        streaming: Option<f64>,

        /// Gaming time (hrs/day)
        #[arg(long)]
        gaming: Option<f64>,

        /// Monthly recharge cost (INR)
        #[arg(long)]
        monthly_cost: Option<f64>,

        /// Android or iOS
        #[arg(long)]
        os: Option<String>,
    },

    /// Cluster scatter data and per-cluster characteristics
    Clusters {
        /// Cluster column (defaults to the first cluster_ column)
        #[arg(short, long)]
        column: Option<String>,

        /// Include every plotted point in JSON output
        #[arg(long)]
        points: bool,
    },

    /// Diagnose dataset and classifier loading
    Doctor,

    /// Print the feature schema, form constraints and category table
    Schema,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryTableArg {
    /// Six categories including Communication
    Full,
    /// Five categories without Communication
    Legacy,
}

impl From<CategoryTableArg> for CategoryTableVersion {
    fn from(arg: CategoryTableArg) -> Self {
        match arg {
            CategoryTableArg::Full => CategoryTableVersion::Full,
            CategoryTableArg::Legacy => CategoryTableVersion::Legacy,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), UsageCliError> {
    let format = cli.format.unwrap_or_else(|| {
        if atty::is(atty::Stream::Stdout) {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    });

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(path) = cli.dataset {
        config.dataset_path = path;
    }
    if let Some(path) = cli.model {
        config.model_path = path;
    }
    if let Some(table) = cli.categories {
        config.category_table = table.into();
    }
    log::debug!("Using config {:?}", config);

    let encoder = ReportEncoder::new();

    match cli.command {
        Commands::Schema => cmd_schema(&config, format, &encoder),
        Commands::Overview => cmd_overview(&Dashboard::open(config), format, &encoder),
        Commands::Distribution { feature, bins } => {
            cmd_distribution(&Dashboard::open(config), &feature, bins, format, &encoder)
        }
        Commands::Predict {
            input,
            age,
            gender,
            screen_time,
            data_usage,
            calls_duration,
            apps_installed,
            social_media,
            ecommerce_spend,
            streaming,
            gaming,
            monthly_cost,
            os,
        } => {
            let mut form = match input {
                Some(path) => UsageForm::from_json(&read_input(&path)?)?,
                None => UsageForm::default(),
            };
            let flags = UsageForm {
                age,
                gender,
                screen_time,
                data_usage,
                calls_duration,
                apps_installed,
                social_media,
                ecommerce_spend,
                streaming,
                gaming,
                monthly_cost,
                os,
            };
            merge_form(&mut form, flags);
            cmd_predict(&Dashboard::open(config), form, format, &encoder)
        }
        Commands::Clusters { column, points } => cmd_clusters(
            &Dashboard::open(config),
            column.as_deref(),
            points,
            format,
            &encoder,
        ),
        Commands::Doctor => cmd_doctor(&Dashboard::open(config), format, &encoder),
    }
}

fn cmd_overview(
    dashboard: &Dashboard,
    format: OutputFormat,
    encoder: &ReportEncoder,
) -> Result<(), UsageCliError> {
    let metrics = dashboard.overview()?;
    emit(format, encoder, "overview", &metrics, || {
        report::render_overview(&metrics)
    })
}

fn cmd_distribution(
    dashboard: &Dashboard,
    feature: &str,
    bins: Option<usize>,
    format: OutputFormat,
    encoder: &ReportEncoder,
) -> Result<(), UsageCliError> {
    if let Some(n) = bins {
        if n == 0 || n > MAX_HISTOGRAM_BINS {
            return Err(UsageCliError::InvalidArgument(format!(
                "--bins must be between 1 and {MAX_HISTOGRAM_BINS}"
            )));
        }
    }
    let distribution = dashboard.distribution(feature, bins)?;
    emit(format, encoder, "distribution", &distribution, || {
        report::render_distribution(&distribution)
    })
}

fn cmd_predict(
    dashboard: &Dashboard,
    form: UsageForm,
    format: OutputFormat,
    encoder: &ReportEncoder,
) -> Result<(), UsageCliError> {
    let outcome = dashboard.predict_form(form);
    emit(format, encoder, "prediction", &outcome, || render_outcome(&outcome))?;

    if outcome.is_success() {
        Ok(())
    } else {
        Err(UsageCliError::PredictionNotMade(outcome))
    }
}

fn cmd_clusters(
    dashboard: &Dashboard,
    column: Option<&str>,
    points: bool,
    format: OutputFormat,
    encoder: &ReportEncoder,
) -> Result<(), UsageCliError> {
    let mut view = match dashboard.clusters(column) {
        Err(ViewError::NoClusters) => {
            let warning = ClusterWarning {
                warning: ViewError::NoClusters.to_string(),
            };
            return emit(format, encoder, "clusters", &warning, || {
                format!("Warning: {}.\n", warning.warning)
            });
        }
        other => other?,
    };
    if !points && !matches!(format, OutputFormat::Text) {
        view.points.clear();
    }

    emit(format, encoder, "clusters", &view, || report::render_clusters(&view))
}

fn cmd_doctor(
    dashboard: &Dashboard,
    format: OutputFormat,
    encoder: &ReportEncoder,
) -> Result<(), UsageCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} {}", PRODUCER_NAME, VERSION),
    });

    checks.push(DoctorCheck {
        name: "feature_schema".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} ({} features)", SCHEMA_VERSION, FEATURE_COLUMNS.len()),
    });

    checks.push(DoctorCheck {
        name: "category_table".to_string(),
        status: CheckStatus::Ok,
        message: format!(
            "{} ({} categories)",
            dashboard.categories().version().as_str(),
            dashboard.categories().entries().len()
        ),
    });

    for component in dashboard.status() {
        checks.push(component_check(component));
    }

    if let Ok(dataset) = dashboard.dataset() {
        if !dataset.has_clusters() {
            checks.push(DoctorCheck {
                name: "clusters".to_string(),
                status: CheckStatus::Warning,
                message: "No cluster columns found; segmentation view disabled".to_string(),
            });
        }
    }

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VERSION.to_string(),
        checks,
    };

    emit(format, encoder, "doctor", &report, || {
        let mut out = String::new();
        out.push_str("Usage Doctor Report\n");
        out.push_str("===================\n");
        out.push_str(&format!("Producer: {}\n", report.producer));
        out.push_str(&format!("Version:  {}\n", report.version));
        out.push_str("\nChecks:\n");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            out.push_str(&format!("  {} {}: {}\n", status_icon, check.name, check.message));
        }
        out
    })?;

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(UsageCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(
    config: &DashboardConfig,
    format: OutputFormat,
    encoder: &ReportEncoder,
) -> Result<(), UsageCliError> {
    let schema = FeatureSchema::default();
    let categories = phone_usage::CategoryTable::new(config.category_table);

    let data = SchemaInfo {
        version: schema.version,
        columns: schema.columns.to_vec(),
        form_fields: phone_usage::form::NUMERIC_FIELDS.to_vec(),
        category_table: categories.version().as_str(),
        categories: categories
            .entries()
            .into_iter()
            .map(|(code, label)| CategoryEntry { code, label })
            .collect(),
    };

    emit(format, encoder, "schema", &data, || {
        report::render_schema(&schema, &categories)
    })
}

// Helper functions

fn emit<T: Serialize>(
    format: OutputFormat,
    encoder: &ReportEncoder,
    view: &str,
    data: &T,
    render_text: impl FnOnce() -> String,
) -> Result<(), UsageCliError> {
    match format {
        OutputFormat::Text => print!("{}", render_text()),
        OutputFormat::Json => println!("{}", encoder.encode_to_json(view, data)?),
        OutputFormat::JsonPretty => println!("{}", encoder.encode_to_json_pretty(view, data)?),
    }
    Ok(())
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome.hint() {
        Some(hint) => format!("{}\n{}\n", outcome.message(), hint),
        None => format!("{}\n", outcome.message()),
    }
}

fn read_input(path: &Path) -> Result<String, UsageCliError> {
    if path.to_string_lossy() == "-" {
        Ok(io::read_to_string(io::stdin())?)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Copy every field set on the command line over the file-provided form
fn merge_form(form: &mut UsageForm, flags: UsageForm) {
    macro_rules! take {
        ($($field:ident),*) => {
            $(if flags.$field.is_some() { form.$field = flags.$field; })*
        };
    }
    take!(
        age,
        gender,
        screen_time,
        data_usage,
        calls_duration,
        apps_installed,
        social_media,
        ecommerce_spend,
        streaming,
        gaming,
        monthly_cost,
        os
    );
}

fn component_check(component: ComponentStatus) -> DoctorCheck {
    let status = match (component.available, component.name) {
        (true, _) => CheckStatus::Ok,
        // A missing model only disables prediction
        (false, "classifier") => CheckStatus::Warning,
        (false, _) => CheckStatus::Error,
    };
    DoctorCheck {
        name: component.name.to_string(),
        status,
        message: component.detail,
    }
}

// Error types

#[derive(Debug)]
enum UsageCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Dashboard(DashboardError),
    View(ViewError),
    InvalidArgument(String),
    PredictionNotMade(Outcome),
    DoctorFailed,
}

impl From<io::Error> for UsageCliError {
    fn from(e: io::Error) -> Self {
        UsageCliError::Io(e)
    }
}

impl From<serde_json::Error> for UsageCliError {
    fn from(e: serde_json::Error) -> Self {
        UsageCliError::Json(e)
    }
}

impl From<DashboardError> for UsageCliError {
    fn from(e: DashboardError) -> Self {
        UsageCliError::Dashboard(e)
    }
}

impl From<ViewError> for UsageCliError {
    fn from(e: ViewError) -> Self {
        UsageCliError::View(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<UsageCliError> for CliError {
    fn from(e: UsageCliError) -> Self {
        match e {
            UsageCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            UsageCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax and field names".to_string()),
            },
            UsageCliError::Dashboard(e) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the --config file".to_string()),
            },
            UsageCliError::View(ViewError::DatasetUnavailable(message)) => CliError {
                code: "DATASET_UNAVAILABLE".to_string(),
                message,
                hint: Some("Pass --dataset or run 'usage doctor'".to_string()),
            },
            UsageCliError::View(e) => CliError {
                code: "VIEW_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'usage schema' for valid feature names".to_string()),
            },
            UsageCliError::InvalidArgument(message) => CliError {
                code: "INVALID_ARGUMENT".to_string(),
                message,
                hint: None,
            },
            UsageCliError::PredictionNotMade(outcome) => CliError {
                code: match outcome {
                    Outcome::Rejected { .. } => "PREDICTION_REJECTED".to_string(),
                    _ => "PREDICTION_FAILED".to_string(),
                },
                message: outcome.message(),
                hint: outcome.hint().map(str::to_string),
            },
            UsageCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[derive(Serialize)]
struct ClusterWarning {
    warning: String,
}

#[derive(Serialize)]
struct SchemaInfo {
    version: &'static str,
    columns: Vec<&'static str>,
    form_fields: Vec<phone_usage::form::FieldSpec>,
    category_table: &'static str,
    categories: Vec<CategoryEntry>,
}

#[derive(Serialize)]
struct CategoryEntry {
    code: i64,
    label: &'static str,
}

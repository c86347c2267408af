//! Usage dataset ingestion
//!
//! Loads the clustering results CSV: one row per user, the usage feature
//! columns, the `Primary Use` category code and any number of `cluster_*`
//! assignment columns. Cells that are empty or not numeric are kept as
//! missing values rather than failing the whole load.

use crate::error::DatasetLoadError;
use crate::schema::{CLUSTER_PREFIX, DATA_USAGE_COLUMN, PRIMARY_USE_COLUMN, SCREEN_TIME_COLUMN};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Columns that must be present in every dataset
pub const REQUIRED_COLUMNS: [&str; 3] = [SCREEN_TIME_COLUMN, DATA_USAGE_COLUMN, PRIMARY_USE_COLUMN];

/// One numeric column
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// One cluster assignment column
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterColumn {
    pub name: String,
    pub labels: Vec<Option<i64>>,
}

/// In-memory usage dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    n_rows: usize,
    columns: Vec<NumericColumn>,
    index: HashMap<String, usize>,
    primary_use: Vec<Option<i64>>,
    clusters: Vec<ClusterColumn>,
}

impl Dataset {
    /// Load a dataset from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetLoadError> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path).map_err(|e| DatasetLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let dataset = Self::from_csv(reader)?;
        log::info!(
            "Loaded dataset {} ({} rows, {} cluster columns)",
            path.display(),
            dataset.len(),
            dataset.clusters.len()
        );
        Ok(dataset)
    }

    /// Load a dataset from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetLoadError> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetLoadError> {
        let headers = reader
            .headers()
            .map_err(|e| DatasetLoadError::Csv {
                line: 1,
                message: format!("Failed to read headers: {e}"),
            })?
            .clone();

        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h.trim() == required) {
                return Err(DatasetLoadError::MissingColumn(required.to_string()));
            }
        }

        let names: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
        let mut n_rows = 0;

        for result in reader.records() {
            let record = result.map_err(|e| DatasetLoadError::Csv {
                line: e.position().map_or(0, |p| p.line()),
                message: format!("Failed to read row: {e}"),
            })?;

            for (i, column) in cells.iter_mut().enumerate() {
                column.push(record.get(i).and_then(parse_number));
            }
            n_rows += 1;
        }

        let mut columns = Vec::new();
        let mut primary_use = Vec::new();
        let mut clusters = Vec::new();

        for (name, values) in names.into_iter().zip(cells) {
            if name == PRIMARY_USE_COLUMN {
                primary_use = values.into_iter().map(|v| v.and_then(to_code)).collect();
            } else if name.starts_with(CLUSTER_PREFIX) {
                let labels = values.into_iter().map(|v| v.and_then(to_code)).collect();
                clusters.push(ClusterColumn { name, labels });
            } else {
                columns.push(NumericColumn { name, values });
            }
        }

        let missing_use = primary_use.iter().filter(|c| c.is_none()).count();
        if missing_use > 0 {
            log::debug!("{} of {} rows have no primary use code", missing_use, n_rows);
        }

        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();

        Ok(Self {
            n_rows,
            columns,
            index,
            primary_use,
            clusters,
        })
    }

    /// Number of users (rows)
    pub fn len(&self) -> usize {
        self.n_rows
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Values of a numeric column by name
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.index
            .get(name)
            .map(|&i| self.columns[i].values.as_slice())
    }

    /// Names of the numeric columns, in file order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn screen_time(&self) -> &[Option<f64>] {
        self.column(SCREEN_TIME_COLUMN).unwrap_or_default()
    }

    pub fn data_usage(&self) -> &[Option<f64>] {
        self.column(DATA_USAGE_COLUMN).unwrap_or_default()
    }

    /// Primary-use codes; `None` where the cell was empty or not an integer
    pub fn primary_use(&self) -> &[Option<i64>] {
        &self.primary_use
    }

    pub fn cluster_columns(&self) -> &[ClusterColumn] {
        &self.clusters
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterColumn> {
        self.clusters.iter().find(|c| c.name == name)
    }

    pub fn has_clusters(&self) -> bool {
        !self.clusters.is_empty()
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer category code from a numeric cell (`3` and `3.0` both map to 3)
fn to_code(value: f64) -> Option<i64> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

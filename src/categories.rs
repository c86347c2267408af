//! Primary-use category table
//!
//! The classifier and the dataset's `Primary Use` column both carry integer
//! codes. This module owns the only mapping from those codes to labels. Two
//! table versions exist in deployed data: the full six-category table and a
//! legacy five-category table that predates "Communication". The version is
//! chosen once (see `DashboardConfig::category_table`) and the table is passed
//! to every view that decodes labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label rendered for codes the table does not know
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Primary phone use categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryUse {
    SocialMedia,
    Gaming,
    Streaming,
    Professional,
    Educational,
    Communication,
}

impl PrimaryUse {
    pub const ALL: [PrimaryUse; 6] = [
        PrimaryUse::SocialMedia,
        PrimaryUse::Gaming,
        PrimaryUse::Streaming,
        PrimaryUse::Professional,
        PrimaryUse::Educational,
        PrimaryUse::Communication,
    ];

    pub fn code(&self) -> i64 {
        match self {
            PrimaryUse::SocialMedia => 0,
            PrimaryUse::Gaming => 1,
            PrimaryUse::Streaming => 2,
            PrimaryUse::Professional => 3,
            PrimaryUse::Educational => 4,
            PrimaryUse::Communication => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrimaryUse::SocialMedia => "Social Media",
            PrimaryUse::Gaming => "Gaming",
            PrimaryUse::Streaming => "Streaming",
            PrimaryUse::Professional => "Professional",
            PrimaryUse::Educational => "Educational",
            PrimaryUse::Communication => "Communication",
        }
    }
}

impl fmt::Display for PrimaryUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category table versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryTableVersion {
    /// Six categories, codes 0-5
    #[default]
    Full,
    /// Five categories, codes 0-4 (no Communication)
    Legacy,
}

impl CategoryTableVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTableVersion::Full => "full",
            CategoryTableVersion::Legacy => "legacy",
        }
    }
}

impl FromStr for CategoryTableVersion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(CategoryTableVersion::Full),
            "legacy" => Ok(CategoryTableVersion::Legacy),
            other => Err(format!("unknown category table version: {other}")),
        }
    }
}

/// Code → label lookup for one table version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryTable {
    version: CategoryTableVersion,
}

impl CategoryTable {
    pub fn new(version: CategoryTableVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> CategoryTableVersion {
        self.version
    }

    /// Category for a code, if this table version defines it
    pub fn lookup(&self, code: i64) -> Option<PrimaryUse> {
        let category = PrimaryUse::ALL.into_iter().find(|c| c.code() == code)?;
        match (self.version, category) {
            (CategoryTableVersion::Legacy, PrimaryUse::Communication) => None,
            _ => Some(category),
        }
    }

    /// Decode a code to its label. Total: unknown codes yield `UNKNOWN_CATEGORY`.
    pub fn decode(&self, code: i64) -> &'static str {
        self.lookup(code)
            .map(|c| c.label())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Decode a code, rendering unknown codes as `Category {code}`
    pub fn decode_or_code(&self, code: i64) -> String {
        match self.lookup(code) {
            Some(c) => c.label().to_string(),
            None => format!("Category {code}"),
        }
    }

    /// All `(code, label)` entries in code order
    pub fn entries(&self) -> Vec<(i64, &'static str)> {
        PrimaryUse::ALL
            .into_iter()
            .filter_map(|c| self.lookup(c.code()))
            .map(|c| (c.code(), c.label()))
            .collect()
    }
}

/// Decode a label with the full category table
pub fn decode(code: i64) -> &'static str {
    CategoryTable::default().decode(code)
}

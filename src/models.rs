//! Core Data Models
//!
//! This module defines the data structures shared by the license calculation
//! pipeline, from raw tokenized rows to the final report.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`RawRow`] - One tokenized ledger line, header already stripped
//! 2. **Parsing**: [`Record`] - Immutable, typed view of a row
//! 3. **Keys**: [`IdentityKey`] for deduplication, [`DemandKey`] for demand tracking
//! 4. **Output**: [`AggregateSummary`] and [`LicenseReport`]
//!
//! ## Device Types
//!
//! Only desktops and laptops take part in the calculation. Any other value of
//! the computer type column, including a missing one, maps to
//! [`DeviceType::Other`] and is never counted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of columns in a well-formed ledger row.
pub const FIELD_COUNT: usize = 5;

/// A tokenized ledger row: `ComputerID, UserID, ApplicationID, ComputerType, Comment`.
pub type RawRow = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceType {
    Desktop,
    Laptop,
    Other,
}

impl DeviceType {
    /// Case-insensitive normalization of the raw computer type column.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("DESKTOP") {
            DeviceType::Desktop
        } else if raw.eq_ignore_ascii_case("LAPTOP") {
            DeviceType::Laptop
        } else {
            DeviceType::Other
        }
    }

    pub fn is_countable(self) -> bool {
        !matches!(self, DeviceType::Other)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Desktop => write!(f, "DESKTOP"),
            DeviceType::Laptop => write!(f, "LAPTOP"),
            DeviceType::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub device_id: String,
    pub user_id: String,
    pub app_id: String,
    pub device_type: DeviceType,
    pub comment: String,
}

impl Record {
    pub fn new(
        device_id: impl Into<String>,
        user_id: impl Into<String>,
        app_id: impl Into<String>,
        device_type: DeviceType,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            user_id: user_id.into(),
            app_id: app_id.into(),
            device_type,
            comment: comment.into(),
        }
    }

    /// Build a record from a tokenized row.
    ///
    /// A row with the wrong number of fields keeps whatever columns it has but
    /// is classified as [`DeviceType::Other`], so it can never be counted.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        let field = |idx: usize| {
            fields
                .get(idx)
                .map(|f| f.as_ref().to_string())
                .unwrap_or_default()
        };

        let device_type = if fields.len() == FIELD_COUNT {
            DeviceType::parse(fields[3].as_ref())
        } else {
            DeviceType::Other
        };

        Self {
            device_id: field(0),
            user_id: field(1),
            app_id: field(2),
            device_type,
            comment: field(4),
        }
    }
}

/// Which columns identify a duplicate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityStrategy {
    /// `(device_id, user_id, app_id)`: a shared computer counts once per user.
    #[default]
    Composite,
    /// `device_id` alone: a computer counts once, for whoever is seen first.
    Device,
}

impl IdentityStrategy {
    pub fn key_for(self, record: &Record) -> IdentityKey {
        match self {
            IdentityStrategy::Composite => IdentityKey::Composite {
                device_id: record.device_id.clone(),
                user_id: record.user_id.clone(),
                app_id: record.app_id.clone(),
            },
            IdentityStrategy::Device => IdentityKey::Device(record.device_id.clone()),
        }
    }
}

impl FromStr for IdentityStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "composite" => Ok(IdentityStrategy::Composite),
            "device" => Ok(IdentityStrategy::Device),
            other => Err(format!(
                "unknown identity strategy '{}', expected 'composite' or 'device'",
                other
            )),
        }
    }
}

impl fmt::Display for IdentityStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityStrategy::Composite => write!(f, "composite"),
            IdentityStrategy::Device => write!(f, "device"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Device(String),
    Composite {
        device_id: String,
        user_id: String,
        app_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DemandKey {
    pub user_id: String,
    pub app_id: String,
}

/// Point-in-time view of the aggregation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    pub total: u64,
    pub absorbed: u64,
    pub duplicates: u64,
    pub demand_keys: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LicenseReport {
    #[serde(rename = "applicationId")]
    pub application_id: String,
    #[serde(rename = "copiesRequired")]
    pub copies_required: u64,
    pub input: String,
    #[serde(rename = "rowsRead")]
    pub rows_read: usize,
    #[serde(rename = "recordsAbsorbed")]
    pub records_absorbed: u64,
    #[serde(rename = "duplicatesDropped")]
    pub duplicates_dropped: u64,
    #[serde(rename = "recordsSkipped")]
    pub records_skipped: u64,
    #[serde(rename = "demandKeys")]
    pub demand_keys: usize,
    pub workers: usize,
    pub partitions: usize,
    pub identity: IdentityStrategy,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

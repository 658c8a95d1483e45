//! In-memory district indicator table.
//!
//! The table is built once from CSV and then only ever shared behind an `Arc`; nothing in the
//! crate holds a mutable reference to it after loading. Reloads produce a new table which
//! [`TableStore`] swaps in as a whole.

mod loader;
mod store;

pub use store::TableStore;

use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// A single indicator cell as read from the source table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Invalid(String),
}

/// Failure to coerce a cell into a float.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("column '{column}' is missing")]
    Missing { column: String },
    #[error("column '{column}' holds non-numeric value '{raw}'")]
    NonNumeric { column: String, raw: String },
}

/// One row of the indicator table.
#[derive(Debug, Clone, Serialize)]
pub struct District {
    pub name: String,
    #[serde(skip)]
    pub(crate) indicators: HashMap<String, Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl District {
    /// Reads a column as a float.
    pub fn to_float(&self, column: &str) -> Result<f64, ConversionError> {
        match self.indicators.get(column) {
            Some(Cell::Number(value)) => Ok(*value),
            Some(Cell::Invalid(raw)) => Err(ConversionError::NonNumeric {
                column: column.to_string(),
                raw: raw.clone(),
            }),
            None => Err(ConversionError::Missing {
                column: column.to_string(),
            }),
        }
    }

    /// Like [`District::to_float`], with conversion failures collapsed to `NaN`.
    pub fn value_or_nan(&self, column: &str) -> f64 {
        self.to_float(column).unwrap_or(f64::NAN)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read indicator table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid indicator CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("indicator table has no 'district' column")]
    MissingDistrictColumn,
    #[error("district '{0}' appears more than once")]
    DuplicateDistrict(String),
    #[error("indicator table contains no districts")]
    Empty,
}

/// Immutable table of districts in source row order.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    districts: Vec<District>,
    columns: Vec<String>,
}

impl IndicatorTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let (columns, districts) = loader::parse_table(reader)?;
        Ok(Self { districts, columns })
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// Indicator column names in header order (coordinates and the key column excluded).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|existing| existing == column)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.districts.iter().position(|district| district.name == name)
    }

    pub fn district(&self, name: &str) -> Option<&District> {
        self.position(name).map(|index| &self.districts[index])
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

//! Tabular data loading with schema validation
//!
//! Reads the diabetes-style CSV consumed by the training routine: eight
//! numeric feature columns plus a binary `Diabetic` label. Column order in
//! the file does not matter; the loader locates columns by header name and
//! assembles features in the canonical [`FEATURE_COLUMNS`] order.

mod split;

pub use split::{split_indices, train_test_split, Split, DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION};

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};

/// Feature columns the training routine expects, in canonical order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "Pregnancies",
    "PlasmaGlucose",
    "DiastolicBloodPressure",
    "TricepsThickness",
    "SerumInsulin",
    "BMI",
    "DiabetesPedigree",
    "Age",
];

/// Binary label column
pub const LABEL_COLUMN: &str = "Diabetic";

/// Errors from data loading and splitting
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required columns in {path}: {columns:?}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("Non-numeric value '{value}' in column '{column}' at data row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Label '{value}' at data row {row} is not 0 or 1")]
    InvalidLabel { row: usize, value: String },

    #[error("No data rows in {path}")]
    Empty { path: PathBuf },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Test fraction must be in (0, 1), got {0}")]
    InvalidSplitFraction(f64),

    #[error("Too few rows to split: {0}")]
    TooFewRows(usize),
}

/// Result alias for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// A loaded table: feature matrix, label vector, and provenance
///
/// Rows preserve file order. Treated as read-only after loading; the split
/// copies rows out rather than mutating in place.
#[derive(Debug, Clone)]
pub struct TabularData {
    /// Feature matrix, columns in [`FEATURE_COLUMNS`] order
    pub features: Array2<f64>,
    /// Labels, 0.0 or 1.0
    pub labels: Array1<f64>,
    /// Path the table was loaded from
    pub source: PathBuf,
}

impl TabularData {
    /// Number of data rows
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Load a CSV table, validating the required schema
///
/// The file must have a header row naming all of [`FEATURE_COLUMNS`] and
/// [`LABEL_COLUMN`]. Extra columns are ignored.
///
/// # Example
///
/// ```no_run
/// let table = lanzar::data::load_table("data/diabetes.csv")?;
/// println!("{} rows", table.n_rows());
/// # Ok::<(), lanzar::data::DataError>(())
/// ```
pub fn load_table(path: impl AsRef<Path>) -> Result<TabularData> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let mut feature_idx = Vec::with_capacity(FEATURE_COLUMNS.len());
    let mut missing = Vec::new();
    for col in FEATURE_COLUMNS {
        match headers.iter().position(|h| h == col) {
            Some(i) => feature_idx.push(i),
            None => missing.push(col.to_string()),
        }
    }
    let label_idx = headers.iter().position(|h| h == LABEL_COLUMN);
    if label_idx.is_none() {
        missing.push(LABEL_COLUMN.to_string());
    }
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }
    let label_idx = label_idx.unwrap_or_default();

    let mut values = Vec::new();
    let mut labels = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row = i + 1;

        for (&idx, &col) in feature_idx.iter().zip(FEATURE_COLUMNS.iter()) {
            let raw = record.get(idx).unwrap_or("");
            let value: f64 = raw.parse().map_err(|_| DataError::InvalidValue {
                column: col.to_string(),
                row,
                value: raw.to_string(),
            })?;
            values.push(value);
        }

        let raw = record.get(label_idx).unwrap_or("");
        let label: f64 = raw.parse().map_err(|_| DataError::InvalidLabel {
            row,
            value: raw.to_string(),
        })?;
        if label != 0.0 && label != 1.0 {
            return Err(DataError::InvalidLabel {
                row,
                value: raw.to_string(),
            });
        }
        labels.push(label);
    }

    if labels.is_empty() {
        return Err(DataError::Empty {
            path: path.to_path_buf(),
        });
    }

    let n = labels.len();
    let features = Array2::from_shape_vec((n, FEATURE_COLUMNS.len()), values)?;
    Ok(TabularData {
        features,
        labels: Array1::from_vec(labels),
        source: path.to_path_buf(),
    })
}

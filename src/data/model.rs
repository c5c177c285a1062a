use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the element sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell mirroring common Pandas dtypes.
/// Distinct values are kept in `BTreeSet`s downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date string kept as text for simplicity.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
                Date(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numeric columns sort by value; ties keep integers first.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(std::cmp::Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(std::cmp::Ordering::Greater),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) | CellValue::Date(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Nulls render as empty text so detail views and CSV exports stay blank.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::String(s) | CellValue::Date(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Null => serializer.serialize_none(),
        }
    }
}

impl CellValue {
    /// Build a numeric cell, folding integral floats into `Integer`.
    ///
    /// Spreadsheet engines store every number as a float, so an element
    /// number of `7` arrives as `7.0`.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15 {
            CellValue::Integer(v as i64)
        } else if v.is_nan() {
            CellValue::Null
        } else {
            CellValue::Float(v)
        }
    }

    /// Try to interpret the value as an `f64` for range filtering.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one research element
// ---------------------------------------------------------------------------

/// A single research element (one row of the source sheet).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Position of the row in the loaded table; used as the selection id.
    pub id: usize,
    /// One value per table column, in header order.
    pub cells: Vec<CellValue>,
}

static NULL: CellValue = CellValue::Null;

impl Row {
    pub fn get(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed sheet with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct Table {
    /// All rows, in file order.
    pub rows: Vec<Row>,
    /// Column names in header order.
    pub columns: Vec<String>,
    /// For each column the sorted set of distinct non-null values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Table {
    /// Build a table from header names and raw cell rows.
    ///
    /// Rows are padded or truncated to the header width and numbered in
    /// the order given.
    pub fn from_rows(columns: Vec<String>, raw_rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = columns
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();

        let rows: Vec<Row> = raw_rows
            .into_iter()
            .enumerate()
            .map(|(id, mut cells)| {
                cells.resize(width, CellValue::Null);
                for (col, val) in columns.iter().zip(&cells) {
                    if !val.is_null() {
                        if let Some(set) = unique_values.get_mut(col) {
                            set.insert(val.clone());
                        }
                    }
                }
                Row { id, cells }
            })
            .collect();

        Table {
            rows,
            columns,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a row by its id.
    pub fn row(&self, id: usize) -> Option<&Row> {
        self.rows.get(id)
    }

    /// Whether every non-null value of the column is numeric.
    pub fn is_numeric_column(&self, name: &str) -> bool {
        match self.unique_values.get(name) {
            Some(vals) if !vals.is_empty() => vals.iter().all(|v| v.as_f64().is_some()),
            _ => false,
        }
    }

    /// Minimum and maximum of a numeric column, if it has values.
    pub fn numeric_extent(&self, name: &str) -> Option<(f64, f64)> {
        if !self.is_numeric_column(name) {
            return None;
        }
        let vals = self.unique_values.get(name)?;
        let min = vals.iter().filter_map(CellValue::as_f64).fold(f64::INFINITY, f64::min);
        let max = vals
            .iter()
            .filter_map(CellValue::as_f64)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Distinct display labels of a column, sorted, blanks dropped.
    pub fn distinct_labels(&self, name: &str) -> BTreeSet<String> {
        self.unique_values
            .get(name)
            .map(|vals| {
                vals.iter()
                    .filter(|v| !v.is_blank())
                    .map(|v| v.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

use std::collections::HashSet;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the element sheet from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, or `sheet`
/// * `.csv`     – header row followed by records
/// * `.json`    – `[{ "Element No": 1, "Element Name": "...", ... }, ...]`
/// * `.parquet` – one scalar column per sheet column
///
/// The first row is always the header. Fully blank rows are dropped.
pub fn load_file(path: &Path, sheet: Option<&str>) -> Result<Table, DataLoadError> {
    if !path.is_file() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, sheet)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::debug!(
        "parsed {} rows x {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Header / row helpers shared by every format
// ---------------------------------------------------------------------------

/// Validate header names: blanks get a positional name, duplicates are fatal.
fn header_names(path: &Path, raw: Vec<String>) -> Result<Vec<String>, DataLoadError> {
    if raw.is_empty() {
        return Err(DataLoadError::malformed(path, "missing header row"));
    }

    let mut seen = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let name = name.trim();
        let name = if name.is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.to_string()
        };
        if !seen.insert(name.clone()) {
            return Err(DataLoadError::malformed(
                path,
                format!("duplicate column '{name}' in header"),
            ));
        }
        names.push(name);
    }
    Ok(names)
}

fn push_row(rows: &mut Vec<Vec<CellValue>>, cells: Vec<CellValue>) {
    if !cells.iter().all(CellValue::is_blank) {
        rows.push(cells);
    }
}

// ---------------------------------------------------------------------------
// Workbook loader (Excel / OpenDocument)
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Table, DataLoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| DataLoadError::unreadable(path, e))?;

    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .map_err(|e| DataLoadError::unreadable(path, e))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataLoadError::malformed(path, "workbook has no worksheets"))?
            .map_err(|e| DataLoadError::unreadable(path, e))?,
    };

    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .ok_or_else(|| DataLoadError::malformed(path, "missing header row"))?;
    let columns = header_names(path, header.iter().map(|c| c.to_string()).collect())?;

    let mut rows = Vec::new();
    for row in rows_iter {
        push_row(&mut rows, row.iter().map(workbook_cell).collect());
    }

    Ok(Table::from_rows(columns, rows))
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::from_f64(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => {
                CellValue::Date(dt.format("%Y-%m-%d").to_string())
            }
            Some(dt) => CellValue::Date(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => CellValue::Null,
        },
        Data::DateTimeIso(s) => CellValue::Date(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one element per record.
fn load_csv(path: &Path) -> Result<Table, DataLoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataLoadError::unreadable(path, e))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let columns = header_names(path, headers)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        push_row(&mut rows, record.iter().map(guess_cell_type).collect());
    }

    Ok(Table::from_rows(columns, rows))
}

fn csv_error(path: &Path, err: csv::Error) -> DataLoadError {
    if let csv::ErrorKind::UnequalLengths { pos, expected_len, len } = err.kind() {
        let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
        return DataLoadError::malformed(
            path,
            format!("line {line}: expected {expected_len} fields, found {len}"),
        );
    }
    if matches!(err.kind(), csv::ErrorKind::Utf8 { .. }) {
        return DataLoadError::malformed(path, err.to_string());
    }
    DataLoadError::unreadable(path, err)
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::from_f64(f);
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Element No": 1, "Element Name": "Research Problem", "Category": "Theory" },
///   ...
/// ]
/// ```
///
/// Columns are the union of record keys in first-seen order.
fn load_json(path: &Path) -> Result<Table, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataLoadError::unreadable(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DataLoadError::malformed(path, e.to_string()))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::malformed(path, "expected top-level JSON array"))?;

    let mut keys: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataLoadError::malformed(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    let columns = header_names(path, keys.clone())?;

    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        let cells = keys
            .iter()
            .map(|k| rec.get(k).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        push_row(&mut rows, cells);
    }

    Ok(Table::from_rows(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.trim().is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::from_f64(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export of the element sheet.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Scalar columns keep their type; any
/// other Arrow type is rendered to text.
fn load_parquet(path: &Path) -> Result<Table, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|e| DataLoadError::unreadable(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| DataLoadError::unreadable(path, e))?;

    let field_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let columns = header_names(path, field_names)?;

    let reader = builder.build().map_err(|e| DataLoadError::unreadable(path, e))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DataLoadError::unreadable(path, e))?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| arrow_cell(col, row))
                .collect();
            push_row(&mut rows, cells);
        }
    }

    Ok(Table::from_rows(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let typed = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| text_cell(a.value(row))),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| text_cell(a.value(row))),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::from_f64(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::from_f64(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        DataType::Date32 => col
            .as_primitive_opt::<Date32Type>()
            .and_then(|a| a.value_as_date(row))
            .map(|d| CellValue::Date(d.format("%Y-%m-%d").to_string())),
        _ => None,
    };

    typed.unwrap_or_else(|| match array_value_to_string(col, row) {
        Ok(text) => text_cell(&text),
        Err(_) => CellValue::Null,
    })
}

fn text_cell(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}

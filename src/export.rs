use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::FilteredView;
use crate::data::model::{CellValue, Row};

pub const CSV_FILE_NAME: &str = "filtered_research_elements.csv";

/// Write the view as CSV: the table header, then one record per row.
/// Nulls become empty fields.
pub fn to_csv(view: &FilteredView<'_>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&view.table().columns)
        .context("writing CSV header")?;
    for row in view.rows() {
        writer
            .write_record(row.cells.iter().map(|c| c.to_string()))
            .with_context(|| format!("writing CSV row {}", row.id))?;
    }
    writer.into_inner().context("flushing CSV output")
}

/// JSON body of `GET /api/elements`.
#[derive(Debug, Serialize)]
pub struct ElementList<'a> {
    /// Rows in the whole table.
    pub total: usize,
    /// Rows matching the filters.
    pub shown: usize,
    pub columns: &'a [String],
    pub rows: Vec<ElementRecord<'a>>,
}

/// One row keyed by id, cells in column order.
#[derive(Debug, Serialize)]
pub struct ElementRecord<'a> {
    pub id: usize,
    pub cells: &'a [CellValue],
}

impl<'a> From<&'a Row> for ElementRecord<'a> {
    fn from(row: &'a Row) -> Self {
        Self {
            id: row.id,
            cells: &row.cells,
        }
    }
}

impl<'a> ElementList<'a> {
    pub fn new(view: &FilteredView<'a>) -> Self {
        Self {
            total: view.table().len(),
            shown: view.len(),
            columns: &view.table().columns,
            rows: view.rows().map(ElementRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{evaluate, FilterState, TextSearch};
    use crate::data::model::Table;

    fn table() -> Table {
        Table::from_rows(
            vec!["Element Name".into(), "Notes".into()],
            vec![
                vec![CellValue::String("Hydrogen".into()), CellValue::String("a, b".into())],
                vec![CellValue::String("Helium".into()), CellValue::Null],
            ],
        )
    }

    #[test]
    fn csv_contains_header_and_filtered_rows_only() {
        let table = table();
        let filter = FilterState {
            search: TextSearch::new("hydro", None),
            ..Default::default()
        };
        let bytes = to_csv(&evaluate(&table, &filter)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "Element Name,Notes\nHydrogen,\"a, b\"\n");
    }

    #[test]
    fn empty_view_still_writes_header() {
        let table = table();
        let filter = FilterState {
            search: TextSearch::new("zzz", None),
            ..Default::default()
        };
        let text = String::from_utf8(to_csv(&evaluate(&table, &filter)).unwrap()).unwrap();
        assert_eq!(text, "Element Name,Notes\n");
    }

    #[test]
    fn element_list_serializes_counts_and_nulls() {
        let table = table();
        let list = ElementList::new(&evaluate(&table, &FilterState::default()));
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["shown"], 2);
        assert_eq!(json["rows"][1]["id"], 1);
        assert!(json["rows"][1]["cells"][1].is_null());
    }
}

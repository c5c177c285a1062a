use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::{Config, FacetConfig};
use crate::data::filter::{evaluate, Facets, FilterState, FilteredView};
use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::schema::ElementSchema;
use crate::data::DataLoadError;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything derived once from the loaded sheet. Shared read-only by every
/// request, so cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Loaded>,
}

struct Loaded {
    table: Table,
    schema: ElementSchema,
    facets: Facets,
    /// Badge colours for the `Category` column, if the sheet has one.
    category_colors: Option<ColorMap>,
}

impl AppState {
    /// Load the configured sheet. Called once at startup; the table is never
    /// re-read or mutated afterwards.
    pub fn load(config: &Config) -> Result<Self, DataLoadError> {
        let table = load_file(&config.data_path, config.sheet.as_deref())?;
        log::info!(
            "Loaded {} elements with columns {:?} from {}",
            table.len(),
            table.columns,
            config.data_path.display()
        );
        Ok(Self::new(table, &config.facets))
    }

    /// Ingest an already parsed table and resolve its facets and colours.
    pub fn new(table: Table, facet_config: &FacetConfig) -> Self {
        let schema = ElementSchema::resolve(&table);
        let facets = Facets::resolve(&table, facet_config);
        let category_colors = schema.category.map(|i| {
            let column = &table.columns[i];
            ColorMap::new(column, &table.distinct_labels(column))
        });

        AppState {
            inner: Arc::new(Loaded {
                table,
                schema,
                facets,
                category_colors,
            }),
        }
    }

    pub fn table(&self) -> &Table {
        &self.inner.table
    }

    pub fn schema(&self) -> &ElementSchema {
        &self.inner.schema
    }

    pub fn facets(&self) -> &Facets {
        &self.inner.facets
    }

    pub fn category_colors(&self) -> Option<&ColorMap> {
        self.inner.category_colors.as_ref()
    }

    /// Run the filter evaluator against the shared table.
    pub fn filter(&self, filter: &FilterState) -> FilteredView<'_> {
        evaluate(&self.inner.table, filter)
    }
}

// ---------------------------------------------------------------------------
// Per-request page state
// ---------------------------------------------------------------------------

/// Results layout. Cards are the phone-friendly default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Cards,
    Table,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Cards => "cards",
            Layout::Table => "table",
        }
    }
}

pub const LAYOUT_KEY: &str = "view";
pub const ROW_KEY: &str = "row";

/// What one page render needs: filters, layout and the selected row.
///
/// Rebuilt from the query string on every request and dropped afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub filter: FilterState,
    pub layout: Layout,
    pub selected: Option<usize>,
}

impl PageRequest {
    pub fn from_query(facets: &Facets, pairs: &[(String, String)]) -> Self {
        let last = |key: &str| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.trim().to_string())
        };
        let layout = match last(LAYOUT_KEY).as_deref() {
            Some("table") => Layout::Table,
            _ => Layout::Cards,
        };
        let selected = last(ROW_KEY).and_then(|v| v.parse::<usize>().ok());

        PageRequest {
            filter: FilterState::from_query(facets, pairs),
            layout,
            selected,
        }
    }

    /// Query pairs reproducing this page, optionally with another selection.
    pub fn to_query(&self, facets: &Facets, selected: Option<usize>) -> Vec<(String, String)> {
        let mut pairs = self.filter.to_query(facets);
        if self.layout != Layout::default() {
            pairs.push((LAYOUT_KEY.to_string(), self.layout.as_str().to_string()));
        }
        if let Some(id) = selected {
            pairs.push((ROW_KEY.to_string(), id.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn state() -> AppState {
        let table = Table::from_rows(
            vec!["Element No".into(), "Element Name".into(), "Category".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::String("Hydrogen".into()), CellValue::String("X".into())],
                vec![CellValue::Integer(2), CellValue::String("Helium".into()), CellValue::String("Y".into())],
            ],
        );
        AppState::new(table, &FacetConfig::default())
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn resolves_schema_facets_and_colors_once() {
        let state = state();
        assert_eq!(state.facets().categories.len(), 1, "no Action column");
        assert!(state.facets().range.is_some());
        assert!(state.category_colors().is_some());
        assert_eq!(state.schema().name, Some(1));
        assert_eq!(state.filter(&FilterState::default()).len(), 2);
    }

    #[test]
    fn page_request_reads_layout_and_selection() {
        let state = state();
        let req = PageRequest::from_query(
            state.facets(),
            &pairs(&[("view", "table"), ("row", "1"), ("q", "he")]),
        );
        assert_eq!(req.layout, Layout::Table);
        assert_eq!(req.selected, Some(1));
        assert!(req.filter.search.is_some());

        let bad = PageRequest::from_query(state.facets(), &pairs(&[("view", "x"), ("row", "-3")]));
        assert_eq!(bad.layout, Layout::Cards);
        assert_eq!(bad.selected, None);
    }

    #[test]
    fn to_query_keeps_layout_and_replaces_selection() {
        let state = state();
        let req = PageRequest::from_query(state.facets(), &pairs(&[("view", "table"), ("row", "0")]));
        let query = req.to_query(state.facets(), Some(1));
        assert_eq!(query, pairs(&[("view", "table"), ("row", "1")]));
    }
}

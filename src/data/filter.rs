use std::collections::{BTreeMap, BTreeSet};

use super::model::{Row, Table};
use crate::config::FacetConfig;

// ---------------------------------------------------------------------------
// Facets: which columns the sidebar can filter on
// ---------------------------------------------------------------------------

/// A categorical column rendered as a checkbox group.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFacet {
    pub column: String,
    pub index: usize,
    /// Every distinct non-blank label, sorted.
    pub values: BTreeSet<String>,
}

/// A numeric column rendered as a min/max range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFacet {
    pub column: String,
    pub index: usize,
    pub min: f64,
    pub max: f64,
}

/// The designated filter columns, resolved against a loaded table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facets {
    pub categories: Vec<CategoryFacet>,
    pub range: Option<RangeFacet>,
    /// Columns searched by the text box; `None` means every column.
    pub search_columns: Option<Vec<usize>>,
}

impl Facets {
    /// Keep only the configured columns the table actually has.
    pub fn resolve(table: &Table, config: &FacetConfig) -> Self {
        let categories = config
            .categorical
            .iter()
            .filter_map(|col| {
                let index = table.column_index(col)?;
                Some(CategoryFacet {
                    column: col.clone(),
                    index,
                    values: table.distinct_labels(col),
                })
            })
            .collect();

        let range = config.range.as_ref().and_then(|col| {
            let index = table.column_index(col)?;
            let (min, max) = table.numeric_extent(col)?;
            Some(RangeFacet {
                column: col.clone(),
                index,
                min,
                max,
            })
        });

        let search_columns = config.searchable.as_ref().map(|cols| {
            cols.iter()
                .filter_map(|c| table.column_index(c))
                .collect::<Vec<_>>()
        });

        Facets {
            categories,
            range,
            search_columns,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: search text, selected values per column, numeric range
// ---------------------------------------------------------------------------

/// Case-insensitive substring search over a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearch {
    /// The text as typed, trimmed.
    pub text: String,
    needle: String,
    /// `None` searches every column.
    pub columns: Option<Vec<usize>>,
}

impl TextSearch {
    /// `None` for blank input, which means "no search".
    pub fn new(text: &str, columns: Option<Vec<usize>>) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(TextSearch {
            text: text.to_string(),
            needle: text.to_lowercase(),
            columns,
        })
    }

    pub fn matches(&self, row: &Row) -> bool {
        let hit = |i: usize| row.get(i).to_string().to_lowercase().contains(&self.needle);
        match &self.columns {
            Some(cols) => cols.iter().any(|&i| hit(i)),
            None => (0..row.cells.len()).any(hit),
        }
    }
}

/// Inclusive numeric bounds on one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub column: usize,
    pub lo: f64,
    pub hi: f64,
}

impl NumericRange {
    pub fn matches(&self, row: &Row) -> bool {
        row.get(self.column)
            .as_f64()
            .is_some_and(|v| v >= self.lo && v <= self.hi)
    }
}

/// The user's current selections. Absent predicates impose no constraint.
///
/// A categorical entry with an empty set is an explicit "nothing selected"
/// and matches no rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: Option<TextSearch>,
    /// column index → selected display labels.
    pub categories: BTreeMap<usize, BTreeSet<String>>,
    pub range: Option<NumericRange>,
}

/// Query key marking a submitted sidebar form, so that a facet with every
/// box unchecked still counts as an (empty) selection.
pub const SUBMITTED_KEY: &str = "filtered";
pub const SEARCH_KEY: &str = "q";
pub const RANGE_MIN_KEY: &str = "min";
pub const RANGE_MAX_KEY: &str = "max";

impl FilterState {
    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.categories.is_empty() && self.range.is_none()
    }

    /// Whether a single row passes every active predicate.
    pub fn matches(&self, row: &Row) -> bool {
        if let Some(range) = &self.range {
            if !range.matches(row) {
                return false;
            }
        }
        for (col, selected) in &self.categories {
            if !selected.contains(&row.get(*col).to_string()) {
                return false;
            }
        }
        match &self.search {
            Some(search) => search.matches(row),
            None => true,
        }
    }

    /// Build the state from decoded query-string pairs.
    ///
    /// Selecting every value of a facet, or a range covering the whole
    /// column, is the same as not filtering and is dropped. Unknown keys and
    /// unparsable bounds are ignored.
    pub fn from_query(facets: &Facets, pairs: &[(String, String)]) -> Self {
        let submitted = query_values(pairs, SUBMITTED_KEY).next().is_some();

        let search = query_values(pairs, SEARCH_KEY)
            .next()
            .and_then(|q| TextSearch::new(q, facets.search_columns.clone()));

        let mut categories = BTreeMap::new();
        for facet in &facets.categories {
            let selected: BTreeSet<String> = query_values(pairs, &facet.column)
                .map(str::to_string)
                .collect();
            if selected.is_empty() && !submitted {
                continue;
            }
            if !facet.values.is_empty() && facet.values.is_subset(&selected) {
                continue;
            }
            categories.insert(facet.index, selected);
        }

        let range = facets.range.as_ref().and_then(|facet| {
            let bound = |key| {
                query_values(pairs, key)
                    .next()
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            };
            let mut lo = bound(RANGE_MIN_KEY).unwrap_or(facet.min);
            let mut hi = bound(RANGE_MAX_KEY).unwrap_or(facet.max);
            if lo > hi {
                std::mem::swap(&mut lo, &mut hi);
            }
            if lo <= facet.min && hi >= facet.max {
                return None;
            }
            Some(NumericRange {
                column: facet.index,
                lo,
                hi,
            })
        });

        FilterState {
            search,
            categories,
            range,
        }
    }

    /// Render the state back into query pairs, for links that keep filters.
    pub fn to_query(&self, facets: &Facets) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push((SEARCH_KEY.to_string(), search.text.clone()));
        }
        if !self.categories.is_empty() {
            pairs.push((SUBMITTED_KEY.to_string(), "1".to_string()));
        }
        for facet in &facets.categories {
            let Some(selected) = self.categories.get(&facet.index) else {
                continue;
            };
            for value in selected {
                pairs.push((facet.column.clone(), value.clone()));
            }
        }
        if let Some(range) = &self.range {
            pairs.push((RANGE_MIN_KEY.to_string(), range.lo.to_string()));
            pairs.push((RANGE_MAX_KEY.to_string(), range.hi.to_string()));
        }
        pairs
    }

    /// Whether a facet value is checked. Inactive facets show everything checked.
    pub fn is_selected(&self, facet: &CategoryFacet, value: &str) -> bool {
        self.categories
            .get(&facet.index)
            .map_or(true, |selected| selected.contains(value))
    }
}

fn query_values<'a>(pairs: &'a [(String, String)], key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    pairs
        .iter()
        .filter(move |(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// FilteredView: the rows passing a FilterState, in table order
// ---------------------------------------------------------------------------

/// A borrowed subset of a [`Table`]. Never outlives the request that built it.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a Table,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Matching rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + '_ {
        self.indices.iter().map(|&i| &self.table.rows[i])
    }

    /// Resolve a selected row id. Ids that do not exist or are filtered out
    /// give `None` ("no selection").
    pub fn select(&self, id: usize) -> Option<&'a Row> {
        self.indices
            .binary_search(&id)
            .ok()
            .map(|_| &self.table.rows[id])
    }
}

/// Return the rows that pass all active filters, preserving table order.
pub fn evaluate<'a>(table: &'a Table, filter: &FilterState) -> FilteredView<'a> {
    let indices = if filter.is_empty() {
        (0..table.len()).collect()
    } else {
        table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| filter.matches(row))
            .map(|(i, _)| i)
            .collect()
    };
    FilteredView { table, indices }
}

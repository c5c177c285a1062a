use super::model::{CellValue, Row, Table};

// Header names of the research-element sheet.
pub const ELEMENT_NO: &str = "Element No";
pub const ELEMENT_NAME: &str = "Element Name";
pub const SYMBOL: &str = "Symbol";
pub const CATEGORY: &str = "Category";
pub const ACTION: &str = "Action";
pub const DEFINITION: &str = "Definition";
pub const DETAILED_EXPLANATION: &str = "Detailed Explanation";
pub const AMJ_REFERENCE: &str = "AMJ Article Reference";

/// Long-text sections shown inside a card / detail view, in display order.
pub const SECTIONS: [&str; 3] = [DEFINITION, DETAILED_EXPLANATION, AMJ_REFERENCE];

/// Column positions of the well-known element columns.
///
/// Any of them may be missing from a given sheet; the presenter falls back
/// to generic labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSchema {
    pub number: Option<usize>,
    pub name: Option<usize>,
    pub symbol: Option<usize>,
    pub category: Option<usize>,
    pub action: Option<usize>,
    /// `(header, column)` for each long-text section present in the sheet.
    pub sections: Vec<(&'static str, usize)>,
    /// Whether `Element No` holds only numbers.
    pub numeric_number: bool,
}

impl ElementSchema {
    pub fn resolve(table: &Table) -> Self {
        let number = table.column_index(ELEMENT_NO);
        ElementSchema {
            number,
            name: table.column_index(ELEMENT_NAME),
            symbol: table.column_index(SYMBOL),
            category: table.column_index(CATEGORY),
            action: table.column_index(ACTION),
            sections: SECTIONS
                .iter()
                .filter_map(|h| table.column_index(h).map(|i| (*h, i)))
                .collect(),
            numeric_number: number.is_some() && table.is_numeric_column(ELEMENT_NO),
        }
    }

    fn cell<'a>(&self, row: &'a Row, column: Option<usize>) -> Option<&'a CellValue> {
        column.map(|c| row.get(c)).filter(|v| !v.is_blank())
    }

    pub fn number<'a>(&self, row: &'a Row) -> Option<&'a CellValue> {
        self.cell(row, self.number)
    }

    pub fn symbol<'a>(&self, row: &'a Row) -> Option<&'a CellValue> {
        self.cell(row, self.symbol)
    }

    pub fn category<'a>(&self, row: &'a Row) -> Option<&'a CellValue> {
        self.cell(row, self.category)
    }

    pub fn action<'a>(&self, row: &'a Row) -> Option<&'a CellValue> {
        self.cell(row, self.action)
    }

    /// Element name, or `"Element"` when the sheet has no name column.
    pub fn name(&self, row: &Row) -> String {
        self.cell(row, self.name)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "Element".to_string())
    }

    /// `"<no> — <name> (<symbol>)"`, dropping the parts the row lacks.
    pub fn label(&self, row: &Row) -> String {
        let mut label = match self.number(row) {
            Some(no) => format!("{no} — {}", self.name(row)),
            None => self.name(row),
        };
        if let Some(symbol) = self.symbol(row) {
            label.push_str(&format!(" ({symbol})"));
        }
        label
    }

    /// `"<name> (<symbol>)"` for the detail heading.
    pub fn title(&self, row: &Row) -> String {
        match self.symbol(row) {
            Some(symbol) => format!("{} ({symbol})", self.name(row)),
            None => self.name(row),
        }
    }

    /// Sort key used by the card layout; rows without a number sort last.
    pub fn sort_key(&self, row: &Row) -> (bool, f64) {
        match self.number(row).and_then(CellValue::as_f64) {
            Some(n) => (false, n),
            None => (true, 0.0),
        }
    }
}

use std::fmt::Write;

use super::{escape, href, NO_RESULTS, NO_SELECTION};
use crate::data::filter::FilteredView;
use crate::data::model::Row;
use crate::state::{AppState, Layout, PageRequest};

// ---------------------------------------------------------------------------
// Results (central column)
// ---------------------------------------------------------------------------

/// Render the results for the requested layout.
pub fn results_section(state: &AppState, req: &PageRequest, view: &FilteredView<'_>) -> String {
    match req.layout {
        Layout::Cards => cards(state, req, view),
        Layout::Table => {
            let mut html = table_grid(state, req, view);
            html.push_str("<hr><h2>🔍 Element details</h2>");
            html.push_str(&detail_panel(state, req, view));
            html
        }
    }
}

fn no_results() -> String {
    format!(r#"<div class="info">{NO_RESULTS}</div>"#)
}

/// Tap-friendly expandable cards, sorted by element number when numeric.
pub fn cards(state: &AppState, req: &PageRequest, view: &FilteredView<'_>) -> String {
    let mut html = String::from("<h2>Results</h2>");
    if view.is_empty() {
        html.push_str(&no_results());
        return html;
    }

    let schema = state.schema();
    let mut rows: Vec<&Row> = view.rows().collect();
    if schema.numeric_number {
        rows.sort_by(|a, b| {
            let (a_missing, a_no) = schema.sort_key(a);
            let (b_missing, b_no) = schema.sort_key(b);
            a_missing.cmp(&b_missing).then(a_no.total_cmp(&b_no))
        });
    }

    for row in rows {
        let open = if req.selected == Some(row.id) { " open" } else { "" };
        let _ = write!(
            html,
            r#"<details class="card" id="row-{}"{open}><summary>{}</summary>"#,
            row.id,
            escape(&schema.label(row))
        );
        html.push_str(&meta_line(state, row));
        html.push_str(&sections(state, row));
        html.push_str("</details>");
    }
    html
}

/// `Category: … | Action: …`, omitting blank fields.
fn meta_line(state: &AppState, row: &Row) -> String {
    let schema = state.schema();
    let mut meta = Vec::new();
    if let Some(cat) = schema.category(row) {
        meta.push(format!("<strong>Category:</strong> {}", category_badge(state, &cat.to_string())));
    }
    if let Some(action) = schema.action(row) {
        meta.push(format!("<strong>Action:</strong> {}", escape(&action.to_string())));
    }
    if meta.is_empty() {
        return String::new();
    }
    format!(r#"<p class="meta">{}</p>"#, meta.join(" | "))
}

fn category_badge(state: &AppState, label: &str) -> String {
    match state.category_colors() {
        Some(colors) => format!(
            r#"<span class="badge" style="background:{}">{}</span>"#,
            colors.color_for(label),
            escape(label)
        ),
        None => escape(label),
    }
}

/// Definition / Detailed Explanation / AMJ Article Reference blocks.
fn sections(state: &AppState, row: &Row) -> String {
    let mut html = String::new();
    for (header, col) in &state.schema().sections {
        let value = row.get(*col);
        if value.is_blank() {
            continue;
        }
        let _ = write!(
            html,
            "<h4>{}</h4><p>{}</p>",
            escape(header),
            escape(&value.to_string())
        );
    }
    html
}

/// Every column in a scrollable grid; the first cell links to the detail panel.
pub fn table_grid(state: &AppState, req: &PageRequest, view: &FilteredView<'_>) -> String {
    let mut html = String::from("<h2>Table (desktop view)</h2>");
    if view.is_empty() {
        html.push_str(&no_results());
        return html;
    }

    let table = state.table();
    html.push_str(r#"<div class="grid-wrap"><table class="grid"><thead><tr><th></th>"#);
    for col in &table.columns {
        let _ = write!(html, "<th>{}</th>", escape(col));
    }
    html.push_str("</tr></thead><tbody>");

    for row in view.rows() {
        let class = if req.selected == Some(row.id) { r#" class="selected""# } else { "" };
        let link = href("/", &req.to_query(state.facets(), Some(row.id)));
        let _ = write!(html, r#"<tr{class}><td><a href="{link}#details">View</a></td>"#);
        for cell in &row.cells {
            let _ = write!(html, "<td>{}</td>", escape(&cell.to_string()));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}

/// The selected row's full attribute set, or the "no selection" prompt.
pub fn detail_panel(state: &AppState, req: &PageRequest, view: &FilteredView<'_>) -> String {
    if view.is_empty() {
        return no_results();
    }
    match req.selected.and_then(|id| view.select(id)) {
        Some(row) => detail(state, row),
        None => format!(r#"<div class="info" id="details">{NO_SELECTION}</div>"#),
    }
}

/// Heading, meta line, long-text sections, then every other column.
pub fn detail(state: &AppState, row: &Row) -> String {
    let schema = state.schema();
    let mut html = format!(
        r#"<section id="details"><h3>{}</h3>"#,
        escape(&schema.title(row))
    );
    html.push_str(&meta_line(state, row));
    html.push_str(&sections(state, row));

    let shown: Vec<usize> = [schema.name, schema.symbol, schema.category, schema.action]
        .into_iter()
        .flatten()
        .chain(schema.sections.iter().map(|(_, c)| *c))
        .collect();

    html.push_str("<dl>");
    for (i, col) in state.table().columns.iter().enumerate() {
        if shown.contains(&i) {
            continue;
        }
        let _ = write!(
            html,
            "<dt>{}</dt><dd>{}</dd>",
            escape(col),
            escape(&row.get(i).to_string())
        );
    }
    html.push_str("</dl></section>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FacetConfig;
    use crate::data::model::{CellValue, Table};

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn state() -> AppState {
        let table = Table::from_rows(
            vec![
                "Element No".into(),
                "Element Name".into(),
                "Symbol".into(),
                "Category".into(),
                "Definition".into(),
                "Source".into(),
            ],
            vec![
                vec![CellValue::Integer(2), s("Helium"), s("He"), s("Y"), s("Noble <gas>"), s("Lab")],
                vec![CellValue::Integer(1), s("Hydrogen"), s("H"), s("X"), CellValue::Null, s("Sun")],
            ],
        );
        AppState::new(table, &FacetConfig::default())
    }

    fn request(state: &AppState, query: &[(&str, &str)]) -> PageRequest {
        let pairs: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PageRequest::from_query(state.facets(), &pairs)
    }

    #[test]
    fn cards_sort_by_element_number() {
        let state = state();
        let req = PageRequest::default();
        let view = state.filter(&req.filter);
        let html = cards(&state, &req, &view);
        let hydrogen = html.find("1 — Hydrogen (H)").unwrap();
        let helium = html.find("2 — Helium (He)").unwrap();
        assert!(hydrogen < helium);
        assert!(html.contains("<h4>Definition</h4><p>Noble &lt;gas&gt;</p>"));
        assert_eq!(html.matches("<h4>Definition</h4>").count(), 1, "blank section skipped");
    }

    #[test]
    fn empty_view_shows_no_results_in_both_layouts() {
        let state = state();
        let req = request(&state, &[("Category", "X"), ("q", "heli")]);
        let view = state.filter(&req.filter);
        assert!(view.is_empty());
        assert!(cards(&state, &req, &view).contains(NO_RESULTS));
        assert!(table_grid(&state, &req, &view).contains(NO_RESULTS));
        assert!(detail_panel(&state, &req, &view).contains(NO_RESULTS));
    }

    #[test]
    fn unknown_selection_is_no_selection() {
        let state = state();
        let req = request(&state, &[("view", "table"), ("row", "42")]);
        let view = state.filter(&req.filter);
        assert!(detail_panel(&state, &req, &view).contains(NO_SELECTION));
    }

    #[test]
    fn filtered_out_selection_is_no_selection() {
        let state = state();
        let req = request(&state, &[("view", "table"), ("row", "0"), ("Category", "X")]);
        let view = state.filter(&req.filter);
        assert!(detail_panel(&state, &req, &view).contains(NO_SELECTION));
    }

    #[test]
    fn detail_shows_every_attribute() {
        let state = state();
        let req = request(&state, &[("view", "table"), ("row", "0")]);
        let view = state.filter(&req.filter);
        let html = detail_panel(&state, &req, &view);
        assert!(html.contains("<h3>Helium (He)</h3>"));
        assert!(html.contains("<strong>Category:</strong>"));
        assert!(html.contains("<dt>Element No</dt><dd>2</dd>"));
        assert!(html.contains("<dt>Source</dt><dd>Lab</dd>"));
        assert!(!html.contains("<dt>Element Name</dt>"), "already in heading");
    }

    #[test]
    fn grid_links_keep_filters_and_mark_selection() {
        let state = state();
        let req = request(&state, &[("view", "table"), ("row", "1"), ("q", "h")]);
        let view = state.filter(&req.filter);
        let html = table_grid(&state, &req, &view);
        assert!(html.contains(r#"href="/?q=h&amp;view=table&amp;row=0#details""#));
        assert!(html.contains(r#"<tr class="selected">"#));
        assert!(html.contains("<th>Source</th>"));
    }
}

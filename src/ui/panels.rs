use std::fmt::Write;

use super::{escape, fmt_num};
use crate::data::filter::{RANGE_MAX_KEY, RANGE_MIN_KEY, SEARCH_KEY, SUBMITTED_KEY};
use crate::state::{AppState, Layout, PageRequest, LAYOUT_KEY};

// ---------------------------------------------------------------------------
// Left side panel – view toggle and filter widgets
// ---------------------------------------------------------------------------

/// Render the sidebar form. Submitting it reloads the page with the new
/// selections in the query string.
pub fn side_panel(state: &AppState, req: &PageRequest) -> String {
    let mut html = String::new();
    html.push_str(r#"<aside class="sidebar"><form method="get" action="/">"#);
    let _ = write!(html, r#"<input type="hidden" name="{SUBMITTED_KEY}" value="1">"#);

    // ---- View ----
    html.push_str("<h2>View</h2>");
    let selected = |layout: Layout| if req.layout == layout { " selected" } else { "" };
    let _ = write!(
        html,
        r#"<select name="{LAYOUT_KEY}">
<option value="cards"{}>📱 Mobile mode (recommended)</option>
<option value="table"{}>🖥️ Table (desktop view)</option>
</select>"#,
        selected(Layout::Cards),
        selected(Layout::Table),
    );

    // ---- Search ----
    html.push_str("<h2>Filters</h2>");
    let search = req.filter.search.as_ref().map(|s| s.text.as_str()).unwrap_or("");
    let _ = write!(
        html,
        r#"<fieldset><legend>Search (any field)</legend>
<input type="text" name="{SEARCH_KEY}" value="{}" placeholder="e.g., RP, theory, sampling, integrity..."></fieldset>"#,
        escape(search)
    );

    // ---- Per-column checkbox groups ----
    for facet in &state.facets().categories {
        let n_total = facet.values.len();
        let n_selected = facet
            .values
            .iter()
            .filter(|v| req.filter.is_selected(facet, v))
            .count();
        let _ = write!(
            html,
            "<fieldset><legend>{} ({n_selected}/{n_total})</legend>",
            escape(&facet.column)
        );
        for value in &facet.values {
            let checked = if req.filter.is_selected(facet, value) { " checked" } else { "" };
            let _ = write!(
                html,
                r#"<label><input type="checkbox" name="{}" value="{}"{checked}> {}</label><br>"#,
                escape(&facet.column),
                escape(value),
                escape(value)
            );
        }
        html.push_str("</fieldset>");
    }

    // ---- Numeric range ----
    if let Some(facet) = &state.facets().range {
        let (lo, hi) = req
            .filter
            .range
            .map(|r| (r.lo, r.hi))
            .unwrap_or((facet.min, facet.max));
        let _ = write!(
            html,
            r#"<fieldset><legend>{col} range</legend>
<input type="number" name="{RANGE_MIN_KEY}" min="{min}" max="{max}" step="any" value="{lo}" aria-label="{col} minimum">
<input type="number" name="{RANGE_MAX_KEY}" min="{min}" max="{max}" step="any" value="{hi}" aria-label="{col} maximum">
</fieldset>"#,
            col = escape(&facet.column),
            min = fmt_num(facet.min),
            max = fmt_num(facet.max),
            lo = fmt_num(lo),
            hi = fmt_num(hi),
        );
    }

    html.push_str(r#"<button type="submit" class="btn">Apply</button> <a class="btn" href="/">Reset</a>"#);
    html.push_str("</form></aside>");
    html
}

//! HTML presenter: the whole page is re-rendered from scratch on every request.

pub mod panels;
pub mod results;

use url::form_urlencoded;

use crate::state::{AppState, PageRequest};

pub const TITLE: &str = "Research Elements Explorer";
pub const NO_RESULTS: &str = "No matching elements. Adjust filters or search.";
pub const NO_SELECTION: &str = "Select an element to see its details.";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Build an attribute-safe link from a path and query pairs.
pub fn href(path: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    escape(&format!("{path}?{query}"))
}

/// Numbers in inputs and labels: integral values without a fraction.
pub fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 9.0e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Render the complete page for one request.
pub fn render_page(state: &AppState, req: &PageRequest) -> String {
    let view = state.filter(&req.filter);
    log::debug!(
        "rendering {:?} layout: {} of {} rows match",
        req.layout,
        view.len(),
        state.table().len()
    );

    let sidebar = panels::side_panel(state, req);
    let results = results::results_section(state, req, &view);
    let download = href("/download.csv", &req.filter.to_query(state.facets()));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
<div class="layout">
{sidebar}
<main class="block-container">
    <h1>🧪 {title}</h1>
    <p class="caption">Search, filter, and open any element for details (mobile-friendly).</p>
    <p class="stats"><strong>Showing {shown} of {total} elements</strong></p>
    <a class="btn" href="{download}" download="filtered_research_elements.csv">⬇️ Download filtered results (CSV)</a>
    <hr>
{results}
</main>
</div>
</body>
</html>"#,
        title = TITLE,
        css = STYLE,
        shown = view.len(),
        total = state.table().len(),
    )
}

const STYLE: &str = r#"
body {font-family: system-ui, sans-serif; margin: 0; color: #262730;}
.layout {display: flex; flex-wrap: wrap;}
.sidebar {background: #f0f2f6; padding: 1rem; width: 260px; box-sizing: border-box;}
.sidebar fieldset {border: 0; padding: 0; margin: 0 0 1rem 0;}
.sidebar legend {font-weight: 700;}
.sidebar input[type=text], .sidebar input[type=number], .sidebar select {width: 100%; box-sizing: border-box;}
.block-container {flex: 1; padding: 1rem 1rem 2rem 1rem; max-width: 900px;}
h1 {font-size: 1.6rem;}
.caption {color: #6b6f76;}
.btn {display: inline-block; padding: .4rem .8rem; border: 1px solid #ccc; border-radius: 8px; text-decoration: none; color: inherit;}
details.card {border: 1px solid #ddd; border-radius: 12px; padding: .6rem .9rem; margin-bottom: .5rem;}
details.card summary {cursor: pointer; font-weight: 600;}
.badge {color: #fff; border-radius: 6px; padding: 0 .4rem;}
.info {background: #e8f0fe; border-radius: 8px; padding: .8rem;}
table.grid {border-collapse: collapse; width: 100%; font-size: .9rem;}
table.grid th, table.grid td {border-bottom: 1px solid #eee; padding: .3rem; text-align: left; vertical-align: top;}
tr.selected {background: #fff6d5;}
.grid-wrap {max-height: 520px; overflow: auto;}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"R&D"</b> 'x'"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt; &#39;x&#39;"
        );
    }

    #[test]
    fn href_encodes_and_escapes_query() {
        let pairs = vec![
            ("q".to_string(), "a b".to_string()),
            ("Element No".to_string(), "1".to_string()),
        ];
        assert_eq!(href("/", &pairs), "/?q=a+b&amp;Element+No=1");
        assert_eq!(href("/download.csv", &[]), "/download.csv");
    }

    #[test]
    fn formats_integral_numbers_without_fraction() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(2.5), "2.5");
    }
}

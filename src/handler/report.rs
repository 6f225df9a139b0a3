//! HTML fragment builder for the test report
//!
//! Everything coming from the request is passed through [`escape_html`];
//! labels and column headers are trusted markup.

use std::fmt::Write;

const TABLE_OPEN: &str = "<table class=\"table table-bordered table-striped bordered-table zebra-striped\" style=\"width:auto;\">\n";

/// Marker for a query that found no matches at all
pub const NIL: &str = "<i>nil</i>";

/// Escape text for safe inclusion in HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Incrementally built report
#[derive(Debug, Default)]
pub struct Report {
    html: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_html(self) -> String {
        self.html
    }

    pub fn open_summary(&mut self) {
        self.html.push_str(TABLE_OPEN);
        self.html.push_str("\t<tbody>\n");
    }

    /// Summary row whose value is shown as code
    pub fn code_row(&mut self, label: &str, value: &str) {
        self.row(label, &format!("<code>{}</code>", escape_html(value)));
    }

    /// Summary row whose value is trusted markup
    pub fn row(&mut self, label: &str, value_html: &str) {
        let _ = write!(
            self.html,
            "\t\t<tr>\n\t\t\t<td>{label}</td>\n\t\t\t<td>{value_html}</td>\n\t\t</tr>\n"
        );
    }

    pub fn close_table(&mut self) {
        self.html.push_str("\t</tbody>\n</table>\n");
    }

    pub fn warning(&mut self, message: &str) {
        let _ = write!(
            self.html,
            "<div class=\"alert alert-warning\">{}</div>",
            escape_html(message)
        );
    }

    pub fn open_results(&mut self, headers: &[&str]) {
        self.html.push_str(TABLE_OPEN);
        self.html.push_str("\t<thead>\n\t\t<tr>\n");
        for header in headers {
            let _ = writeln!(self.html, "\t\t\t<th>{header}</th>");
        }
        self.html.push_str("\t\t</tr>\n\t</thead>\n\t<tbody>\n");
    }

    /// One results row; cells are trusted markup
    pub fn result_row(&mut self, cells: &[String]) {
        self.html.push_str("\t\t<tr>\n");
        for (i, cell) in cells.iter().enumerate() {
            if i == 0 {
                let _ = writeln!(self.html, "\t\t\t<td style=\"text-align:center\">{cell}</td>");
            } else {
                let _ = writeln!(self.html, "\t\t\t<td>{cell}</td>");
            }
        }
        self.html.push_str("\t\t</tr>\n");
    }
}

/// `[<code>a</code>, <code>b</code>]`, or the nil marker for no matches
pub fn format_strings(items: &[&str]) -> String {
    if items.is_empty() {
        return NIL.to_string();
    }
    let joined = items
        .iter()
        .map(|item| format!("<code>{}</code>", escape_html(item)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

/// One `[i]: start, end` line per match
pub fn format_offsets(offsets: &[(usize, usize)]) -> String {
    if offsets.is_empty() {
        return NIL.to_string();
    }
    offsets
        .iter()
        .enumerate()
        .map(|(i, (start, end))| format!("[{i}]: {start}, {end}"))
        .collect::<Vec<_>>()
        .join("<br/>")
}

/// One `[i]: [whole, groups...]` line per match
pub fn format_submatches(submatches: &[Vec<&str>]) -> String {
    if submatches.is_empty() {
        return NIL.to_string();
    }
    let mut out = String::new();
    for (i, groups) in submatches.iter().enumerate() {
        let _ = write!(out, "[{i}]: {}<br/>", format_strings(groups));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&#34;x&#34; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain é"), "plain é");
    }

    #[test]
    fn test_format_strings() {
        assert_eq!(format_strings(&[]), NIL);
        assert_eq!(format_strings(&[""]), "[<code></code>]");
        assert_eq!(
            format_strings(&["a", "<b>"]),
            "[<code>a</code>, <code>&lt;b&gt;</code>]"
        );
    }

    #[test]
    fn test_format_offsets() {
        assert_eq!(format_offsets(&[]), NIL);
        assert_eq!(format_offsets(&[(0, 1), (2, 4)]), "[0]: 0, 1<br/>[1]: 2, 4");
    }

    #[test]
    fn test_format_submatches() {
        assert_eq!(format_submatches(&[]), NIL);
        assert_eq!(
            format_submatches(&[vec!["abc", "b"]]),
            "[0]: [<code>abc</code>, <code>b</code>]<br/>"
        );
    }

    #[test]
    fn test_summary_table() {
        let mut report = Report::new();
        report.open_summary();
        report.code_row("Regular Expression", "a<b");
        report.close_table();
        let html = report.into_html();
        assert!(html.starts_with("<table class="));
        assert!(html.contains("<td>Regular Expression</td>"));
        assert!(html.contains("<td><code>a&lt;b</code></td>"));
        assert!(html.ends_with("\t</tbody>\n</table>\n"));
    }

    #[test]
    fn test_results_table() {
        let mut report = Report::new();
        report.open_results(&["Test", "Target String"]);
        report.result_row(&["1".to_string(), "abc".to_string()]);
        report.close_table();
        let html = report.into_html();
        assert!(html.contains("<th>Test</th>"));
        assert!(html.contains("<td style=\"text-align:center\">1</td>"));
        assert!(html.contains("<td>abc</td>"));
    }
}

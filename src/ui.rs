//! Terminal output helpers.
//!
//! `Table` renders rows with box-drawing borders, shrinking the widest
//! column until the table fits the terminal.
//!
//! ```text
//!   ┌────────────┬──────────────────────┐
//!   │ Folder     │ Path                 │
//!   ├────────────┼──────────────────────┤
//!   │ build      │ build/Release        │
//!   └────────────┴──────────────────────┘
//! ```

use colored::*;

const MIN_COLUMN: usize = 8;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        let (_, term_width) = console::Term::stdout().size();
        for line in self.render(term_width as usize) {
            println!("{line}");
        }
    }

    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }

        let widths = self.column_widths(max_width);
        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {left}{}{right}", segments.join(mid))
        };
        let row_line = |cells: &[String], bold: bool| {
            let mut line = String::from("  │");
            for (cell, &width) in cells.iter().zip(&widths) {
                let text = console::truncate_str(&flatten(cell), width, "...").to_string();
                let pad = width.saturating_sub(console::measure_text_width(&text));
                let text = if bold { text.bold().to_string() } else { text };
                line.push_str(&format!(" {text}{} │", " ".repeat(pad)));
            }
            line
        };

        let mut lines = vec![border("┌", "┬", "┐"), row_line(&self.headers, true)];
        lines.push(border("├", "┼", "┤"));
        for row in &self.rows {
            lines.push(row_line(row, false));
        }
        lines.push(border("└", "┴", "┘"));
        lines
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| console::measure_text_width(h))
            .collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(console::measure_text_width(&flatten(cell)));
            }
        }

        let overhead = 3 + 3 * widths.len();
        let budget = max_width.saturating_sub(overhead);
        while widths.iter().sum::<usize>() > budget {
            let Some(widest) = widths
                .iter_mut()
                .filter(|w| **w > MIN_COLUMN)
                .max_by_key(|w| **w)
            else {
                break;
            };
            *widest -= 1;
        }
        widths
    }
}

fn flatten(s: &str) -> String {
    s.chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Folder", "Path"]);
        table.add_row(vec!["build".into(), "build/Release".into()]);
        table.add_row(vec!["ignored".into()]);

        let lines = table.render(120);
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("Folder"));
        assert!(lines[3].contains("build/Release"));
        assert!(lines[0].starts_with("  ┌"));
    }

    #[test]
    fn test_narrow_terminal_shrinks_widest_column() {
        let mut table = Table::new(&["Key", "Value"]);
        table.add_row(vec!["package".into(), "x".repeat(80)]);
        let widths = table.column_widths(40);
        assert_eq!(widths[0], 7);
        assert!(widths.iter().sum::<usize>() <= 40 - 9);
    }

    #[test]
    fn test_empty_headers_render_nothing() {
        assert!(Table::new(&[]).render(80).is_empty());
    }
}

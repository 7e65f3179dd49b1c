//! Terminal output helpers.
//!
//! The end-of-build summary is rendered as a box-drawn table that shrinks its
//! widest columns to fit the terminal.

use crate::build::BuildSummary;
use colored::*;
use console::{measure_text_width, truncate_str};

/// Columns are never shrunk below this many characters.
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

    /// Rows with the wrong number of cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(&single_line(cell)));
            }
        }

        // 2 indent + 1 left border, then " cell |" per column
        let overhead = 3 + 3 * widths.len();
        let available = max_width.saturating_sub(overhead);
        while widths.iter().sum::<usize>() > available {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= MIN_COLUMN {
                break;
            }
            widths[idx] -= 1;
        }
        widths
    }

    /// Render the table for a terminal `max_width` columns wide.
    pub fn render(&self, max_width: usize) -> String {
        if self.headers.is_empty() {
            return String::new();
        }
        let widths = self.column_widths(max_width);

        let border = |left: &str, mid: &str, right: &str| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}\n", left, inner.join(mid), right)
        };
        let line = |cells: &[String], bold: bool| {
            let mut s = String::from("  │");
            for (cell, &w) in cells.iter().zip(&widths) {
                let text = truncate_str(&single_line(cell), w, "...").to_string();
                let pad = w.saturating_sub(measure_text_width(&text));
                let text = if bold { text.bold().to_string() } else { text };
                s.push_str(&format!(" {}{} │", text, " ".repeat(pad)));
            }
            s.push('\n');
            s
        };

        let mut out = border("┌", "┬", "┐");
        out.push_str(&line(&self.headers, true));
        out.push_str(&border("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&line(row, false));
        }
        out.push_str(&border("└", "┴", "┘"));
        out
    }

    pub fn print(&self) {
        let (_, cols) = console::Term::stdout().size();
        print!("{}", self.render(cols as usize));
    }
}

fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

/// One row per produced artifact.
pub fn summary_table(summary: &BuildSummary) -> Table {
    let mut table = Table::new(&["Kind", "Artifact"]);
    for archive in &summary.archives {
        table.add_row(vec!["library".to_string(), archive.display().to_string()]);
    }
    for binary in &summary.binaries {
        table.add_row(vec!["executable".to_string(), binary.display().to_string()]);
    }
    for installed in &summary.installed {
        table.add_row(vec!["installed".to_string(), installed.display().to_string()]);
    }
    table
}

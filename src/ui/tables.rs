//! Fixed-width tables for list commands.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::styles;

const MAX_COLUMN_WIDTH: usize = 40;
const COLUMN_GAP: &str = "  ";

/// Renders `rows` under `headers`, padding by display width so wide
/// characters line up. Cells longer than the column cap end with `…`.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let header_cells: Vec<String> = headers.iter().map(|header| (*header).to_owned()).collect();
    let header_line = styles::header_style()
        .apply(join_row(&header_cells, &widths))
        .to_string();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header_line);
    lines.extend(rows.iter().map(|row| join_row(row, &widths)));
    lines
}

fn join_row(cells: &[String], widths: &[usize]) -> String {
    let rendered: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            pad(&truncate(cell, *width), *width)
        })
        .collect();

    rendered.join(COLUMN_GAP).trim_end().to_owned()
}

/// Cuts `text` to at most `width` display columns.
pub fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.width() <= width {
        return single_line;
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in single_line.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width - 1 {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

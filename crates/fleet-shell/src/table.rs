//! Bordered table rendering for the `list` command.
//!
//! ```text
//! +--------------------------------------------------------------+
//! | File Name          | Size               | Last Modified        |
//! +--------------------------------------------------------------+
//! | a.txt              | 11 bytes           | 2024-05-01T10:00:00Z |
//! +--------------------------------------------------------------+
//! ```
//!
//! Columns are padded to the widest cell plus one space, with a minimum
//! width. Widths are measured in terminal columns, so wide characters in
//! file names keep the borders aligned.

use std::io::{self, Write};

use fleet_core::FileDescriptor;
use unicode_width::UnicodeWidthStr;

const HEADERS: [&str; 3] = ["File Name", "Size", "Last Modified"];

/// Minimum width of a cell, including its leading `| `.
const MIN_CELL_WIDTH: usize = 20;

/// Writes the entries as a bordered table, preceded by a blank line.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn render<W: Write>(files: &[FileDescriptor], out: &mut W) -> io::Result<()> {
    let rows: Vec<[String; 3]> = files
        .iter()
        .map(|file| {
            [
                file.name.clone(),
                format!("{} bytes", file.size),
                file.modified_display(),
            ]
        })
        .collect();

    let mut widths = [0usize; 3];
    for (i, header) in HEADERS.iter().enumerate() {
        widths[i] = cell_width(header);
    }
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_width(cell));
        }
    }

    let line_width: usize = widths.iter().sum::<usize>() + 1;
    let border = format!("+{}+", "-".repeat(line_width.saturating_sub(2)));

    writeln!(out)?;
    writeln!(out, "{border}")?;
    write_row(out, &HEADERS, &widths)?;
    writeln!(out, "{border}")?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    writeln!(out, "{border}")?;
    Ok(())
}

/// Width of the cell holding `text`: `| `, the text, and one space of
/// padding, at least [`MIN_CELL_WIDTH`].
fn cell_width(text: &str) -> usize {
    (text.width() + 3).max(MIN_CELL_WIDTH)
}

fn write_row<W: Write, S: AsRef<str>>(
    out: &mut W,
    cells: &[S],
    widths: &[usize; 3],
) -> io::Result<()> {
    for (cell, width) in cells.iter().zip(widths) {
        let text = cell.as_ref();
        let pad = width.saturating_sub(text.width() + 2);
        write!(out, "| {text}{}", " ".repeat(pad))?;
    }
    writeln!(out, "|")
}

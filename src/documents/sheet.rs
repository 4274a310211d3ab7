// ABOUTME: Spreadsheet text extraction via calamine (xlsx, xlsm, xls, ods).
// ABOUTME: Each sheet becomes a [name] header followed by rows with cells joined by " | ".

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use tracing::warn;

use crate::error::{MeetingError, Result};

pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| MeetingError::parse("spreadsheet", e))?;

    let mut sections = Vec::new();
    for name in workbook.sheet_names().to_owned() {
        sections.push(sheet_section(&name, workbook.worksheet_range(&name)));
    }
    Ok(sections.join("\n\n"))
}

/// Render one sheet, or a placeholder under its header when it cannot be
/// read. Other sheets of the workbook are unaffected.
fn sheet_section<E: std::fmt::Display>(
    name: &str,
    range: std::result::Result<Range<Data>, E>,
) -> String {
    match range {
        Ok(range) => {
            let rows: Vec<Vec<String>> = range
                .rows()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();
            render_sheet(name, &rows)
        }
        Err(e) => {
            warn!(sheet = name, error = %e, "could not read sheet");
            format!("[{}]\n[failed to read sheet: {}]", name, e)
        }
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Render one sheet; rows whose cells are all empty are dropped.
pub fn render_sheet(name: &str, rows: &[Vec<String>]) -> String {
    let mut out = format!("[{}]", name);
    for row in rows {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        out.push('\n');
        out.push_str(&row.join(" | "));
    }
    out
}

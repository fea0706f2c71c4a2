// Result-set rendering.
//
// Plain mode is the console protocol: column names tab-joined, one
// tab-joined line per row. Pretty mode draws a grid for human operators.

use std::io::{self, Write};

use comfy_table::{Table, presets::UTF8_FULL};

use crate::gateway::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Plain,
    Pretty,
}

/// Writes the result set and returns the number of data rows written.
/// Summary lines (`total row(s): N`) are the caller's business.
pub fn write_result<W>(out: &mut W, result: &ResultSet, mode: RenderMode) -> io::Result<usize>
where
    W: Write + ?Sized,
{
    match mode {
        RenderMode::Plain => {
            writeln!(out, "{}", result.columns.join("\t"))?;
            for row in &result.rows {
                writeln!(out, "{}", row.join("\t"))?;
            }
        }
        RenderMode::Pretty => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(&result.columns);
            for row in &result.rows {
                table.add_row(row);
            }
            writeln!(out, "{table}")?;
        }
    }
    Ok(result.row_count())
}

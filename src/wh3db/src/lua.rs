//! Lua table-literal emission.
//!
//! Turns a parsed [`TableExport`] into the text of a Lua table. Rows
//! become entries keyed by 1-based index; cells become entries keyed by
//! position or, with column mapping, by column name. Strings are wrapped
//! in long brackets so Lua never has to unescape them.

use md5::{Digest, Md5};

use crate::schema::ValueKind;
use crate::tsv::TableExport;

/// Conversion options for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuaOptions {
    /// Key row entries by column name instead of 1-based position.
    pub map_columns: bool,
    /// Prefix the emitted literal with `return `.
    pub add_return: bool,
    /// Wrap rows in a `checksum`/`records` envelope with MD5 digests.
    pub checksum: bool,
}

/// Emit the Lua table literal for an exported table.
///
/// `kinds` carries the schema-resolved value kind per column; `None`
/// selects heuristic typing for every cell.
pub fn emit_table(export: &TableExport, kinds: Option<&[ValueKind]>, options: &LuaOptions) -> String {
    let records: Vec<String> = export
        .rows
        .iter()
        .map(|row| emit_row(row, &export.columns, kinds, options.map_columns))
        .collect();

    let mut table = if records.is_empty() {
        // Zero rows still produce a valid literal.
        String::from("{}")
    } else if options.checksum {
        emit_checksum_table(&records, &export.rows)
    } else {
        emit_plain_table(&records)
    };

    if options.add_return {
        table.insert_str(0, "return ");
    }

    table
}

fn emit_plain_table(records: &[String]) -> String {
    let entries: Vec<String> = records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("[{}] = {}", i + 1, record))
        .collect();

    format!("{{\n  {}\n}}", entries.join(",\n  "))
}

fn emit_checksum_table(records: &[String], rows: &[Vec<String>]) -> String {
    let entries: Vec<String> = records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("[{}] = {}", i + 1, record))
        .collect();

    let mut digests: Vec<String> = rows.iter().map(|row| row_digest(row)).collect();
    // Sorting makes the aggregate stable under row reordering.
    digests.sort();
    let checksum = hex::encode(Md5::digest(digests.concat()));

    format!(
        "{{\n  [\"checksum\"]=\"{}\",\n  [\"records\"]={{\n    {}\n  }}\n}}",
        checksum,
        entries.join(",\n    ")
    )
}

fn emit_row(
    row: &[String],
    columns: &[String],
    kinds: Option<&[ValueKind]>,
    map_columns: bool,
) -> String {
    let entries: Vec<String> = row
        .iter()
        .zip(columns)
        .enumerate()
        .map(|(i, (cell, column))| {
            let pos = i + 1;
            let key = if map_columns {
                format!("[\"{}\"]", column)
            } else {
                format!("[{}]", pos)
            };
            let value = format_value(cell, pos, kinds.map(|k| k[i]));
            format!("{}={}", key, value)
        })
        .collect();

    format!("{{{}}}", entries.join(","))
}

/// Format one cell according to its schema kind, or heuristically when
/// the schema gave no answer.
fn format_value(cell: &str, pos: usize, kind: Option<ValueKind>) -> String {
    match kind {
        Some(ValueKind::Boolean) => cell.to_string(),
        Some(ValueKind::Number) => shortest_number(cell),
        Some(ValueKind::Text) => long_bracket(cell),
        None => format_value_heuristic(cell, pos),
    }
}

/// Heuristic typing: the first column is the table key and always a
/// string; booleans and integers pass through bare; `d.d` decimals are
/// shortened; everything else is a string.
fn format_value_heuristic(cell: &str, pos: usize) -> String {
    if pos == 1 {
        return long_bracket(cell);
    }
    if cell == "true" || cell == "false" {
        return cell.to_string();
    }
    if is_integer(cell) {
        return cell.to_string();
    }
    if is_decimal(cell) {
        return shortest_number(cell);
    }
    long_bracket(cell)
}

fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    match s.split_once('.') {
        Some((int, frac)) => {
            is_integer(int) && !frac.is_empty() && frac.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Shortest numeric representation: drop a zero fraction entirely,
/// otherwise rely on the float round-trip formatting ("1.50" -> "1.5").
fn shortest_number(cell: &str) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    match cell.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT => format!("{}", f as i64),
        Ok(f) => format!("{}", f),
        // A schema-typed number cell that does not parse stays textual.
        Err(_) => long_bracket(cell),
    }
}

/// Wrap a value in Lua long brackets, raising the level until the
/// closing delimiter no longer occurs in the value.
fn long_bracket(value: &str) -> String {
    let mut level = 1;
    while value.contains(&format!("]{}]", "=".repeat(level))) {
        level += 1;
    }
    let eq = "=".repeat(level);
    format!("[{}[{}]{}]", eq, value, eq)
}

/// MD5 over the row's normalized, sorted cells. Numeric cells are
/// shortened first so "1.50" and "1.5" digest identically.
fn row_digest(row: &[String]) -> String {
    let mut cells: Vec<String> = row
        .iter()
        .map(|cell| {
            if is_decimal(cell) {
                shortest_number(cell)
            } else {
                cell.clone()
            }
        })
        .collect();
    cells.sort();

    hex::encode(Md5::digest(cells.concat()))
}

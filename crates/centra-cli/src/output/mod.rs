//! Output formatting for CLI commands.

use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

/// Output format selection.
#[derive(Clone, Copy)]
pub enum Format {
    Table,
    Json,
}

impl From<crate::OutputFormat> for Format {
    fn from(f: crate::OutputFormat) -> Self {
        match f {
            crate::OutputFormat::Table => Format::Table,
            crate::OutputFormat::Json => Format::Json,
        }
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(data: &T, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("{}", serde_json::to_string_pretty(data)?);
    }
    Ok(())
}

/// Create a styled table with consistent formatting.
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    table
}

/// Add a header row to a table.
pub fn add_header(table: &mut Table, headers: &[&str]) {
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
}

/// Print a key-value table (for summaries).
pub fn print_key_value_table(
    items: &[(&str, String)],
    format: Format,
    quiet: bool,
) -> anyhow::Result<()> {
    if quiet {
        return Ok(());
    }

    match format {
        Format::Json => {
            let map: serde_json::Map<String, serde_json::Value> = items
                .iter()
                .map(|(k, v)| ((*k).to_string(), serde_json::Value::from(v.as_str())))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Format::Table => {
            let mut table = create_table();
            add_header(&mut table, &["Property", "Value"]);
            for (key, value) in items {
                table.add_row(vec![Cell::new(key).fg(Color::Green), Cell::new(value)]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Print a ranking table: one row per entry, score right-aligned.
pub fn print_ranking(headers: &[&str], rows: &[(Vec<String>, f64)]) {
    let mut table = create_table();
    add_header(&mut table, headers);
    for (rank, (labels, score)) in rows.iter().enumerate() {
        let mut cells = vec![Cell::new(rank + 1)];
        cells.extend(labels.iter().map(Cell::new));
        cells.push(Cell::new(format!("{score:.6}")).set_alignment(CellAlignment::Right));
        table.add_row(cells);
    }
    println!("{table}");
}

/// Print a status message (respects quiet mode).
pub fn status(msg: &str, quiet: bool) {
    if !quiet {
        println!("{msg}");
    }
}

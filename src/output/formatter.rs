use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::error::Result;

/// Longest cell rendered in table mode before truncation
const MAX_CELL_WIDTH: usize = 40;

pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format an API result (document or projected field)
    pub fn format_value(&self, value: &Value) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Table => Ok(self.format_table(value)),
        }
    }

    fn format_table(&self, value: &Value) -> String {
        match value {
            Value::Array(items) => format_array_table(items),
            Value::Object(map) => format_object_table(map),
            Value::Null => format!("{}", "No data".yellow()),
            other => scalar_text(other),
        }
    }
}

/// One row per element; columns are the scalar fields in first-seen order
fn format_array_table(items: &[Value]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for item in items {
        if let Value::Object(map) = item {
            for (key, field) in map {
                if !is_nested(field) && !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
    }

    let mut table = Table::new();
    if columns.is_empty() {
        table.set_header(vec![Cell::new("Value").fg(Color::Cyan)]);
        for item in items {
            table.add_row(vec![Cell::new(truncate_string(&cell_text(item), MAX_CELL_WIDTH))]);
        }
    } else {
        table.set_header(
            columns
                .iter()
                .map(|c| Cell::new(c).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
        for item in items {
            let row = columns
                .iter()
                .map(|c| {
                    let text = item.get(*c).map(cell_text).unwrap_or_else(|| "-".to_string());
                    Cell::new(truncate_string(&text, MAX_CELL_WIDTH))
                })
                .collect::<Vec<_>>();
            table.add_row(row);
        }
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);

    format!(
        "\n{} Results: {}\n\n{}",
        "📊".cyan(),
        items.len().to_string().yellow(),
        table
    )
}

/// Field / value pairs for a single document
fn format_object_table(map: &Map<String, Value>) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Field").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Cyan),
    ]);
    for (key, value) in map {
        table.add_row(vec![
            Cell::new(key),
            Cell::new(truncate_string(&cell_text(value), MAX_CELL_WIDTH * 2)),
        ]);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.to_string()
}

fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) => match map.get("Href").and_then(Value::as_str) {
            Some(href) => href.to_string(),
            None => format!("{{{} fields}}", map.len()),
        },
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Truncate on a character boundary, marking the cut with an ellipsis
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

pub mod formatter;

pub use formatter::Formatter;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Format an API result based on the specified format
pub fn format_value(value: &Value, format: OutputFormat) -> Result<String> {
    let formatter = Formatter::new(format);
    formatter.format_value(value)
}

/// Print a result, or a notice when the fetch was suppressed
pub fn print_result(value: Option<Value>, format: OutputFormat) -> Result<()> {
    match value {
        Some(value) => println!("{}", format_value(&value, format)?),
        None => println!("No data returned (the request was suppressed; see the log)."),
    }
    Ok(())
}

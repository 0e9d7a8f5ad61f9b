use colored::*;
use serde_json::Value;

use crate::api::SwsClient;
use crate::cli::args::CoursesArgs;
use crate::cli::OutputFormat;
use crate::error::{Result, SwsError};
use crate::output;

/// Execute the course search
pub fn execute(client: &SwsClient, args: &CoursesArgs, format: OutputFormat) -> Result<()> {
    if args.page_size == 0 {
        return Err(SwsError::InvalidInput("--page-size must be positive".to_string()));
    }
    if matches!(args.future_terms, Some(n) if n > 2) {
        return Err(SwsError::InvalidInput(
            "--future-terms must be between 0 and 2".to_string(),
        ));
    }

    let query = args.to_query();

    if args.all {
        let courses = client.all_courses(&query)?;
        return output::print_result(courses.map(Value::Array), format);
    }

    output::print_result(client.courses(&query)?, format)?;

    if client.has_next() {
        eprintln!(
            "\n{} {}",
            "More results available:".yellow(),
            client.next_cursor()
        );
        eprintln!("Run again with --all to fetch every page.");
    }

    Ok(())
}

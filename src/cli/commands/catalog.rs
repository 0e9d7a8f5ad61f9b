use serde_json::Value;

use super::tier;
use crate::api::SwsClient;
use crate::cli::args::{CourseArgs, CurriculaArgs, SectionArgs, SectionsArgs, TermArgs, TermCommand};
use crate::cli::OutputFormat;
use crate::error::{Result, SwsError};
use crate::output;

pub fn campus(client: &SwsClient, format: OutputFormat) -> Result<()> {
    output::print_result(client.campus()?.map(Value::Object), format)
}

pub fn colleges(client: &SwsClient, campus: &str, format: OutputFormat) -> Result<()> {
    output::print_result(client.colleges(campus)?, format)
}

pub fn departments(client: &SwsClient, college: &str, format: OutputFormat) -> Result<()> {
    output::print_result(client.departments(college)?, format)
}

pub fn curricula(client: &SwsClient, args: &CurriculaArgs, format: OutputFormat) -> Result<()> {
    if args.future_terms > 2 {
        return Err(SwsError::InvalidInput(
            "--future-terms must be between 0 and 2".to_string(),
        ));
    }
    let result = client.curricula(args.year, &args.quarter, &args.department, args.future_terms)?;
    output::print_result(result, format)
}

pub fn course(client: &SwsClient, args: &CourseArgs, format: OutputFormat) -> Result<()> {
    let id = &args.id;
    let result = client.course(
        id.year,
        &id.quarter,
        &id.curriculum,
        id.number,
        tier(args.private),
    )?;
    output::print_result(result.map(Value::Object), format)
}

pub fn term(client: &SwsClient, args: &TermArgs, format: OutputFormat) -> Result<()> {
    let result = match &args.command {
        TermCommand::Current => client.term_current()?,
        TermCommand::Next => client.term_next()?,
        TermCommand::Previous => client.term_previous()?,
        TermCommand::Get {
            year,
            quarter,
            private,
        } => client.term(*year, quarter, tier(*private))?,
    };
    output::print_result(result.map(Value::Object), format)
}

pub fn sections(client: &SwsClient, args: &SectionsArgs, format: OutputFormat) -> Result<()> {
    if args.curriculum.is_empty() && args.instructor.is_empty() {
        return Err(SwsError::InvalidInput(
            "Either --curriculum or --instructor is required".to_string(),
        ));
    }
    if !args.instructor.is_empty() && args.quarter.is_empty() {
        return Err(SwsError::InvalidInput(
            "--quarter is required when searching by instructor".to_string(),
        ));
    }
    let result = client.sections(&args.to_query(), tier(args.private))?;
    output::print_result(result, format)
}

pub fn section(client: &SwsClient, args: &SectionArgs, format: OutputFormat) -> Result<()> {
    let id = &args.id;
    let result = client.section(
        id.year,
        &id.quarter,
        &id.curriculum,
        id.number,
        &args.section_id,
        tier(args.private),
    )?;
    output::print_result(result.map(Value::Object), format)
}

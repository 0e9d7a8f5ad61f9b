//! Commands backed by the authenticated tier. All of them need `--cert` and `--key`.

use serde_json::Value;

use crate::api::SwsClient;
use crate::cli::args::{
    ChangeOfMajorArgs, EnrollmentArgs, EnrollmentsArgs, PersonArgs, RegistrationArgs,
    RegistrationsArgs, SectionStatusArgs, TestScoreArgs,
};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output;

pub fn person(client: &SwsClient, args: &PersonArgs, format: OutputFormat) -> Result<()> {
    let result = match args.by {
        Some(kind) => client.people(kind.into(), &args.id)?,
        None => client.person(&args.id)?,
    };
    output::print_result(result.map(Value::Object), format)
}

pub fn enrollment(client: &SwsClient, args: &EnrollmentArgs, format: OutputFormat) -> Result<()> {
    let result = client.enrollment(args.year, &args.quarter, &args.regid, args.detailed)?;
    output::print_result(result.map(Value::Object), format)
}

pub fn enrollments(client: &SwsClient, args: &EnrollmentsArgs, format: OutputFormat) -> Result<()> {
    output::print_result(client.enrollments(&args.regid, args.detailed)?, format)
}

pub fn section_status(
    client: &SwsClient,
    args: &SectionStatusArgs,
    format: OutputFormat,
) -> Result<()> {
    let id = &args.id;
    let result = client.section_status(
        id.year,
        &id.quarter,
        &id.curriculum,
        id.number,
        &args.section_id,
    )?;
    output::print_result(result.map(Value::Object), format)
}

pub fn registration(client: &SwsClient, args: &RegistrationArgs, format: OutputFormat) -> Result<()> {
    let id = &args.id;
    let result = client.registration(
        id.year,
        &id.quarter,
        &id.curriculum,
        id.number,
        &args.section_id,
        &args.regid,
        &args.dup_code,
    )?;
    output::print_result(result.map(Value::Object), format)
}

pub fn registrations(
    client: &SwsClient,
    args: &RegistrationsArgs,
    format: OutputFormat,
) -> Result<()> {
    output::print_result(client.registrations(&args.to_query())?, format)
}

pub fn test_score(client: &SwsClient, args: &TestScoreArgs, format: OutputFormat) -> Result<()> {
    let result = match &args.kind {
        Some(kind) => client.test_score(kind, &args.regid)?,
        None => client.tests(&args.regid)?,
    };
    output::print_result(result.map(Value::Object), format)
}

pub fn notice(client: &SwsClient, regid: &str, format: OutputFormat) -> Result<()> {
    output::print_result(client.notice(regid)?.map(Value::Object), format)
}

pub fn change_of_major(
    client: &SwsClient,
    args: &ChangeOfMajorArgs,
    format: OutputFormat,
) -> Result<()> {
    let result = client.change_of_major(args.year, &args.quarter, &args.regid)?;
    output::print_result(result.map(Value::Object), format)
}

pub fn finance(client: &SwsClient, regid: &str, format: OutputFormat) -> Result<()> {
    output::print_result(client.finance(regid)?.map(Value::Object), format)
}

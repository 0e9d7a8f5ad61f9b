//! Registrar resources: campuses, curricula, courses, sections, terms and,
//! on the private tier, people, enrollments and registrations.
//!
//! Each method builds a [`Request`], runs it through [`SwsClient::fetch`] and
//! either returns the document or projects the named field out of it. `None`
//! means the fetch was suppressed; a missing field comes back as `Value::Null`.

use std::fmt;

use serde_json::Value;

use super::client::SwsClient;
use super::endpoint::Tier;
use super::request::{encode_param, Request};
use super::Document;
use crate::error::Result;

/// Section search parameters. Either `curriculum` or `instructor` is required by the API.
#[derive(Debug, Clone, Default)]
pub struct SectionQuery {
    pub year: u32,
    /// Empty for all quarters; required when searching by instructor
    pub quarter: String,
    pub curriculum: String,
    /// Instructor reg id
    pub instructor: String,
    pub course_number: Option<u32>,
    pub future_terms: u32,
    pub delete_flag: String,
}

/// Course search parameters
#[derive(Debug, Clone)]
pub struct CourseQuery {
    pub year: u32,
    pub quarter: String,
    pub curriculum: String,
    pub course_number: Option<u32>,
    pub exclude_courses_without_sections: bool,
    pub page_size: u32,
    pub page_start: Option<u32>,
    /// 0-2; must be unset when excluding courses without sections
    pub future_terms: Option<u32>,
}

impl Default for CourseQuery {
    fn default() -> Self {
        Self {
            year: 0,
            quarter: String::new(),
            curriculum: String::new(),
            course_number: None,
            exclude_courses_without_sections: false,
            page_size: 100,
            page_start: None,
            future_terms: None,
        }
    }
}

/// Registration search parameters (only current terms are searchable)
#[derive(Debug, Clone, Default)]
pub struct RegistrationQuery {
    pub year: u32,
    pub quarter: String,
    pub curriculum: String,
    pub course_number: Option<u32>,
    pub section_id: String,
    pub reg_id: String,
    pub active_only: bool,
    pub instructor_reg_id: String,
}

/// Identifier kinds accepted by the person search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonIdKind {
    RegId,
    NetId,
    StudentNumber,
    EmployeeId,
}

impl PersonIdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegId => "reg_id",
            Self::NetId => "net_id",
            Self::StudentNumber => "student_number",
            Self::EmployeeId => "employee_id",
        }
    }
}

impl fmt::Display for PersonIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkbox-style flag: the API expects `on` or nothing
fn flag(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        ""
    }
}

fn project(document: Option<Document>, key: &str) -> Option<Value> {
    document.map(|mut doc| doc.remove(key).unwrap_or(Value::Null))
}

/// `year,quarter,curriculum,...` path component
fn resource_id(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| encode_param(part))
        .collect::<Vec<_>>()
        .join(",")
}

impl SwsClient {
    // Public tier

    pub fn campus(&self) -> Result<Option<Document>> {
        self.fetch(&Request::public("campus.json"))
    }

    pub fn colleges(&self, campus: &str) -> Result<Option<Value>> {
        let request = Request::public("college.json").param("campus_short_name", campus);
        Ok(project(self.fetch(&request)?, "Colleges"))
    }

    pub fn departments(&self, college: &str) -> Result<Option<Value>> {
        let request = Request::public("department.json").param("college_abbreviation", college);
        Ok(project(self.fetch(&request)?, "Departments"))
    }

    pub fn curricula(
        &self,
        year: u32,
        quarter: &str,
        department: &str,
        future_terms: u32,
    ) -> Result<Option<Value>> {
        let request = Request::public("curriculum.json")
            .param("year", year)
            .param("quarter", quarter)
            .param("future_terms", future_terms)
            .param("department_abbreviation", department);
        Ok(project(self.fetch(&request)?, "Curricula"))
    }

    pub fn course(
        &self,
        year: u32,
        quarter: &str,
        curriculum: &str,
        number: u32,
        tier: Tier,
    ) -> Result<Option<Document>> {
        let (year, number) = (year.to_string(), number.to_string());
        let id = resource_id(&[year.as_str(), quarter, curriculum, number.as_str()]);
        self.fetch(&Request::new(tier, format!("course/{}.json", id)))
    }

    pub fn term(&self, year: u32, quarter: &str, tier: Tier) -> Result<Option<Document>> {
        let year = year.to_string();
        let id = resource_id(&[year.as_str(), quarter]);
        self.fetch(&Request::new(tier, format!("term/{}.json", id)))
    }

    pub fn term_current(&self) -> Result<Option<Document>> {
        self.fetch(&Request::public("term/current.json"))
    }

    pub fn term_next(&self) -> Result<Option<Document>> {
        self.fetch(&Request::public("term/next.json"))
    }

    pub fn term_previous(&self) -> Result<Option<Document>> {
        self.fetch(&Request::public("term/previous.json"))
    }

    pub fn sections(&self, query: &SectionQuery, tier: Tier) -> Result<Option<Value>> {
        let request = Request::new(tier, "section.json")
            .param("year", query.year)
            .param("quarter", &query.quarter)
            .param("curriculum_abbreviation", &query.curriculum)
            .param("future_terms", query.future_terms)
            .opt_param("course_number", query.course_number)
            .param("reg_id", &query.instructor)
            .param("delete_flag", &query.delete_flag);
        Ok(project(self.fetch(&request)?, "Sections"))
    }

    /// One page of courses. Use [`SwsClient::next_courses`] for the following pages.
    pub fn courses(&self, query: &CourseQuery) -> Result<Option<Value>> {
        Ok(project(self.fetch(&Self::courses_request(query))?, "Courses"))
    }

    /// The page after the last course search, `None` when there is none
    pub fn next_courses(&self) -> Result<Option<Value>> {
        Ok(project(self.fetch_next()?, "Courses"))
    }

    /// Every page of a course search
    pub fn all_courses(&self, query: &CourseQuery) -> Result<Option<Vec<Value>>> {
        self.fetch_all_pages(&Self::courses_request(query), "Courses")
    }

    fn courses_request(query: &CourseQuery) -> Request {
        Request::public("course.json")
            .param("year", query.year)
            .param("quarter", &query.quarter)
            .param("curriculum_abbreviation", &query.curriculum)
            .opt_param("course_number", query.course_number)
            .param("page_size", query.page_size)
            .opt_param("page_start", query.page_start)
            .param(
                "exclude_courses_without_sections",
                flag(query.exclude_courses_without_sections),
            )
            .opt_param("future_terms", query.future_terms)
    }

    pub fn section(
        &self,
        year: u32,
        quarter: &str,
        curriculum: &str,
        number: u32,
        section_id: &str,
        tier: Tier,
    ) -> Result<Option<Document>> {
        let (year, number) = (year.to_string(), number.to_string());
        let id = resource_id(&[year.as_str(), quarter, curriculum, number.as_str()]);
        let path = format!("course/{}/{}.json", id, encode_param(section_id));
        self.fetch(&Request::new(tier, path))
    }

    // Private tier

    pub fn test_score(&self, kind: &str, regid: &str) -> Result<Option<Document>> {
        let path = format!("testscore/{}.json", resource_id(&[kind, regid]));
        self.fetch(&Request::private(path))
    }

    pub fn tests(&self, regid: &str) -> Result<Option<Document>> {
        let path = format!("testscore/{}.json", encode_param(regid));
        self.fetch(&Request::private(path))
    }

    pub fn enrollment(
        &self,
        year: u32,
        quarter: &str,
        regid: &str,
        verbose: bool,
    ) -> Result<Option<Document>> {
        let year = year.to_string();
        let id = resource_id(&[year.as_str(), quarter, regid]);
        let request = Request::private(format!("enrollment/{}.json", id)).param("verbose", flag(verbose));
        self.fetch(&request)
    }

    /// Enrollment links, or full enrollments when `verbose`
    pub fn enrollments(&self, regid: &str, verbose: bool) -> Result<Option<Value>> {
        let request = Request::private("enrollment.json")
            .param("reg_id", regid)
            .param("verbose", flag(verbose));
        let key = if verbose { "Enrollments" } else { "EnrollmentLinks" };
        Ok(project(self.fetch(&request)?, key))
    }

    pub fn section_status(
        &self,
        year: u32,
        quarter: &str,
        curriculum: &str,
        number: u32,
        section_id: &str,
    ) -> Result<Option<Document>> {
        let (year, number) = (year.to_string(), number.to_string());
        let id = resource_id(&[year.as_str(), quarter, curriculum, number.as_str()]);
        let path = format!("course/{}/{}/status.json", id, encode_param(section_id));
        self.fetch(&Request::private(path))
    }

    pub fn person(&self, regid: &str) -> Result<Option<Document>> {
        self.fetch(&Request::private(format!("person/{}.json", encode_param(regid))))
    }

    pub fn people(&self, kind: PersonIdKind, id: &str) -> Result<Option<Document>> {
        self.fetch(&Request::private("person.json").param(kind.as_str(), id))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn registration(
        &self,
        year: u32,
        quarter: &str,
        curriculum: &str,
        number: u32,
        section_id: &str,
        regid: &str,
        dup_code: &str,
    ) -> Result<Option<Document>> {
        let (year, number) = (year.to_string(), number.to_string());
        let id = resource_id(&[
            year.as_str(),
            quarter,
            curriculum,
            number.as_str(),
            section_id,
            regid,
            dup_code,
        ]);
        self.fetch(&Request::private(format!("registration/{}.json", id)))
    }

    pub fn registrations(&self, query: &RegistrationQuery) -> Result<Option<Value>> {
        let request = Request::private("registration.json")
            .param("year", query.year)
            .param("quarter", &query.quarter)
            .param("curriculum_abbreviation", &query.curriculum)
            .opt_param("course_number", query.course_number)
            .param("section_id", &query.section_id)
            .param("reg_id", &query.reg_id)
            .param("is_active", flag(query.active_only))
            .param("instructor_reg_id", &query.instructor_reg_id);
        Ok(project(self.fetch(&request)?, "Registrations"))
    }

    pub fn notice(&self, regid: &str) -> Result<Option<Document>> {
        self.fetch(&Request::private(format!("notice/{}.json", encode_param(regid))))
    }

    pub fn change_of_major(&self, year: u32, quarter: &str, regid: &str) -> Result<Option<Document>> {
        let year = year.to_string();
        let id = resource_id(&[year.as_str(), quarter, regid]);
        self.fetch(&Request::private(format!("enrollment/{}/major.json", id)))
    }

    pub fn finance(&self, regid: &str) -> Result<Option<Document>> {
        self.fetch(&Request::private(format!("person/{}/financial.json", encode_param(regid))))
    }
}

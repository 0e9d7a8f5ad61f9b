use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::api::{CourseQuery, PersonIdKind, RegistrationQuery, SectionQuery};
use crate::config::ClientConfig;

mod cache;
pub use cache::{CacheArgs, CacheCommand};

/// Per-invocation overrides of the stored configuration
#[derive(Args, Debug, Default, Clone)]
pub struct ClientOverrides {
    /// Bypass the response cache for this run
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Cache directory
    #[arg(long, global = true, env = "SWS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// PEM client certificate for private resources
    #[arg(long, global = true, env = "SWS_CERT", requires = "key")]
    pub cert: Option<PathBuf>,

    /// PEM private key for private resources
    #[arg(long, global = true, env = "SWS_KEY", requires = "cert")]
    pub key: Option<PathBuf>,

    /// Service root (ends with the API version, e.g. .../student/v5/)
    #[arg(long, global = true, env = "SWS_BASE_URL")]
    pub base_url: Option<String>,

    /// Log a 404 and print nothing instead of failing
    #[arg(long, global = true)]
    pub tolerate_404: bool,

    /// Fail on 401 and known course-title server errors instead of logging them
    #[arg(long, global = true)]
    pub strict_hepps: bool,
}

impl ClientOverrides {
    /// Layer the command-line flags over `config`
    pub fn apply(&self, config: &mut ClientConfig) {
        if self.no_cache {
            config.use_cache = false;
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let (Some(cert), Some(key)) = (&self.cert, &self.key) {
            config.cert_path = Some(cert.clone());
            config.key_path = Some(key.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if self.tolerate_404 {
            config.throw_404 = false;
        }
        if self.strict_hepps {
            config.throw_hepps = true;
        }
    }
}

/// Course identity shared by course and section commands
#[derive(Args, Debug, Clone)]
pub struct CourseId {
    pub year: u32,
    /// winter, spring, summer or autumn
    pub quarter: String,
    /// Curriculum abbreviation (e.g. CSE)
    pub curriculum: String,
    pub number: u32,
}

#[derive(Args, Debug)]
pub struct CurriculaArgs {
    pub year: u32,
    pub quarter: String,

    /// Department abbreviation
    #[arg(short, long, default_value = "")]
    pub department: String,

    /// Additional terms to include (0-2)
    #[arg(long, default_value = "0")]
    pub future_terms: u32,
}

#[derive(Args, Debug)]
pub struct CourseArgs {
    #[command(flatten)]
    pub id: CourseId,

    /// Query the authenticated tier
    #[arg(long)]
    pub private: bool,
}

#[derive(Args, Debug)]
pub struct TermArgs {
    #[command(subcommand)]
    pub command: TermCommand,
}

#[derive(Subcommand, Debug)]
pub enum TermCommand {
    /// The current term
    Current,
    /// The term after the current one
    Next,
    /// The term before the current one
    Previous,
    /// A specific term
    Get {
        year: u32,
        quarter: String,

        /// Query the authenticated tier
        #[arg(long)]
        private: bool,
    },
}

#[derive(Args, Debug)]
pub struct SectionsArgs {
    pub year: u32,

    /// Empty for all quarters
    #[arg(short, long, default_value = "")]
    pub quarter: String,

    #[arg(short, long, default_value = "")]
    pub curriculum: String,

    /// Instructor reg id
    #[arg(short, long, default_value = "")]
    pub instructor: String,

    #[arg(short = 'n', long)]
    pub course_number: Option<u32>,

    #[arg(long, default_value = "0")]
    pub future_terms: u32,

    /// Include withdrawn/suspended sections (e.g. "withdrawn,suspended")
    #[arg(long, default_value = "")]
    pub delete_flag: String,

    /// Query the authenticated tier
    #[arg(long)]
    pub private: bool,
}

impl SectionsArgs {
    pub fn to_query(&self) -> SectionQuery {
        SectionQuery {
            year: self.year,
            quarter: self.quarter.clone(),
            curriculum: self.curriculum.clone(),
            instructor: self.instructor.clone(),
            course_number: self.course_number,
            future_terms: self.future_terms,
            delete_flag: self.delete_flag.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CoursesArgs {
    pub year: u32,
    pub quarter: String,

    #[arg(short, long, default_value = "")]
    pub curriculum: String,

    #[arg(short = 'n', long)]
    pub course_number: Option<u32>,

    /// Skip courses with no sections offered
    #[arg(long)]
    pub exclude_without_sections: bool,

    /// Results per page
    #[arg(short = 's', long, default_value = "100")]
    pub page_size: u32,

    /// First result (1-based)
    #[arg(short = 'p', long)]
    pub page_start: Option<u32>,

    #[arg(long, conflicts_with = "exclude_without_sections")]
    pub future_terms: Option<u32>,

    /// Follow every page and print the combined list
    #[arg(long)]
    pub all: bool,
}

impl CoursesArgs {
    pub fn to_query(&self) -> CourseQuery {
        CourseQuery {
            year: self.year,
            quarter: self.quarter.clone(),
            curriculum: self.curriculum.clone(),
            course_number: self.course_number,
            exclude_courses_without_sections: self.exclude_without_sections,
            page_size: self.page_size,
            page_start: self.page_start,
            future_terms: self.future_terms,
        }
    }
}

#[derive(Args, Debug)]
pub struct SectionArgs {
    #[command(flatten)]
    pub id: CourseId,
    pub section_id: String,

    /// Query the authenticated tier
    #[arg(long)]
    pub private: bool,
}

#[derive(Args, Debug)]
pub struct SectionStatusArgs {
    #[command(flatten)]
    pub id: CourseId,
    pub section_id: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IdKind {
    RegId,
    NetId,
    StudentNumber,
    EmployeeId,
}

impl From<IdKind> for PersonIdKind {
    fn from(kind: IdKind) -> Self {
        match kind {
            IdKind::RegId => Self::RegId,
            IdKind::NetId => Self::NetId,
            IdKind::StudentNumber => Self::StudentNumber,
            IdKind::EmployeeId => Self::EmployeeId,
        }
    }
}

#[derive(Args, Debug)]
pub struct PersonArgs {
    /// Reg id, or the identifier named by --by
    pub id: String,

    /// Search by another identifier instead of fetching by reg id
    #[arg(long, value_enum)]
    pub by: Option<IdKind>,
}

#[derive(Args, Debug)]
pub struct EnrollmentArgs {
    pub year: u32,
    pub quarter: String,
    pub regid: String,

    /// Include majors, minors and class level details
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args, Debug)]
pub struct EnrollmentsArgs {
    pub regid: String,

    /// Return full enrollments instead of links
    #[arg(long)]
    pub detailed: bool,
}

#[derive(Args, Debug)]
pub struct RegistrationArgs {
    #[command(flatten)]
    pub id: CourseId,
    pub section_id: String,
    pub regid: String,

    /// Duplicate enrollment code
    #[arg(long, default_value = "")]
    pub dup_code: String,
}

#[derive(Args, Debug)]
pub struct RegistrationsArgs {
    pub year: u32,
    pub quarter: String,

    #[arg(short, long, default_value = "")]
    pub curriculum: String,

    #[arg(short = 'n', long)]
    pub course_number: Option<u32>,

    #[arg(long, default_value = "")]
    pub section_id: String,

    /// Student reg id
    #[arg(long, default_value = "")]
    pub reg_id: String,

    /// Only active registrations
    #[arg(long)]
    pub active_only: bool,

    #[arg(long, default_value = "")]
    pub instructor_reg_id: String,
}

impl RegistrationsArgs {
    pub fn to_query(&self) -> RegistrationQuery {
        RegistrationQuery {
            year: self.year,
            quarter: self.quarter.clone(),
            curriculum: self.curriculum.clone(),
            course_number: self.course_number,
            section_id: self.section_id.clone(),
            reg_id: self.reg_id.clone(),
            active_only: self.active_only,
            instructor_reg_id: self.instructor_reg_id.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct TestScoreArgs {
    pub regid: String,

    /// Test type (e.g. SAT); all scores when omitted
    #[arg(short, long)]
    pub kind: Option<String>,
}

#[derive(Args, Debug)]
pub struct ChangeOfMajorArgs {
    pub year: u32,
    pub quarter: String,
    pub regid: String,
}

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g. cert_path, throw_404)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show configuration file path
    Path,

    /// Initialize configuration
    Init,
}

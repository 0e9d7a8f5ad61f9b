pub mod args;
pub mod commands;

use std::io::Write;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::*;

use crate::error::{Result, SwsError};

/// UW Student Web Service CLI
#[derive(Parser, Debug)]
#[command(
    name = "sws",
    about = "Query the UW Student Web Service - campuses, courses, sections, terms and student records",
    version,
    author,
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "json")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: args::ClientOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Table format
    Table,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List campuses
    Campus,

    /// List colleges on a campus
    Colleges {
        /// Campus short name (e.g. SEATTLE)
        campus: String,
    },

    /// List departments in a college
    Departments {
        /// College abbreviation (e.g. "ARTS & SCIENCES")
        college: String,
    },

    /// List curricula for a term
    Curricula(args::CurriculaArgs),

    /// Show one course
    Course(args::CourseArgs),

    /// Show a term
    Term(args::TermArgs),

    /// Search sections
    Sections(args::SectionsArgs),

    /// Search courses
    #[command(alias = "c")]
    Courses(args::CoursesArgs),

    /// Show one section
    Section(args::SectionArgs),

    /// Show a section's enrollment status (private)
    SectionStatus(args::SectionStatusArgs),

    /// Show or search people (private)
    Person(args::PersonArgs),

    /// Show a student's enrollment for a term (private)
    Enrollment(args::EnrollmentArgs),

    /// List a student's enrollments (private)
    Enrollments(args::EnrollmentsArgs),

    /// Show one registration (private)
    Registration(args::RegistrationArgs),

    /// Search registrations (private)
    Registrations(args::RegistrationsArgs),

    /// Show test scores (private)
    TestScore(args::TestScoreArgs),

    /// Show notices for a student (private)
    Notice { regid: String },

    /// Show a change of major request (private)
    ChangeOfMajor(args::ChangeOfMajorArgs),

    /// Show financial information (private)
    Finance { regid: String },

    /// Manage the response cache
    Cache(args::CacheArgs),

    /// Manage configuration
    Config(args::ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completion scripts
    fn generate_completions(shell: Shell) {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
    }

    fn init_logging(verbose: bool) {
        let default_filter = if verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .target(env_logger::Target::Stdout)
            .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
            .init();
    }

    /// Run the CLI application
    pub fn run() -> Result<()> {
        let cli = Self::parse();
        Self::init_logging(cli.verbose);

        let result = cli.dispatch();

        // Handle errors with better messaging
        if let Err(e) = &result {
            match e {
                SwsError::Http { url, status, body } => {
                    eprintln!("{} {} (HTTP {})", "Error:".red().bold(), url, status);
                    if !body.is_empty() {
                        eprintln!("{}", body);
                    }
                }
                SwsError::Parse { url, source } => {
                    eprintln!("{} could not parse response from {}", "Error:".red().bold(), url);
                    if cli.verbose {
                        eprintln!("Cause: {}", source);
                    } else {
                        eprintln!("\nRun with --verbose for more details.");
                    }
                }
                _ => eprintln!("{} {}", "Error:".red().bold(), e),
            }
            if let Some(hint) = e.hint() {
                eprintln!("\n{} {}", "Hint:".yellow(), hint);
            }
        }

        result
    }

    fn dispatch(&self) -> Result<()> {
        use commands::{catalog, courses, student};

        let format = self.format;
        let client = || commands::build_client(&self.overrides);

        match &self.command {
            Commands::Campus => catalog::campus(&client()?, format),
            Commands::Colleges { campus } => catalog::colleges(&client()?, campus, format),
            Commands::Departments { college } => catalog::departments(&client()?, college, format),
            Commands::Curricula(args) => catalog::curricula(&client()?, args, format),
            Commands::Course(args) => catalog::course(&client()?, args, format),
            Commands::Term(args) => catalog::term(&client()?, args, format),
            Commands::Sections(args) => catalog::sections(&client()?, args, format),
            Commands::Courses(args) => courses::execute(&client()?, args, format),
            Commands::Section(args) => catalog::section(&client()?, args, format),
            Commands::SectionStatus(args) => student::section_status(&client()?, args, format),
            Commands::Person(args) => student::person(&client()?, args, format),
            Commands::Enrollment(args) => student::enrollment(&client()?, args, format),
            Commands::Enrollments(args) => student::enrollments(&client()?, args, format),
            Commands::Registration(args) => student::registration(&client()?, args, format),
            Commands::Registrations(args) => student::registrations(&client()?, args, format),
            Commands::TestScore(args) => student::test_score(&client()?, args, format),
            Commands::Notice { regid } => student::notice(&client()?, regid, format),
            Commands::ChangeOfMajor(args) => student::change_of_major(&client()?, args, format),
            Commands::Finance { regid } => student::finance(&client()?, regid, format),
            Commands::Cache(args) => commands::cache::execute(args, &self.overrides),
            Commands::Config(args) => commands::config::execute(args),
            Commands::Version => {
                commands::version::execute();
                Ok(())
            }
            Commands::Completions { shell } => {
                Self::generate_completions(*shell);
                Ok(())
            }
        }
    }
}

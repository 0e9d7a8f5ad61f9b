pub mod cleaner;
pub mod client;
pub mod credentials;
pub mod endpoint;
pub mod registrar;
pub mod request;
pub mod transport;

pub use client::SwsClient;
pub use credentials::Credentials;
pub use endpoint::{EndpointResolver, Tier};
pub use registrar::{CourseQuery, PersonIdKind, RegistrationQuery, SectionQuery};
pub use request::Request;

/// A parsed API response. The API always answers with a JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use api::{Document, Request, SwsClient, Tier};
pub use config::ClientConfig;
pub use error::{Result, SwsError};

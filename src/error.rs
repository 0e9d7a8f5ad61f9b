use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Private endpoint requested for {url} but no client certificate and key were configured")]
    MissingCredentials { url: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Errors for {url} (HTTP {status})\n{body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Too many redirects ({hops}) while fetching {url}\n{body}")]
    TooManyRedirects {
        url: String,
        hops: usize,
        body: String,
    },

    #[error("Pagination cursor {cursor} repeated after {url}")]
    CursorLoop { url: String, cursor: String },

    #[error("Failed to parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {url} is not a JSON object")]
    UnexpectedShape { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SwsError {
    /// Get user-friendly hint for the error
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingCredentials { .. } => Some(
                "Pass --cert and --key (PEM files) or run: \
                 sws config set cert_path /path/to/cert.pem"
                    .to_string(),
            ),
            Self::Network(_) => Some("Check your internet connection and try again.".to_string()),
            Self::Http { status: 401, .. } | Self::Http { status: 403, .. } => {
                Some("The certificate may lack permission for this resource.".to_string())
            }
            Self::Http { status: 404, .. } => {
                Some("Use --tolerate-404 to treat missing resources as empty results.".to_string())
            }
            Self::CursorLoop { .. } => {
                Some("The server is handing out the same page again. Fetch pages one at a time instead.".to_string())
            }
            Self::Parse { .. } => Some(
                "The cached copy may be corrupt. Run 'sws cache clear --force' and retry."
                    .to_string(),
            ),
            _ => None,
        }
    }

    /// Whether the error came from a non-success HTTP status
    pub fn is_fatal_http(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::TooManyRedirects { .. })
    }

    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SwsError>;

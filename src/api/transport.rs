use std::time::Duration;

use log::{error, info};
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use url::Url;

use super::credentials::Credentials;
use super::endpoint::Endpoint;
use crate::config::ClientConfig;
use crate::error::{Result, SwsError};

/// Body marker of the course-title subsystem failure (HEPPS) that the
/// registrar cannot fix for historical courses.
pub const HEPPS_MARKER: &str = "Sr-Course-Titles";

/// How tolerated error statuses are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPolicy {
    /// 404 is fatal when true, suppressed when false
    pub throw_404: bool,
    /// 401 and HEPPS 500s are fatal when true, suppressed when false
    pub throw_hepps: bool,
}

impl From<&ClientConfig> for StatusPolicy {
    fn from(config: &ClientConfig) -> Self {
        Self {
            throw_404: config.throw_404,
            throw_hepps: config.throw_hepps,
        }
    }
}

/// What to do with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Success,
    Redirect,
    /// Logged and turned into an empty result
    Suppressed,
    Fatal,
}

/// Classify a response by status code (and, for 500, body)
pub fn classify(status: u16, body: &str, policy: &StatusPolicy) -> Classification {
    match status {
        200..=299 => Classification::Success,
        301 | 302 | 303 | 307 | 308 => Classification::Redirect,
        401 if !policy.throw_hepps => Classification::Suppressed,
        500 if !policy.throw_hepps && body.contains(HEPPS_MARKER) => Classification::Suppressed,
        404 if !policy.throw_404 => Classification::Suppressed,
        _ => Classification::Fatal,
    }
}

/// Blocking HTTP GET for both tiers.
///
/// The private client carries the TLS identity; redirects are followed here,
/// not by reqwest, so that every hop goes through `classify`.
pub struct Transport {
    public: Client,
    private: Option<Client>,
    policy: StatusPolicy,
    max_redirects: usize,
}

impl Transport {
    pub fn new(config: &ClientConfig, credentials: Option<&Credentials>) -> Result<Self> {
        let public = base_builder(config).build()?;
        let private = match credentials {
            Some(credentials) => Some(base_builder(config).identity(credentials.identity()?).build()?),
            None => None,
        };

        Ok(Self {
            public,
            private,
            policy: StatusPolicy::from(config),
            max_redirects: config.max_redirects,
        })
    }

    /// The identity-bearing client when the endpoint asks for a client certificate
    fn client_for(&self, endpoint: &Endpoint<'_>, url: &Url) -> Result<&Client> {
        if !endpoint.requires_client_cert {
            return Ok(&self.public);
        }
        self.private.as_ref().ok_or_else(|| SwsError::MissingCredentials {
            url: url.to_string(),
        })
    }

    /// Fetch `url`. `Ok(None)` means the status was suppressed and logged.
    pub fn get(&self, url: &Url, endpoint: &Endpoint<'_>) -> Result<Option<String>> {
        let client = self.client_for(endpoint, url)?;
        let mut current = url.clone();
        let mut hops = 0;

        loop {
            let response = client.get(current.clone()).send()?;
            let status = response.status().as_u16();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text()?;

            match classify(status, &body, &self.policy) {
                Classification::Success => return Ok(Some(body)),
                Classification::Redirect => {
                    let Some(location) = location else {
                        return Err(SwsError::Http {
                            url: url.to_string(),
                            status,
                            body,
                        });
                    };
                    if hops == self.max_redirects {
                        return Err(SwsError::TooManyRedirects {
                            url: url.to_string(),
                            hops,
                            body,
                        });
                    }
                    let next = current.join(&location).map_err(|e| SwsError::Http {
                        url: url.to_string(),
                        status,
                        body: format!("Invalid redirect location '{}': {}", location, e),
                    })?;
                    info!("{} - {} redirect to {}", current, status, next);
                    current = next;
                    hops += 1;
                }
                Classification::Suppressed => {
                    error!("{} - {} - {}", url, status, body);
                    return Ok(None);
                }
                Classification::Fatal => {
                    return Err(SwsError::Http {
                        url: url.to_string(),
                        status,
                        body,
                    });
                }
            }
        }
    }
}

fn base_builder(config: &ClientConfig) -> ClientBuilder {
    ClientBuilder::new()
        .redirect(Policy::none())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .tcp_keepalive(Duration::from_secs(60))
        .user_agent(config.user_agent.clone())
        .use_rustls_tls()
}

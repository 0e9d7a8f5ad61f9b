use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use super::request::Request;
use crate::error::{Result, SwsError};

/// Trust tier of an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Unauthenticated catalog data
    #[default]
    Public,
    /// Mutual-TLS authenticated records (grades, registrations, people)
    Private,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = SwsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(SwsError::InvalidInput(format!("Unknown tier: {}", s))),
        }
    }
}

/// Base URL for a tier and whether the client certificate must be presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint<'a> {
    pub base: &'a Url,
    pub requires_client_cert: bool,
}

/// Maps a trust tier to its base URL.
///
/// Read-only after construction, so one resolver can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    public: Url,
    private: Url,
    private_enabled: bool,
}

impl EndpointResolver {
    /// Private tier at `base_url`, public tier at `<base_url>public/`
    pub fn new(base_url: &str, private_enabled: bool) -> Result<Self> {
        let private = parse_base(base_url)?;
        let public = private
            .join("public/")
            .map_err(|e| SwsError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            public,
            private,
            private_enabled,
        })
    }

    pub fn base(&self, tier: Tier) -> &Url {
        match tier {
            Tier::Public => &self.public,
            Tier::Private => &self.private,
        }
    }

    /// Select the base for `tier`. The private tier needs loaded credentials.
    pub fn resolve(&self, tier: Tier) -> Result<Endpoint<'_>> {
        match tier {
            Tier::Public => Ok(Endpoint {
                base: &self.public,
                requires_client_cert: false,
            }),
            Tier::Private if self.private_enabled => Ok(Endpoint {
                base: &self.private,
                requires_client_cert: true,
            }),
            Tier::Private => Err(SwsError::MissingCredentials {
                url: self.private.to_string(),
            }),
        }
    }

    /// Endpoint and full URL for `request`
    pub fn resolve_url(&self, request: &Request) -> Result<(Endpoint<'_>, Url)> {
        match self.resolve(request.tier()) {
            Ok(endpoint) => {
                let url = request.resolve(endpoint.base)?;
                Ok((endpoint, url))
            }
            Err(SwsError::MissingCredentials { .. }) => Err(SwsError::MissingCredentials {
                url: request.resolve(&self.private)?.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Turn a server-supplied `Next.Href` into a path relative to the tier's base.
    ///
    /// Accepts absolute URLs, host-rooted paths (`/student/v5/public/...`) and
    /// rootless paths (`student/v5/public/...`). A path outside the base is
    /// returned host-rooted so that joining it still reaches the right resource.
    pub fn relative_cursor(&self, tier: Tier, cursor: &str) -> String {
        let cursor = cursor.trim();
        let path_and_query = match Url::parse(cursor) {
            Ok(url) => match url.query() {
                Some(query) => format!("{}?{}", url.path(), query),
                None => url.path().to_string(),
            },
            Err(_) => cursor.to_string(),
        };

        let base_path = self.base(tier).path();
        let rootless_base = base_path.trim_start_matches('/');

        if let Some(rest) = path_and_query.strip_prefix(base_path) {
            rest.to_string()
        } else if let Some(rest) = path_and_query.strip_prefix(rootless_base) {
            rest.to_string()
        } else {
            path_and_query
        }
    }
}

fn parse_base(base_url: &str) -> Result<Url> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    let url = Url::parse(&normalized)
        .map_err(|e| SwsError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(SwsError::Config(format!("Invalid base URL '{}'", base_url)));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolver(private_enabled: bool) -> EndpointResolver {
        EndpointResolver::new("https://ws.example.edu/student/v5", private_enabled).unwrap()
    }

    #[test]
    fn test_public_tier_needs_no_cert() {
        let resolver = resolver(false);
        let endpoint = resolver.resolve(Tier::Public).unwrap();
        assert_eq!(endpoint.base.as_str(), "https://ws.example.edu/student/v5/public/");
        assert!(!endpoint.requires_client_cert);
    }

    #[test]
    fn test_private_tier_requires_cert() {
        let resolver = resolver(true);
        let endpoint = resolver.resolve(Tier::Private).unwrap();
        assert_eq!(endpoint.base.as_str(), "https://ws.example.edu/student/v5/");
        assert!(endpoint.requires_client_cert);
    }

    #[test]
    fn test_resolve_url_carries_endpoint() {
        let resolver = resolver(true);
        let (endpoint, url) = resolver.resolve_url(&Request::private("person/ABC.json")).unwrap();
        assert!(endpoint.requires_client_cert);
        assert_eq!(url.as_str(), "https://ws.example.edu/student/v5/person/ABC.json");

        let (endpoint, url) = resolver.resolve_url(&Request::public("campus.json")).unwrap();
        assert!(!endpoint.requires_client_cert);
        assert_eq!(url.as_str(), "https://ws.example.edu/student/v5/public/campus.json");
    }

    #[test]
    fn test_private_tier_without_credentials_is_error() {
        let resolver = resolver(false);
        let err = resolver.resolve(Tier::Private).unwrap_err();
        assert!(matches!(err, SwsError::MissingCredentials { .. }));

        let err = resolver
            .resolve_url(&Request::private("person/ABC.json"))
            .unwrap_err();
        match err {
            SwsError::MissingCredentials { url } => {
                assert_eq!(url, "https://ws.example.edu/student/v5/person/ABC.json")
            }
            other => panic!("Expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            EndpointResolver::new("not a url", false),
            Err(SwsError::Config(_))
        ));
    }

    #[test]
    fn test_relative_cursor_forms() {
        let resolver = resolver(true);
        let expected = "course.json?page_start=26&page_size=25";

        for cursor in [
            "/student/v5/public/course.json?page_start=26&page_size=25",
            "student/v5/public/course.json?page_start=26&page_size=25",
            "https://ws.example.edu/student/v5/public/course.json?page_start=26&page_size=25",
            " /student/v5/public/course.json?page_start=26&page_size=25 ",
        ] {
            assert_eq!(resolver.relative_cursor(Tier::Public, cursor), expected);
        }
    }

    #[test]
    fn test_relative_cursor_private_tier() {
        let resolver = resolver(true);
        assert_eq!(
            resolver.relative_cursor(Tier::Private, "/student/v5/registration.json?page_start=2"),
            "registration.json?page_start=2"
        );
    }

    #[test]
    fn test_foreign_cursor_stays_host_rooted() {
        let resolver = resolver(true);
        let relative = resolver.relative_cursor(Tier::Public, "/student/v6/course.json?x=1");
        assert_eq!(relative, "/student/v6/course.json?x=1");

        let url = Request::public(relative)
            .resolve(resolver.base(Tier::Public))
            .unwrap();
        assert_eq!(url.as_str(), "https://ws.example.edu/student/v6/course.json?x=1");
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("public".parse::<Tier>().unwrap(), Tier::Public);
        assert_eq!("PRIVATE".parse::<Tier>().unwrap(), Tier::Private);
        assert!("secret".parse::<Tier>().is_err());
    }
}

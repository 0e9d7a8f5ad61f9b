use url::{form_urlencoded, Url};

use super::endpoint::Tier;
use crate::error::{Result, SwsError};

/// A single API call: trust tier, path relative to the tier's base, and query parameters.
///
/// Parameter keys are unique; setting a key twice keeps the last value.
/// Empty values are sent as `key=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    tier: Tier,
    path: String,
    query: Vec<(String, String)>,
}

impl Request {
    pub fn new(tier: Tier, path: impl Into<String>) -> Self {
        Self {
            tier,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn public(path: impl Into<String>) -> Self {
        Self::new(Tier::Public, path)
    }

    pub fn private(path: impl Into<String>) -> Self {
        Self::new(Tier::Private, path)
    }

    /// Add a query parameter, replacing any earlier value for `key`
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    /// Add a query parameter that is sent empty when absent
    pub fn opt_param<T: ToString>(self, key: impl Into<String>, value: Option<T>) -> Self {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        self.param(key, value)
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Build the full URL against `base` (which must end with `/`)
    pub fn resolve(&self, base: &Url) -> Result<Url> {
        let mut url = base
            .join(&self.path)
            .map_err(|e| SwsError::InvalidInput(format!("Invalid path '{}': {}", self.path, e)))?;

        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}

/// Percent-encode a value embedded in a path (`A & S` becomes `A%20%26%20S`)
pub fn encode_param(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

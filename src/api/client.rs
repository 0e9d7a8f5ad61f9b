use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use log::{debug, warn};
use serde_json::Value;

use super::cleaner;
use super::credentials::Credentials;
use super::endpoint::{EndpointResolver, Tier};
use super::request::Request;
use super::transport::Transport;
use super::Document;
use crate::cache::{CacheConfig, ResponseCache};
use crate::config::ClientConfig;
use crate::error::{Result, SwsError};

/// State carried between calls: the last document and its continuation cursor.
///
/// Both fields always come from the same fetch; a suppressed fetch leaves them alone.
#[derive(Debug, Clone, Default)]
struct Session {
    last: Option<Document>,
    next: String,
    tier: Tier,
}

/// Client for the Student Web Service.
///
/// Every domain method goes through [`SwsClient::fetch`]: resolve the URL,
/// serve from the cache or GET it, repair and parse the body, then record it
/// as the last result. The session sits behind a mutex so a shared client
/// never hands one caller another caller's cursor.
pub struct SwsClient {
    endpoints: EndpointResolver,
    cache: ResponseCache,
    transport: Transport,
    session: Mutex<Session>,
}

impl SwsClient {
    /// Build a client, loading credentials from `config.cert_path` / `config.key_path`
    pub fn new(config: ClientConfig) -> Result<Self> {
        let credentials = Credentials::from_config(&config)?;
        Self::with_credentials(config, credentials)
    }

    /// Build a client with credentials obtained elsewhere
    pub fn with_credentials(config: ClientConfig, credentials: Option<Credentials>) -> Result<Self> {
        let endpoints = EndpointResolver::new(&config.base_url, credentials.is_some())?;
        let transport = Transport::new(&config, credentials.as_ref())?;
        let cache = ResponseCache::new(CacheConfig {
            enabled: config.use_cache,
            dir: config.cache_dir.clone(),
        });

        Ok(Self {
            endpoints,
            cache,
            transport,
            session: Mutex::new(Session::default()),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetch and normalize one document.
    ///
    /// Returns `Ok(None)` when the response status was suppressed by policy;
    /// the session is left untouched in that case.
    pub fn fetch(&self, request: &Request) -> Result<Option<Document>> {
        let tier = request.tier();
        let (endpoint, url) = self.endpoints.resolve_url(request)?;

        let cached = match self.cache.get(url.as_str()) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read cache for {}: {}", url, e);
                None
            }
        };

        // A cached body that no longer parses is evicted and fetched again
        let cached = cached.and_then(|body| match parse_document(url.as_str(), &body) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Discarding unreadable cache entry: {}", e);
                if let Err(e) = self.cache.remove(url.as_str()) {
                    warn!("Failed to remove cache entry for {}: {}", url, e);
                }
                None
            }
        });

        let document = match cached {
            Some(document) => document,
            None => {
                let Some(body) = self.transport.get(&url, &endpoint)? else {
                    return Ok(None);
                };
                // Only bodies that parse are cached
                let document = parse_document(url.as_str(), &body)?;
                if let Err(e) = self.cache.put(url.as_str(), &body) {
                    warn!("Failed to store response in cache: {}", e);
                }
                document
            }
        };

        debug!("fetched - {}", url);
        Ok(Some(self.record(tier, document)))
    }

    /// Fetch the page after the last result, on the tier that produced it.
    ///
    /// With no cursor this does nothing and returns `Ok(None)`.
    pub fn fetch_next(&self) -> Result<Option<Document>> {
        let (cursor, tier) = {
            let session = self.session();
            (session.next.clone(), session.tier)
        };

        if cursor.is_empty() {
            debug!("No next page to fetch");
            return Ok(None);
        }

        let path = self.endpoints.relative_cursor(tier, &cursor);
        self.fetch(&Request::new(tier, path))
    }

    /// Follow the cursor chain from `request`, concatenating the array under `key`.
    ///
    /// Returns `Ok(None)` when any page is suppressed, since the listing would be
    /// incomplete. A cursor that comes back twice is an error.
    pub fn fetch_all_pages(&self, request: &Request, key: &str) -> Result<Option<Vec<Value>>> {
        let Some(first) = self.fetch(request)? else {
            return Ok(None);
        };

        let mut items = Vec::new();
        collect_items(&first, key, &mut items);

        let mut seen = HashSet::new();
        while self.has_next() {
            let cursor = self.next_cursor();
            if !seen.insert(cursor.clone()) {
                return Err(SwsError::CursorLoop {
                    url: self.endpoints.resolve_url(request)?.1.to_string(),
                    cursor,
                });
            }
            let Some(page) = self.fetch_next()? else {
                warn!("Page {} returned no result, dropping {} collected items", cursor, items.len());
                return Ok(None);
            };
            collect_items(&page, key, &mut items);
        }

        Ok(Some(items))
    }

    /// The most recently fetched document
    pub fn last(&self) -> Option<Document> {
        self.session().last.clone()
    }

    /// Raw `Next.Href` of the last document, empty when there are no more pages
    pub fn next_cursor(&self) -> String {
        self.session().next.clone()
    }

    pub fn has_next(&self) -> bool {
        !self.session().next.is_empty()
    }

    fn record(&self, tier: Tier, document: Document) -> Document {
        let mut session = self.session();
        session.next = next_href(&document);
        session.tier = tier;
        session.last = Some(document.clone());
        document
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        // Session is plain data; a panic elsewhere cannot leave it half-written
        self.session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Repair and parse a raw body into a JSON object
pub fn parse_document(url: &str, raw: &str) -> Result<Document> {
    let cleaned = cleaner::clean(raw);
    let value: Value = serde_json::from_str(&cleaned).map_err(|source| SwsError::Parse {
        url: url.to_string(),
        source,
    })?;

    match value {
        Value::Object(document) => Ok(document),
        _ => Err(SwsError::UnexpectedShape {
            url: url.to_string(),
        }),
    }
}

/// `document["Next"]["Href"]`, or empty
fn next_href(document: &Document) -> String {
    document
        .get("Next")
        .and_then(|next| next.get("Href"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn collect_items(document: &Document, key: &str, items: &mut Vec<Value>) {
    match document.get(key) {
        Some(Value::Array(page)) => items.extend(page.iter().cloned()),
        Some(Value::Null) | None => {}
        Some(other) => items.push(other.clone()),
    }
}

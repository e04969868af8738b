//! Clients for the external approval authorities.
//!
//! Each module exposes a `fetch_*` function that pulls one document through a
//! [`Transport`] and a pure `parse_*` function that turns the body into a
//! normalized list. Transport failures surface as [`Error::Fetch`](crate::Error::Fetch);
//! shape problems as `Parse` or `Scrape`.

pub mod fsf;
pub mod open_definition;
pub mod spdx;

use std::collections::BTreeMap;
use std::future::Future;

use anyhow::Result;
use reqwest::Client;

use crate::config::HttpConfig;
use crate::error::TransportError;
use crate::models::{Authority, AuthorityEntry, LicenseRecord};
use crate::normalize::normalize;

/// Retrieves the body of a well-known URL.
pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        tracing::debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Normalized key → entry mapping for one authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalList {
    authority: Authority,
    entries: BTreeMap<String, AuthorityEntry>,
}

impl ApprovalList {
    pub fn new(authority: Authority) -> Self {
        Self {
            authority,
            entries: BTreeMap::new(),
        }
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    /// Add an entry under `normalize(raw_key)`.
    ///
    /// Blank keys are dropped and the first display name for a key wins.
    /// Returns whether the entry was added.
    pub fn insert(&mut self, raw_key: &str, display_name: &str) -> bool {
        let key = normalize(raw_key);
        if key.is_empty() {
            return false;
        }
        let display_name = display_name.trim();
        if let Some(existing) = self.entries.get(&key) {
            if existing.display_name != display_name {
                tracing::warn!(
                    authority = %self.authority,
                    key = %key,
                    kept = %existing.display_name,
                    dropped = %display_name,
                    "conflicting names for one key"
                );
            }
            return false;
        }
        self.entries.insert(
            key.clone(),
            AuthorityEntry {
                key,
                display_name: display_name.to_string(),
                source: self.authority,
            },
        );
        true
    }

    /// Make `alias` resolve to the same display name as `existing`.
    ///
    /// Does nothing when `existing` is absent.
    pub(crate) fn alias(&mut self, existing: &str, alias: &str) -> bool {
        let Some(entry) = self.get(existing).cloned() else {
            return false;
        };
        let key = normalize(alias);
        self.entries.insert(
            key.clone(),
            AuthorityEntry { key, ..entry },
        );
        true
    }

    pub fn get(&self, key: &str) -> Option<&AuthorityEntry> {
        self.entries.get(&normalize(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entry recognizing `record`: identifier first, title only as fallback.
    pub fn lookup(&self, record: &LicenseRecord) -> Option<&AuthorityEntry> {
        self.get(&record.identifier)
            .or_else(|| self.get(&record.title))
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuthorityEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! JWKS retrieval for Auth0 token verification

use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Individual JWK record as published by the issuer.
///
/// All fields are optional so one odd record does not poison the whole set;
/// a record is only validated once a token selects it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Jwk {
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub kty: Option<String>,
    #[serde(default, rename = "use")]
    pub usage: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

/// Ordered key set; lookups are first-match-wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigningKeySet {
    keys: Vec<Jwk>,
}

impl SigningKeySet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// First record carrying `kid`.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }

    /// Key ids that appear more than once, each reported once, in order of
    /// their second appearance.
    pub fn duplicate_kids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.keys
            .iter()
            .filter_map(|key| key.kid.as_deref())
            .filter(|kid| !seen.insert(*kid) && reported.insert(*kid))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("JWKS request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JWKS fetch failed with status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to parse JWKS: {0}")]
    Parse(#[from] serde_json::Error),
}

struct CachedKeySet {
    keys: Arc<SigningKeySet>,
    fetched_at: Instant,
}

/// Fetches the issuer's key set, optionally holding it for a TTL.
///
/// A zero TTL disables caching: every call is a fresh round trip.
#[derive(Clone)]
pub struct JwksClient {
    http: reqwest::Client,
    jwks_url: String,
    ttl: Duration,
    cached: Arc<RwLock<Option<CachedKeySet>>>,
}

impl JwksClient {
    pub fn new(jwks_url: String, ttl: Duration, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            jwks_url,
            ttl,
            cached: Arc::new(RwLock::new(None)),
        })
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Current key set, from cache when enabled and fresh.
    pub async fn key_set(&self) -> Result<Arc<SigningKeySet>, KeySetError> {
        if !self.ttl.is_zero() {
            let cache = self.cached.read();
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return Ok(cached.keys.clone());
                }
            }
        }

        let keys = Arc::new(self.fetch().await?);

        if !self.ttl.is_zero() {
            let mut cache = self.cached.write();
            *cache = Some(CachedKeySet {
                keys: keys.clone(),
                fetched_at: Instant::now(),
            });
            tracing::info!(keys = keys.len(), "JWKS cache refreshed");
        }

        Ok(keys)
    }

    async fn fetch(&self) -> Result<SigningKeySet, KeySetError> {
        tracing::debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self.http.get(&self.jwks_url).send().await?;

        if !response.status().is_success() {
            return Err(KeySetError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let keys = SigningKeySet::from_json(&body)?;

        for kid in keys.duplicate_kids() {
            tracing::warn!(kid, "JWKS contains a duplicate key id, only the first is used");
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwk(kid: &str, n: &str) -> Jwk {
        Jwk {
            kid: Some(kid.to_string()),
            kty: Some("RSA".to_string()),
            n: Some(n.to_string()),
            e: Some("AQAB".to_string()),
            ..Jwk::default()
        }
    }

    #[test]
    fn parses_auth0_style_document() {
        let doc = br#"{
            "keys": [
                {"alg": "RS256", "kty": "RSA", "use": "sig", "n": "abc", "e": "AQAB",
                 "kid": "key-1", "x5t": "ignored", "x5c": ["ignored"]},
                {"kty": "RSA", "n": "def", "e": "AQAB"}
            ]
        }"#;

        let keys = SigningKeySet::from_json(doc).unwrap();

        assert_eq!(keys.len(), 2);
        let key = keys.find("key-1").unwrap();
        assert_eq!(key.usage.as_deref(), Some("sig"));
        assert_eq!(key.n.as_deref(), Some("abc"));
    }

    #[test]
    fn document_without_keys_array_is_an_error() {
        assert!(SigningKeySet::from_json(br#"{"not_keys": []}"#).is_err());
        assert!(SigningKeySet::from_json(b"<html>").is_err());
    }

    #[test]
    fn find_returns_first_match() {
        let keys = SigningKeySet::new(vec![jwk("a", "first"), jwk("b", "other"), jwk("a", "second")]);

        assert_eq!(keys.find("a").unwrap().n.as_deref(), Some("first"));
        assert!(keys.find("missing").is_none());
        assert_eq!(keys.duplicate_kids(), vec!["a"]);
    }

    #[test]
    fn repeated_kid_is_reported_once() {
        let keys = SigningKeySet::new(vec![
            jwk("a", "1"),
            jwk("a", "2"),
            jwk("a", "3"),
            jwk("b", "4"),
            jwk("b", "5"),
        ]);

        assert_eq!(keys.duplicate_kids(), vec!["a", "b"]);
    }

    #[test]
    fn records_without_kid_never_match() {
        let keys = SigningKeySet::new(vec![Jwk {
            kty: Some("RSA".to_string()),
            ..Jwk::default()
        }]);

        assert!(keys.find("").is_none());
        assert!(keys.duplicate_kids().is_empty());
    }
}

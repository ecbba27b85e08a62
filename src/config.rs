use anyhow::{bail, Context, Result};
use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Issuer, audience and key-set settings for the authorization pipeline.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Auth0-style tenant domain, e.g. `tenant.eu.auth0.com`
    pub issuer_domain: String,

    /// Expected `aud` claim
    pub audience: String,

    /// Accepted signing algorithms (RSA family only)
    pub algorithms: Vec<Algorithm>,

    /// Where the key set is fetched from
    pub jwks_url: String,

    /// Key set cache lifetime; zero fetches on every verification
    pub jwks_cache_ttl: Duration,

    /// Upper bound on a single key set fetch
    pub jwks_timeout: Duration,

    /// Clock skew tolerated on `exp`
    pub leeway_seconds: u64,
}

impl AuthConfig {
    /// RS256, no cache, 10s fetch timeout, well-known JWKS URL of the domain.
    pub fn new(issuer_domain: impl Into<String>, audience: impl Into<String>) -> Result<Self> {
        let issuer_domain = issuer_domain.into();
        let jwks_url = default_jwks_url(&issuer_domain)?;

        Ok(Self {
            issuer_domain,
            audience: audience.into(),
            algorithms: vec![Algorithm::RS256],
            jwks_url,
            jwks_cache_ttl: Duration::ZERO,
            jwks_timeout: Duration::from_secs(10),
            leeway_seconds: 0,
        })
    }

    /// Point the fetcher at a different key set, e.g. a mock issuer.
    pub fn with_jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.jwks_url = jwks_url.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_cache_ttl = ttl;
        self
    }

    pub fn with_algorithms(mut self, algorithms: Vec<Algorithm>) -> Result<Self> {
        if algorithms.is_empty() {
            bail!("at least one signing algorithm must be configured");
        }
        if let Some(alg) = algorithms.iter().find(|alg| !is_rsa_family(**alg)) {
            bail!("unsupported signing algorithm {alg:?}: only the RSA family is accepted");
        }
        self.algorithms = algorithms;
        Ok(self)
    }

    /// The `iss` value tokens must carry.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.issuer_domain)
    }
}

fn default_jwks_url(issuer_domain: &str) -> Result<String> {
    let base = Url::parse(&format!("https://{issuer_domain}/"))
        .with_context(|| format!("Invalid issuer domain: {issuer_domain}"))?;
    let url = base
        .join(".well-known/jwks.json")
        .context("Failed to build JWKS URL")?;
    Ok(url.to_string())
}

fn is_rsa_family(alg: Algorithm) -> bool {
    matches!(
        alg,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}

fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Algorithm::from_str(s).with_context(|| format!("Unknown algorithm: {s}")))
        .collect()
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // Database
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Auth0
    pub auth: AuthConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // Database
        let database_url = env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Auth0
        let issuer_domain = env::var("AUTH0_DOMAIN").context("AUTH0_DOMAIN must be set")?;
        let audience = env::var("API_AUDIENCE").context("API_AUDIENCE must be set")?;
        let algorithms = parse_algorithms(
            &env::var("AUTH_ALGORITHMS").unwrap_or_else(|_| "RS256".to_string()),
        )?;

        let mut auth = AuthConfig::new(issuer_domain, audience)?
            .with_algorithms(algorithms)?
            .with_cache_ttl(Duration::from_secs(env_u64("JWKS_CACHE_TTL_SECONDS", 0)));
        if let Ok(jwks_url) = env::var("JWKS_URL") {
            Url::parse(&jwks_url).context("JWKS_URL is not a valid URL")?;
            auth = auth.with_jwks_url(jwks_url);
        }
        auth.jwks_timeout = Duration::from_secs(env_u64("JWKS_TIMEOUT_SECONDS", 10));
        auth.leeway_seconds = env_u64("JWT_LEEWAY_SECONDS", 0);

        Ok(Settings {
            env,
            server_addr,
            database_url,
            database_max_connections,
            cors_allow_origins,
            auth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_issuer_and_jwks_url_from_domain() {
        let config = AuthConfig::new("tenant.eu.auth0.com", "coffee").unwrap();

        assert_eq!(config.issuer(), "https://tenant.eu.auth0.com/");
        assert_eq!(
            config.jwks_url,
            "https://tenant.eu.auth0.com/.well-known/jwks.json"
        );
        assert_eq!(config.algorithms, vec![Algorithm::RS256]);
        assert_eq!(config.jwks_cache_ttl, Duration::ZERO);
    }

    #[test]
    fn rejects_non_rsa_algorithms() {
        let config = AuthConfig::new("tenant.eu.auth0.com", "coffee").unwrap();

        assert!(config
            .clone()
            .with_algorithms(vec![Algorithm::RS256, Algorithm::HS256])
            .is_err());
        assert!(config.clone().with_algorithms(vec![]).is_err());
        assert!(config
            .with_algorithms(vec![Algorithm::RS256, Algorithm::PS256])
            .is_ok());
    }

    #[test]
    fn parses_algorithm_list() {
        assert_eq!(
            parse_algorithms("RS256, RS512").unwrap(),
            vec![Algorithm::RS256, Algorithm::RS512]
        );
        assert!(parse_algorithms("RS999").is_err());
    }

    #[test]
    fn rejects_invalid_domain() {
        assert!(AuthConfig::new("not a domain", "coffee").is_err());
    }
}

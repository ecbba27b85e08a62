use anyhow::{Context, Result};

use super::{bearer_token, check_permission, AuthError, JwksClient, TokenClaims, TokenVerifier};
use crate::config::AuthConfig;

/// Extract → fetch keys → verify → check permission.
///
/// Holds no per-request state; with the key-set cache disabled two calls
/// never observe each other.
#[derive(Clone)]
pub struct Authorizer {
    jwks: JwksClient,
    verifier: TokenVerifier,
}

impl Authorizer {
    pub fn new(config: &AuthConfig) -> Result<Self> {
        let jwks = JwksClient::new(
            config.jwks_url.clone(),
            config.jwks_cache_ttl,
            config.jwks_timeout,
        )
        .context("Failed to create JWKS HTTP client")?;

        Ok(Self {
            jwks,
            verifier: TokenVerifier::new(config),
        })
    }

    /// Authorize a request carrying `authorization` for `permission`.
    pub async fn authorize(
        &self,
        permission: &str,
        authorization: Option<&str>,
    ) -> Result<TokenClaims, AuthError> {
        let result = self.run(permission, authorization).await;

        if let Err(err) = &result {
            tracing::warn!(
                permission,
                kind = ?err,
                status = err.status_code().as_u16(),
                "Authorization failed"
            );
        }

        result
    }

    async fn run(
        &self,
        permission: &str,
        authorization: Option<&str>,
    ) -> Result<TokenClaims, AuthError> {
        let token = bearer_token(authorization)?;

        let keys = self.jwks.key_set().await.map_err(|e| {
            tracing::warn!(error = %e, url = self.jwks.jwks_url(), "JWKS unavailable");
            AuthError::KeySetUnavailable
        })?;

        let claims = self.verifier.verify(token, &keys)?;
        check_permission(permission, &claims)?;

        tracing::debug!(permission, sub = ?claims.subject(), "Authorized");
        Ok(claims)
    }
}

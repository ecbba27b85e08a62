//! Signature and registered-claim validation against a fetched key set

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, DecodingKey, Validation};

use super::{AuthError, Jwk, SigningKeySet, TokenClaims};
use crate::config::AuthConfig;

/// Validates tokens for one issuer and audience.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    validation: Validation,
}

impl TokenVerifier {
    /// `exp` is required alongside `aud` and `iss`, so a token that never
    /// expires is rejected even though it would otherwise verify.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::default();
        validation.algorithms = config.algorithms.clone();
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = config.leeway_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Self { validation }
    }

    /// Verify `token` with the key its header names. Exactly one key is tried.
    pub fn verify(&self, token: &str, keys: &SigningKeySet) -> Result<TokenClaims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Undecodable JWT header");
            AuthError::TokenUnparseable
        })?;
        let kid = header.kid.ok_or(AuthError::MalformedToken)?;

        let jwk = keys.find(&kid).ok_or_else(|| {
            tracing::debug!(kid = %kid, "No JWKS key matches token");
            AuthError::UnknownSigningKey
        })?;
        let decoding_key = decoding_key(jwk)?;

        let token_data = decode::<TokenClaims>(token, &decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;

        Ok(token_data.claims)
    }
}

fn decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    if jwk.kty.as_deref() != Some("RSA") {
        tracing::warn!(kid = ?jwk.kid, kty = ?jwk.kty, "JWKS key is not an RSA key");
        return Err(AuthError::TokenUnparseable);
    }

    let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
        tracing::warn!(kid = ?jwk.kid, "JWKS key is missing RSA components");
        return Err(AuthError::TokenUnparseable);
    };

    DecodingKey::from_rsa_components(n, e).map_err(|err| {
        tracing::warn!(kid = ?jwk.kid, error = %err, "Failed to parse JWK");
        AuthError::TokenUnparseable
    })
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::ImmatureSignature => {
            AuthError::ClaimsMismatch
        }
        // Also raised for a registered claim of the wrong type, e.g. a string `exp`.
        ErrorKind::MissingRequiredClaim(_) => AuthError::ClaimsMismatch,
        _ => AuthError::TokenUnparseable,
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::AuthError;

/// Verified JWT payload.
///
/// Kept as the raw claims object so handlers see exactly what the issuer
/// signed, custom claims included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    /// Subject (user ID)
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.get("iss").and_then(Value::as_str)
    }

    /// Expiration (Unix timestamp)
    pub fn expires_at(&self) -> Option<u64> {
        self.get("exp").and_then(Value::as_u64)
    }

    /// String entries of the `permissions` claim, `None` when the claim is absent.
    pub fn permissions(&self) -> Option<impl Iterator<Item = &str>> {
        let claim = self.get("permissions")?;
        let entries = claim.as_array().map(Vec::as_slice).unwrap_or_default();
        Some(entries.iter().filter_map(Value::as_str))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Literal membership test of `permission` in the `permissions` claim.
pub fn check_permission(permission: &str, claims: &TokenClaims) -> Result<(), AuthError> {
    let mut granted = claims
        .permissions()
        .ok_or(AuthError::PermissionsClaimMissing)?;

    if granted.any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::InsufficientScope)
    }
}

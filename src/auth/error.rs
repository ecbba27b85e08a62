use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::error::ErrorResponse;

/// Classified failure of the authorization pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,

    #[error("Authorization header must start with \"Bearer\".")]
    MalformedScheme,

    #[error("Token not found.")]
    MissingToken,

    #[error("Authorization header must be bearer token.")]
    TooManyParts,

    #[error("Authorization malformed.")]
    MalformedToken,

    #[error("Unable to find the appropriate key.")]
    UnknownSigningKey,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    ClaimsMismatch,

    #[error("Unable to parse authentication token.")]
    TokenUnparseable,

    #[error("Unable to fetch the signing key set.")]
    KeySetUnavailable,

    #[error("Permissions not included in token.")]
    PermissionsClaimMissing,

    #[error("Permission not found.")]
    InsufficientScope,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownSigningKey | Self::TokenUnparseable | Self::PermissionsClaimMissing => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingHeader
            | Self::MalformedScheme
            | Self::MissingToken
            | Self::TooManyParts
            | Self::MalformedToken
            | Self::TokenExpired
            | Self::ClaimsMismatch
            | Self::KeySetUnavailable
            | Self::InsufficientScope => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(status, self.to_string());

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_key_lookup_parse_and_missing_permissions_are_bad_requests() {
        let bad_requests = [
            AuthError::UnknownSigningKey,
            AuthError::TokenUnparseable,
            AuthError::PermissionsClaimMissing,
        ];
        let unauthorized = [
            AuthError::MissingHeader,
            AuthError::MalformedScheme,
            AuthError::MissingToken,
            AuthError::TooManyParts,
            AuthError::MalformedToken,
            AuthError::TokenExpired,
            AuthError::ClaimsMismatch,
            AuthError::KeySetUnavailable,
            AuthError::InsufficientScope,
        ];

        for err in bad_requests {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err:?}");
        }
        for err in unauthorized {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED, "{err:?}");
        }
    }
}

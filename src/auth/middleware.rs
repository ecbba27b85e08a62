use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::marker::PhantomData;
use std::sync::Arc;

use super::{AuthError, TokenClaims};
use crate::app::AppState;

/// A scope string a route demands from the token's `permissions` claim.
pub trait Permission: Send + Sync + 'static {
    const NAME: &'static str;
}

macro_rules! permissions {
    ($($(#[$meta:meta])* $ty:ident => $name:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $ty;

            impl Permission for $ty {
                const NAME: &'static str = $name;
            }
        )*
    };
}

permissions! {
    /// View drinks with their full recipe
    GetDrinksDetail => "get:drinks-detail";
    PostDrinks => "post:drinks";
    PatchDrinks => "patch:drinks";
    DeleteDrinks => "delete:drinks";
}

/// Extractor that requires a valid JWT granting `P`
///
/// Example:
/// ```ignore
/// async fn create(auth: RequirePermission<PostDrinks>) -> impl IntoResponse {
///     format!("Hello, {:?}", auth.claims.subject())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequirePermission<P> {
    pub claims: TokenClaims,
    _permission: PhantomData<P>,
}

impl<P> std::ops::Deref for RequirePermission<P> {
    type Target = TokenClaims;

    fn deref(&self) -> &Self::Target {
        &self.claims
    }
}

#[async_trait]
impl<P: Permission> FromRequestParts<Arc<AppState>> for RequirePermission<P> {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedScheme)?),
            None => None,
        };

        let claims = state.authorizer.authorize(P::NAME, authorization).await?;

        Ok(Self {
            claims,
            _permission: PhantomData,
        })
    }
}

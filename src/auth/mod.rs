pub mod authorizer;
pub mod bearer;
pub mod claims;
pub mod error;
pub mod jwks;
pub mod middleware;
pub mod verify;

pub use authorizer::Authorizer;
pub use bearer::bearer_token;
pub use claims::{check_permission, TokenClaims};
pub use error::AuthError;
pub use jwks::{Jwk, JwksClient, KeySetError, SigningKeySet};
pub use middleware::{
    DeleteDrinks, GetDrinksDetail, PatchDrinks, Permission, PostDrinks, RequirePermission,
};
pub use verify::TokenVerifier;

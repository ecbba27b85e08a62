//! Shared fixtures: a mock issuer serving a JWKS document and token minting.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use jsonwebtoken::{encode, get_current_timestamp, Algorithm, EncodingKey, Header};
use parking_lot::RwLock;
use serde_json::{json, Value};

use coffee_shop_api::app::{self, AppState};
use coffee_shop_api::auth::Authorizer;
use coffee_shop_api::config::{AuthConfig, Environment, Settings};
use coffee_shop_api::store::MemoryDrinkStore;

pub const DOMAIN: &str = "tenant.test";
pub const AUDIENCE: &str = "coffee";
pub const KID: &str = "test-key-1";

const PRIVATE_PEM: &str = include_str!("../fixtures/rsa_private.pem");
const PUBLIC_JWK: &str = include_str!("../fixtures/rsa_public.jwk.json");

pub fn public_jwk() -> Value {
    serde_json::from_str(PUBLIC_JWK).unwrap()
}

/// Key set document and response status served by the mock issuer.
pub struct MockIssuer {
    pub jwks: RwLock<Value>,
    pub status: RwLock<StatusCode>,
    pub hits: AtomicUsize,
}

impl MockIssuer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn serve_jwks(State(issuer): State<Arc<MockIssuer>>) -> (StatusCode, Json<Value>) {
    issuer.hits.fetch_add(1, Ordering::SeqCst);
    let status = *issuer.status.read();
    let body = issuer.jwks.read().clone();
    (status, Json(body))
}

/// Spin up a mock issuer on an ephemeral port; returns it with its JWKS URL.
pub async fn start_issuer(jwks: Value) -> (Arc<MockIssuer>, String) {
    let issuer = Arc::new(MockIssuer {
        jwks: RwLock::new(jwks),
        status: RwLock::new(StatusCode::OK),
        hits: AtomicUsize::new(0),
    });

    let router = Router::new()
        .route("/.well-known/jwks.json", get(serve_jwks))
        .route("/raw/jwks.json", get(|| async { "<html>not json</html>" }))
        .with_state(issuer.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (issuer, format!("http://{addr}/.well-known/jwks.json"))
}

pub async fn start_default_issuer() -> (Arc<MockIssuer>, String) {
    start_issuer(json!({ "keys": [public_jwk()] })).await
}

pub fn auth_config(jwks_url: &str) -> AuthConfig {
    AuthConfig::new(DOMAIN, AUDIENCE)
        .unwrap()
        .with_jwks_url(jwks_url)
}

pub fn claims_with(permissions: &[&str]) -> Value {
    json!({
        "iss": format!("https://{DOMAIN}/"),
        "sub": "auth0|barista",
        "aud": AUDIENCE,
        "iat": get_current_timestamp(),
        "exp": get_current_timestamp() + 3600,
        "permissions": permissions,
    })
}

pub fn sign(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(String::from);
    let key = EncodingKey::from_rsa_pem(PRIVATE_PEM.as_bytes()).unwrap();
    encode(&header, claims, &key).unwrap()
}

pub fn token_with(permissions: &[&str]) -> String {
    sign(&claims_with(permissions), Some(KID))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Full router over an in-memory store, trusting the mock issuer at `jwks_url`.
pub fn test_app(jwks_url: &str) -> axum::Router {
    let auth = auth_config(jwks_url);
    let authorizer = Authorizer::new(&auth).unwrap();
    let settings = Settings {
        env: Environment::Dev,
        server_addr: "127.0.0.1:0".to_string(),
        database_url: None,
        database_max_connections: 1,
        cors_allow_origins: vec!["http://localhost:3000".to_string()],
        auth,
    };

    let state = AppState::new(settings, authorizer, Arc::new(MemoryDrinkStore::new()));
    app::create_app(state)
}

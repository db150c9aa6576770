//! Test harness for Verovista end-to-end tests.
//!
//! [`TestApp::spawn`] binds the storefront to an ephemeral port on
//! 127.0.0.1 and serves it in the background, the same way the binary does
//! minus Sentry. [`TestApp::spawn_with_login`] also starts a fake identity
//! provider:
//!
//! - `GET /authorize` redirects straight back to the callback with
//!   `code=<nonce>` and the original `state`
//! - `POST /token` answers with an unsigned ID token whose `nonce` claim is
//!   the code it was given
//!
//! so following redirects from `/login` completes a full sign-in.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p verovista-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::Query,
    response::Redirect,
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use reqwest::{Client, cookie::Jar, redirect::Policy};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use verovista_core::Catalog;
use verovista_storefront::config::{IdentityProviderConfig, StorefrontConfig};
use verovista_storefront::routes;
use verovista_storefront::services::IdentityClient;
use verovista_storefront::state::AppState;

/// Session secret used by every test server.
pub const TEST_SESSION_SECRET: &str =
    "Zq8#Lw2!Rn5$Tb9&Vc3*Hx7^Km4@Pd6%Gs1(Fy0)Ju8_Ea2+Ni5=Ok7?Ml3<Wr9>";

/// Client secret for the fake provider.
pub const TEST_CLIENT_SECRET: &str = "Gx7qLm2vRt9KpW4zNc8YhB3dFs6J";

/// Email the fake provider signs everyone in as.
pub const TEST_EMAIL: &str = "ada@verovista.test";

/// Catalog served by test servers.
///
/// `p1` and `p3` are trending; `p2` matches "hat".
pub const TEST_CATALOG: &str = r#"[
    {"product_id": "p1", "name": "Red Running Shoe", "brand": "Stride", "category": "Footwear",
     "description": "Lightweight trainer", "query_terms": ["trending", "shoe"],
     "image_url": "https://img.example/p1.jpg"},
    {"product_id": "p2", "name": "Blue Sun Hat", "brand": "Shade", "category": "Accessories",
     "description": "Wide brim", "query_terms": ["hat"]},
    {"product_id": "p3", "name": "Trail Backpack", "brand": "Stride", "category": "Bags",
     "description": "20 litre pack", "query_terms": ["trending"]}
]"#;

/// A running storefront plus clients that share one cookie jar.
pub struct TestApp {
    /// Base URL of the storefront, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    /// Client that follows redirects.
    pub client: Client,
    /// Client that does not follow redirects, for asserting `Location`.
    pub no_redirect: Client,
}

impl TestApp {
    /// Start a storefront with sign-in disabled.
    pub async fn spawn() -> Self {
        Self::start(false).await
    }

    /// Start a storefront wired to a fake identity provider.
    pub async fn spawn_with_login() -> Self {
        Self::start(true).await
    }

    async fn start(with_login: bool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront listener");
        let addr = listener.local_addr().expect("storefront address");
        let base_url = format!("http://{addr}");

        let mut vars = HashMap::from([
            ("VEROVISTA_SESSION_SECRET", TEST_SESSION_SECRET.to_string()),
            ("VEROVISTA_BASE_URL", base_url.clone()),
        ]);
        if with_login {
            vars.insert("GOOGLE_CLIENT_ID", "verovista-test-client".to_string());
            vars.insert("GOOGLE_CLIENT_SECRET", TEST_CLIENT_SECRET.to_string());
        }
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
            .expect("test configuration is valid");

        let identity = match &config.identity {
            Some(provider) if with_login => Some(spawn_fake_provider(provider).await),
            _ => None,
        };

        let catalog = Catalog::from_json(TEST_CATALOG).expect("test catalog parses");
        let state = AppState::with_identity(config, catalog, identity);
        let app = routes::app(state).expect("session layer builds");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("storefront server");
        });

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .expect("build client");
        let no_redirect = Client::builder()
            .cookie_provider(jar)
            .redirect(Policy::none())
            .build()
            .expect("build client");

        Self {
            base_url,
            client,
            no_redirect,
        }
    }

    /// Absolute URL for a path on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sign in through the fake provider. Returns the final `/profile` body.
    pub async fn login(&self) -> Value {
        let response = self
            .client
            .get(self.url("/login"))
            .send()
            .await
            .expect("login request");
        assert_eq!(response.status(), 200, "login should land on /profile");
        assert_eq!(response.url().path(), "/profile");
        response.json().await.expect("profile body")
    }

    /// Record a product view through the API.
    pub async fn add_to_history(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/add-to-history"))
            .json(body)
            .send()
            .await
            .expect("add-to-history request")
    }

    /// GET a path and parse the JSON body, asserting the status.
    pub async fn get_json(&self, path: &str, status: u16) -> Value {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("request");
        assert_eq!(response.status(), status, "GET {path}");
        response.json().await.expect("JSON body")
    }

    /// GET a path without following redirects and return the `Location`.
    pub async fn redirect_location(&self, path: &str) -> String {
        let response = self
            .no_redirect
            .get(self.url(path))
            .send()
            .await
            .expect("request");
        assert!(
            response.status().is_redirection(),
            "GET {path} returned {}",
            response.status()
        );
        response
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .expect("location header")
            .to_string()
    }
}

/// Start the fake provider and return a client pointed at it.
async fn spawn_fake_provider(provider: &IdentityProviderConfig) -> IdentityClient {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind provider listener");
    let addr = listener.local_addr().expect("provider address");

    let router = Router::new()
        .route("/authorize", get(fake_authorize))
        .route("/token", post(fake_token));
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("provider server");
    });

    IdentityClient::with_endpoints(
        provider,
        &format!("http://{addr}/authorize"),
        &format!("http://{addr}/token"),
    )
}

async fn fake_authorize(Query(params): Query<HashMap<String, String>>) -> Redirect {
    let param = |key: &str| params.get(key).cloned().unwrap_or_default();
    Redirect::to(&format!(
        "{}?code={}&state={}",
        param("redirect_uri"),
        param("nonce"),
        param("state")
    ))
}

async fn fake_token(Form(params): Form<HashMap<String, String>>) -> Json<Value> {
    let nonce = params.get("code").cloned().unwrap_or_default();
    Json(json!({ "id_token": fake_id_token(&nonce) }))
}

/// Build an unsigned compact JWT carrying the test identity.
#[must_use]
pub fn fake_id_token(nonce: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let claims = json!({
        "email": TEST_EMAIL,
        "name": "Ada Lovelace",
        "given_name": "Ada",
        "email_verified": true,
        "nonce": nonce,
    });
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

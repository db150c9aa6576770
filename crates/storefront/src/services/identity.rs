//! Google `OpenID` Connect client.
//!
//! # OAuth Flow
//!
//! 1. Generate authorization URL with `authorization_url()`
//! 2. Redirect the user to Google's consent page
//! 3. Google redirects back with an authorization code
//! 4. Exchange the code with `exchange_code()`, which returns the identity
//!    claims from the ID token
//!
//! The ID token comes straight from the token endpoint over TLS, so its
//! claims are read without verifying the signature. The nonce claim must
//! still match the one stored in the session.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use verovista_core::Identity;

use crate::config::IdentityProviderConfig;

/// Google's OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const SCOPES: &str = "openid email profile";

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The token endpoint rejected the exchange.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    /// The ID token is missing or unreadable.
    #[error("Invalid ID token: {0}")]
    InvalidIdToken(String),

    /// The ID token's nonce does not match the session's.
    #[error("ID token nonce mismatch")]
    NonceMismatch,
}

/// Raw token response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: Option<String>,
}

/// Claims read from the ID token payload.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    email: Option<String>,
    name: Option<String>,
    given_name: Option<String>,
    picture: Option<String>,
    #[serde(default)]
    email_verified: bool,
    nonce: Option<String>,
}

impl From<IdTokenClaims> for Identity {
    fn from(claims: IdTokenClaims) -> Self {
        Self {
            email: claims.email,
            name: claims.name,
            given_name: claims.given_name,
            picture: claims.picture,
            email_verified: claims.email_verified,
        }
    }
}

/// Client for the identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    inner: Arc<IdentityClientInner>,
}

struct IdentityClientInner {
    client: reqwest::Client,
    authorize_url: String,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
}

impl IdentityClient {
    /// Create a client for Google sign-in.
    #[must_use]
    pub fn google(config: &IdentityProviderConfig) -> Self {
        Self::with_endpoints(config, GOOGLE_AUTHORIZE_URL, GOOGLE_TOKEN_URL)
    }

    /// Create a client against custom endpoints.
    #[must_use]
    pub fn with_endpoints(
        config: &IdentityProviderConfig,
        authorize_url: &str,
        token_url: &str,
    ) -> Self {
        Self {
            inner: Arc::new(IdentityClientInner {
                client: reqwest::Client::new(),
                authorize_url: authorize_url.to_string(),
                token_url: token_url.to_string(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
            }),
        }
    }

    /// Generate the authorization URL for login.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after authentication
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    /// * `nonce` - A random string for `OpenID` Connect replay protection
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, nonce: &str) -> String {
        format!(
            "{}?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope={}&\
            state={}&\
            nonce={}",
            self.inner.authorize_url,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
            urlencoding::encode(nonce)
        )
    }

    /// Exchange an authorization code and return the user's identity.
    ///
    /// # Arguments
    ///
    /// * `code` - The authorization code from the OAuth callback
    /// * `redirect_uri` - The same redirect URI used in the authorization request
    /// * `expected_nonce` - The nonce stored in the session at login
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails, the response has no readable
    /// ID token, or the nonce does not match.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        expected_nonce: &str,
    ) -> Result<Identity, IdentityError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self
            .inner
            .client
            .post(&self.inner.token_url)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(IdentityError::TokenExchange(format!("{status}: {text}")));
        }

        let token: TokenResponse = response.json().await?;
        let id_token = token
            .id_token
            .ok_or_else(|| IdentityError::InvalidIdToken("missing id_token".to_string()))?;

        let claims = decode_claims(&id_token)?;
        if claims.nonce.as_deref() != Some(expected_nonce) {
            return Err(IdentityError::NonceMismatch);
        }

        Ok(claims.into())
    }
}

/// Read the payload segment of a compact JWT.
fn decode_claims(id_token: &str) -> Result<IdTokenClaims, IdentityError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| IdentityError::InvalidIdToken("not a JWT".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| IdentityError::InvalidIdToken(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| IdentityError::InvalidIdToken(e.to_string()))
}

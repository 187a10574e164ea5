//! Bearer tokens for Drive requests.
//!
//! A service account key is exchanged for a short-lived access token with the
//! JWT bearer grant; the token is cached until shortly before it expires. An
//! access token supplied by the caller is used as is.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DriveError, Result};
use crate::models::{ServiceAccountCredentials, TokenResponse};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion.
const ASSERTION_TTL: Duration = Duration::from_secs(3600);

/// Refresh this long before the cached token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Clone)]
struct IssuedToken {
    value: String,
    expires_at: SystemTime,
}

impl IssuedToken {
    fn is_fresh(&self) -> bool {
        self.expires_at > SystemTime::now() + EXPIRY_MARGIN
    }
}

#[derive(Clone)]
enum TokenSource {
    ServiceAccount(Arc<ServiceAccountCredentials>),
    Static(String),
}

/// Supplies the bearer token attached to every Drive request.
#[derive(Clone)]
pub struct Authenticator {
    source: TokenSource,
    http: Client,
    issued: Arc<RwLock<Option<IssuedToken>>>,
}

impl Authenticator {
    /// Load a service account key file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&raw)?))
    }

    pub fn new(credentials: ServiceAccountCredentials) -> Self {
        Self::with_source(TokenSource::ServiceAccount(Arc::new(credentials)))
    }

    /// Use an already issued OAuth2 access token.
    pub fn from_access_token(token: impl Into<String>) -> Self {
        Self::with_source(TokenSource::Static(token.into()))
    }

    fn with_source(source: TokenSource) -> Self {
        Self {
            source,
            http: Client::new(),
            issued: Arc::new(RwLock::new(None)),
        }
    }

    /// Current access token, exchanging a new assertion when the cached one
    /// is missing or about to expire.
    pub async fn get_access_token(&self) -> Result<String> {
        let credentials = match &self.source {
            TokenSource::Static(token) => return Ok(token.clone()),
            TokenSource::ServiceAccount(credentials) => credentials,
        };

        if let Some(token) = self.issued.read().await.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.exchange_assertion(credentials).await?;
        *self.issued.write().await = Some(token.clone());
        Ok(token.value)
    }

    async fn exchange_assertion(
        &self,
        credentials: &ServiceAccountCredentials,
    ) -> Result<IssuedToken> {
        let token_uri = credentials.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
        let assertion = sign_assertion(credentials, token_uri)?;

        debug!(client_email = %credentials.client_email, token_uri, "exchanging jwt assertion");
        let response = self
            .http
            .post(token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!("{}: {}", status, body)));
        }

        let granted: TokenResponse = response.json().await?;
        Ok(IssuedToken {
            value: granted.access_token,
            expires_at: SystemTime::now() + Duration::from_secs(granted.expires_in),
        })
    }
}

/// RS256-signed assertion for the Drive scope, addressed to `audience`.
fn sign_assertion(credentials: &ServiceAccountCredentials, audience: &str) -> Result<String> {
    let iat = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let claims = AssertionClaims {
        iss: &credentials.client_email,
        scope: DRIVE_SCOPE,
        aud: audience,
        iat,
        exp: iat + ASSERTION_TTL.as_secs(),
    };

    let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?;
    Ok(encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}

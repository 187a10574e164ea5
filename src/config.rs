//! Provider-level configuration.

use std::path::PathBuf;

use tracing::info;

use crate::auth::Authenticator;
use crate::client::{DriveClient, DRIVE_API_BASE, UPLOAD_API_BASE};
use crate::error::{DriveError, Result};

/// Environment variable holding the service account key file path.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Environment variable holding an already issued access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// How the provider reaches Google Drive.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Service account JSON key file.
    pub credentials: Option<PathBuf>,
    /// Static OAuth2 access token; wins over `credentials`.
    pub access_token: Option<String>,
    pub api_base: Option<String>,
    pub upload_base: Option<String>,
}

impl ProviderConfig {
    pub fn authenticator(&self) -> Result<Authenticator> {
        if let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Authenticator::from_access_token(token));
        }
        match &self.credentials {
            Some(path) => Authenticator::from_file(path),
            None => Err(DriveError::AuthenticationError(format!(
                "no credentials: set {} or {}",
                CREDENTIALS_ENV, ACCESS_TOKEN_ENV
            ))),
        }
    }

    /// Build the Drive client the lifecycle callbacks run against.
    pub fn configure(&self) -> Result<DriveClient> {
        let auth = self.authenticator()?;
        let api_base = self.api_base.as_deref().unwrap_or(DRIVE_API_BASE);
        let upload_base = self.upload_base.as_deref().unwrap_or(UPLOAD_API_BASE);
        info!(api_base, "configured drive client");
        Ok(DriveClient::with_base_urls(auth, api_base, upload_base))
    }
}

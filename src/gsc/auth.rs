//! Service account authentication
//!
//! Exchanges a signed JWT assertion for an OAuth access token using the
//! two-legged service account flow.

use crate::gsc::{AccessToken, TokenProvider};
use crate::{ConfigError, ReindexError, Result};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// OAuth scopes needed to read Search Console data and publish notifications
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/webmasters.readonly",
    "https://www.googleapis.com/auth/indexing",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Fields of a service account JSON key used for authentication
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Reads a service account key file
    ///
    /// # Returns
    ///
    /// * `Err(ConfigError::MissingCredentials)` - The file does not exist
    /// * `Err(ConfigError::InvalidCredentials)` - The file is not a service account key
    pub fn from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingCredentials(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::InvalidCredentials {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// `TokenProvider` backed by a service account key file
///
/// The key file is read when a token is requested, so a missing file
/// surfaces as a configuration error from `get_access_token`.
#[derive(Debug, Clone)]
pub struct ServiceAccountTokenProvider {
    credentials: PathBuf,
    token_endpoint: String,
    client: Client,
}

impl ServiceAccountTokenProvider {
    /// Creates a provider for the key at `credentials`
    ///
    /// `token_endpoint` is used unless the key file names its own `token_uri`.
    pub fn new(
        credentials: impl Into<PathBuf>,
        token_endpoint: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            credentials: credentials.into(),
            token_endpoint: token_endpoint.into(),
            client,
        }
    }

    /// Builds the signed JWT assertion for `key`
    fn assertion(&self, key: &ServiceAccountKey, audience: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &key.client_email,
            scope: SCOPES.join(" "),
            aud: audience,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            ConfigError::InvalidCredentials {
                path: self.credentials.clone(),
                message: format!("private_key is not a valid RSA key: {}", e),
            }
        })?;

        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| ReindexError::Auth(format!("Failed to sign assertion: {}", e)))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn get_access_token(&self) -> Result<AccessToken> {
        let key = ServiceAccountKey::from_file(&self.credentials)?;
        let audience = key
            .token_uri
            .clone()
            .unwrap_or_else(|| self.token_endpoint.clone());

        let assertion = self.assertion(&key, &audience)?;

        tracing::debug!("Requesting access token for {}", key.client_email);
        let response = self
            .client
            .post(&audience)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|source| ReindexError::Http {
                url: audience.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReindexError::Auth(format!(
                "Token endpoint answered HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(AccessToken::new(token.access_token))
    }
}

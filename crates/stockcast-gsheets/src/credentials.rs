//! Service-account credentials and access-token exchange.
//!
//! A signed JWT assertion is posted to the key's token endpoint; the returned
//! bearer token is cached until shortly before it expires.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetsError};
use crate::protocol::{error_message, TokenResponse};

/// Scopes requested for the token
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/drive",
];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for each assertion (Google's maximum)
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the cached token expires
const REFRESH_MARGIN_SECS: i64 = 60;

/// The fields of a service-account key file we need
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Load a key from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SheetsError::CredentialsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a key from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Claims for a token request issued at `now`
    pub fn claims(&self, scopes: &[&str], now: DateTime<Utc>) -> Claims {
        let iat = now.timestamp();
        Claims {
            iss: self.client_email.clone(),
            scope: scopes.join(" "),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }

    /// Sign an RS256 assertion for `scopes`
    pub fn assertion(&self, scopes: &[&str], now: DateTime<Utc>) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &self.claims(scopes, now), &key)?)
    }
}

/// JWT claims for the bearer-assertion grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// A bearer token and when it stops working
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token can still be used at `now`, keeping a refresh margin
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Hands out access tokens for one service account, caching the last one
#[derive(Debug)]
pub struct TokenSource {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    cached: Option<AccessToken>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            scopes: SCOPES.iter().map(|s| s.to_string()).collect(),
            cached: None,
        }
    }

    /// The service account's email
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Cached token, if still fresh at `now`
    pub fn cached(&self, now: DateTime<Utc>) -> Option<&AccessToken> {
        self.cached.as_ref().filter(|t| t.is_fresh(now))
    }

    /// Store a token response received at `now`
    pub(crate) fn store(&mut self, response: TokenResponse, now: DateTime<Utc>) -> &AccessToken {
        self.cached.insert(AccessToken {
            token: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in),
        })
    }

    /// Return a fresh token, exchanging a new assertion when needed
    pub fn token(&mut self, http: &reqwest::blocking::Client) -> Result<String> {
        let now = Utc::now();
        if let Some(token) = self.cached(now) {
            return Ok(token.token.clone());
        }

        let scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        let assertion = self.key.assertion(&scopes, now)?;
        tracing::debug!(account = %self.key.client_email, "exchanging service-account assertion");

        let resp = http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SheetsError::TokenExchange {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let response: TokenResponse = resp.json()?;
        Ok(self.store(response, now).token.clone())
    }
}

//! OAuth offline refresh-token exchange
//!
//! A plain function rather than a stateful client: every outbound call
//! exchanges the long-lived refresh credential for a short-lived bearer
//! token, so no token state is shared between calls.

use super::SourceError;
use journey_common::config::OAuthCredentials;
use serde::Deserialize;

/// Short-lived bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchange the refresh credential for an access token
pub async fn exchange_refresh_token(
    http: &reqwest::Client,
    creds: &OAuthCredentials,
) -> Result<AccessToken, SourceError> {
    let mut form = vec![
        ("grant_type", "refresh_token"),
        ("client_id", creds.client_id.as_str()),
        ("client_secret", creds.client_secret.as_str()),
        ("refresh_token", creds.refresh_token.as_str()),
    ];
    if let Some(redirect_uri) = creds.redirect_uri.as_deref() {
        form.push(("redirect_uri", redirect_uri));
    }

    let response = http
        .post(&creds.token_url)
        .form(&form)
        .send()
        .await
        .map_err(|e| SourceError::Auth(e.to_string()))?;

    let status = response.status();
    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| SourceError::Auth(format!("HTTP {}: {}", status.as_u16(), e)))?;

    if !status.is_success() {
        let reason = body
            .error_description
            .or(body.error)
            .unwrap_or_else(|| "no reason given".to_string());
        return Err(SourceError::Auth(format!("HTTP {}: {}", status.as_u16(), reason)));
    }

    match body.access_token {
        Some(token) if !token.is_empty() => {
            tracing::debug!("Obtained access token");
            Ok(AccessToken(token))
        }
        _ => Err(SourceError::Auth("Token response missing access_token".to_string())),
    }
}

//! Credential handling and the reauthorization wrapper
//!
//! The host stores a single opaque API key of the form
//! `accessToken:refreshToken`. [`TokenPair::decode`] splits it,
//! [`authorize`] optionally trades the refresh token for a fresh pair, and
//! [`with_reauthorization`] wraps a vendor operation so that one expired
//! access token is recovered transparently.

use std::future::Future;

use crate::api::TeamleaderClient;
use crate::error::{AdapterError, Result};

/// Separator between the access and refresh half of the composite API key.
const KEY_SEPARATOR: char = ':';

/// Access and refresh token for one logical operation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Split a composite API key into its two tokens.
    ///
    /// Fails with [`AdapterError::InvalidCredential`] when the separator is
    /// missing or either half is empty.
    pub fn decode(api_key: &str) -> Result<Self> {
        let mut parts = api_key.split(KEY_SEPARATOR);
        match (parts.next(), parts.next()) {
            (Some(access_token), Some(refresh_token))
                if !access_token.is_empty() && !refresh_token.is_empty() =>
            {
                Ok(Self {
                    access_token: access_token.to_string(),
                    refresh_token: refresh_token.to_string(),
                })
            }
            _ => Err(AdapterError::InvalidCredential),
        }
    }
}

/// Resolve a composite API key to a usable token pair.
///
/// With `force_refresh` set, the refresh token is traded in at the vendor's
/// token endpoint; otherwise the decoded pair is returned without network
/// I/O. The refreshed pair is not written back to the host's credential
/// store.
pub async fn authorize(
    client: &TeamleaderClient,
    api_key: &str,
    force_refresh: bool,
) -> Result<TokenPair> {
    let pair = TokenPair::decode(api_key)?;
    if !force_refresh {
        return Ok(pair);
    }

    let response = client.refresh_access_token(&pair.refresh_token).await?;
    Ok(TokenPair {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
    })
}

/// Run a vendor operation, recovering once from an expired access token.
///
/// The operation receives an access token and runs to completion. If it
/// fails with [`AdapterError::AccessTokenExpired`], the credential is
/// force-refreshed and the operation is retried exactly once with the fresh
/// access token; the second outcome is returned as-is, including a second
/// expiry. Every other error propagates immediately.
//
// TODO: hand the refreshed pair back to the host's credential store. Until
// then every call after an expiry spends the stored refresh token again and
// the credential dies once the vendor rotates it.
pub async fn with_reauthorization<T, F, Fut>(
    client: &TeamleaderClient,
    api_key: &str,
    operation: F,
) -> Result<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let pair = authorize(client, api_key, false).await?;

    match operation(pair.access_token).await {
        Err(AdapterError::AccessTokenExpired) => {
            let fresh = authorize(client, api_key, true).await?;
            operation(fresh.access_token).await
        }
        result => result,
    }
}

/// Partial, non-reversible masking of an API key for log output.
pub fn redact(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    let keep = chars.len().min(5);
    let suffix: String = chars[chars.len() - keep..].iter().collect();
    format!("...{suffix}")
}

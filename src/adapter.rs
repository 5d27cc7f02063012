//! Adapter facade for the host platform
//!
//! Validates the host-supplied configuration before any network call, runs
//! the contact operations under the reauthorization wrapper and collapses
//! internal failures into the host's coarse error classification. Vendor
//! error details end up in the log, never in the host-visible error; logged
//! keys are redacted.

use async_trait::async_trait;
use tracing::{error, warn};

use crate::api::{Endpoints, TeamleaderClient};
use crate::auth::{self, redact};
use crate::bridge::{
    Config, Contact, ContactTemplate, ContactUpdate, CrmAdapter, OAuth2CallbackQuery,
    OAuth2Credentials, ServerError,
};
use crate::config::OAuth2Config;
use crate::contacts;
use crate::error::AdapterError;

/// Contact-synchronization adapter for Teamleader.
pub struct TeamleaderAdapter {
    client: TeamleaderClient,
}

impl TeamleaderAdapter {
    /// Create an adapter against the production Teamleader hosts.
    pub fn new(oauth: OAuth2Config) -> Self {
        Self {
            client: TeamleaderClient::new(oauth),
        }
    }

    /// Create an adapter with the OAuth2 application read from the
    /// environment.
    pub fn from_env() -> Result<Self, AdapterError> {
        Ok(Self::new(OAuth2Config::from_env()?))
    }

    /// Create an adapter against custom hosts. Used by tests and staging
    /// setups.
    pub fn with_endpoints(oauth: OAuth2Config, endpoints: Endpoints) -> Self {
        Self {
            client: TeamleaderClient::with_endpoints(oauth, endpoints),
        }
    }

    /// Check the host configuration and hand out the fields every CRUD call
    /// needs. Fails with a client error before any network traffic.
    fn validate_config(config: &Config) -> Result<(&str, &str), ServerError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ServerError::new(400, "No server key provided"))?;
        let api_url = config
            .api_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ServerError::new(400, "No server url provided"))?;
        Ok((api_key, api_url))
    }

    async fn exchange_callback(
        &self,
        query: &OAuth2CallbackQuery,
    ) -> Result<OAuth2Credentials, AdapterError> {
        if query.error.is_some() {
            return Err(AdapterError::AuthorizationDenied);
        }
        let code = query
            .code
            .as_deref()
            .filter(|code| !code.is_empty())
            .ok_or(AdapterError::ConfigurationMissing("code"))?;

        let tokens = self.client.exchange_code(code).await?;
        Ok(OAuth2Credentials {
            api_key: format!("{}:{}", tokens.access_token, tokens.refresh_token),
            api_url: String::new(),
        })
    }
}

#[async_trait]
impl CrmAdapter for TeamleaderAdapter {
    async fn get_contacts(&self, config: &Config) -> Result<Vec<Contact>, ServerError> {
        let (api_key, _api_url) = Self::validate_config(config)?;
        let client = &self.client;

        auth::with_reauthorization(client, api_key, move |token| async move {
            contacts::fetch_all_contacts(client, &token).await
        })
        .await
        .map_err(|cause| {
            error!(key = %redact(api_key), %cause, "could not fetch contacts");
            ServerError::new(401, "Unauthorized")
        })
    }

    async fn create_contact(
        &self,
        config: &Config,
        contact: &ContactTemplate,
    ) -> Result<Contact, ServerError> {
        let (api_key, _api_url) = Self::validate_config(config)?;
        let client = &self.client;

        auth::with_reauthorization(client, api_key, move |token| async move {
            contacts::create_contact(client, &token, contact).await
        })
        .await
        .map_err(|cause| {
            error!(key = %redact(api_key), %cause, "could not create contact");
            ServerError::new(500, "Could not create contact")
        })
    }

    async fn update_contact(
        &self,
        config: &Config,
        _id: &str,
        contact: &ContactUpdate,
    ) -> Result<Contact, ServerError> {
        // The id also travels inside the payload; the vendor record is built
        // from there.
        let (api_key, _api_url) = Self::validate_config(config)?;
        let client = &self.client;

        auth::with_reauthorization(client, api_key, move |token| async move {
            contacts::update_contact(client, &token, contact).await
        })
        .await
        .map_err(|cause| {
            error!(key = %redact(api_key), %cause, "could not update contact");
            ServerError::new(500, "Could not update contact")
        })
    }

    async fn delete_contact(
        &self,
        config: &Config,
        id: &str,
    ) -> Result<(), ServerError> {
        let (api_key, _api_url) = Self::validate_config(config)?;
        let client = &self.client;

        auth::with_reauthorization(client, api_key, move |token| async move {
            contacts::delete_contact(client, &token, id).await
        })
        .await
        .map_err(|cause| {
            error!(key = %redact(api_key), %cause, "could not delete contact");
            ServerError::new(500, "Could not delete contact")
        })
    }

    async fn get_oauth2_redirect_url(&self) -> Result<String, ServerError> {
        self.client.authorization_url().map_err(|cause| {
            error!(%cause, "could not build authorization URL");
            ServerError::new(500, "Could not build authorization URL")
        })
    }

    async fn handle_oauth2_callback(
        &self,
        query: &OAuth2CallbackQuery,
    ) -> Result<OAuth2Credentials, ServerError> {
        self.exchange_callback(query).await.map_err(|cause| match cause {
            AdapterError::AuthorizationDenied => {
                warn!("user denied Teamleader authorization");
                ServerError::new(401, "Access denied to Teamleader")
            }
            AdapterError::ConfigurationMissing(_) => {
                ServerError::new(400, "No authorization code provided")
            }
            cause => {
                error!(%cause, "could not exchange authorization code");
                ServerError::new(401, "Unauthorized")
            }
        })
    }
}

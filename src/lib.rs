//! Teamleader Bridge - contact synchronization adapter for the Teamleader CRM
//!
//! This library implements a calling platform's CRM adapter contract against
//! the Teamleader REST API: contact list/create/update/delete plus the
//! OAuth2 authorization-code and refresh-token flows.
//!
//! # Features
//!
//! - OAuth2 authorization-code flow with a composite `access:refresh` API key
//! - Transparent single-shot token refresh when Teamleader reports an
//!   expired access token
//! - Sequential pagination over the contact listing
//! - Bidirectional mapping between the host contact shape and Teamleader's
//!
//! # Example
//!
//! ```no_run
//! use teamleader_bridge::prelude::*;
//!
//! # async fn run() -> Result<(), ServerError> {
//! let adapter = TeamleaderAdapter::new(OAuth2Config {
//!     client_id: "your-client-id".to_string(),
//!     client_secret: "your-client-secret".to_string(),
//!     redirect_url: "https://your-bridge.example.com/oauth2/callback".to_string(),
//! });
//!
//! // Send the user here to authorize the integration.
//! let url = adapter.get_oauth2_redirect_url().await?;
//! println!("Authorize at: {url}");
//!
//! // Later, with the credential minted by handle_oauth2_callback:
//! let config = Config {
//!     api_key: Some("accessToken:refreshToken".to_string()),
//!     api_url: Some("https://api.focus.teamleader.eu".to_string()),
//! };
//! let contacts = adapter.get_contacts(&config).await?;
//! println!("{} contacts", contacts.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod api;
pub mod auth;
pub mod bridge;
pub mod config;
pub mod contacts;
pub mod error;
pub mod mapping;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapter::TeamleaderAdapter;
    pub use crate::bridge::{
        Config, Contact, ContactTemplate, ContactUpdate, CrmAdapter, OAuth2CallbackQuery,
        OAuth2Credentials, PhoneNumber, PhoneNumberLabel, ServerError,
    };
    pub use crate::config::OAuth2Config;
    pub use crate::error::AdapterError;
}

//! Host-facing plugin contract
//!
//! The calling platform drives the adapter through [`CrmAdapter`] and
//! exchanges the JSON shapes defined here. Transport, scheduling and error
//! serialization are owned by the host runtime; this crate only has to
//! honor the method signatures and the host's error-code convention
//! ([`ServerError`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration handed to every CRUD call by the host.
///
/// `api_key` is the opaque composite credential returned from
/// [`CrmAdapter::handle_oauth2_callback`]; `api_url` is carried for contract
/// compatibility and not interpreted by this adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

/// Labels the host understands for phone number entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhoneNumberLabel {
    Work,
    Mobile,
    Fax,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub label: PhoneNumberLabel,
    pub phone_number: String,
}

/// A contact as the host sees it. Optional fields serialize to `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    pub contact_url: Option<String>,
    pub avatar_url: Option<String>,
    pub phone_numbers: Vec<PhoneNumber>,
}

/// Fields the host may supply when creating a contact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactTemplate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

/// An update payload: the template fields plus the id of the record to
/// change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    pub id: String,
    #[serde(flatten)]
    pub contact: ContactTemplate,
}

/// Query parameters forwarded by the host from the OAuth2 redirect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuth2CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Credential material handed back to the host after a successful OAuth2
/// callback. The host stores it verbatim and replays it as
/// [`Config::api_key`] / [`Config::api_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Credentials {
    pub api_key: String,
    pub api_url: String,
}

/// Error shape the host expects: an HTTP-like status code plus a short
/// message. Internal failure causes are deliberately not included.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct ServerError {
    pub status: u16,
    pub message: String,
}

impl ServerError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Contract between the host platform and a CRM adapter.
#[async_trait]
pub trait CrmAdapter: Send + Sync {
    /// Fetch every contact visible to the authenticated user.
    async fn get_contacts(&self, config: &Config) -> Result<Vec<Contact>, ServerError>;

    /// Create a contact and return the stored record.
    async fn create_contact(
        &self,
        config: &Config,
        contact: &ContactTemplate,
    ) -> Result<Contact, ServerError>;

    /// Update a contact and return the stored record.
    async fn update_contact(
        &self,
        config: &Config,
        id: &str,
        contact: &ContactUpdate,
    ) -> Result<Contact, ServerError>;

    /// Delete a contact by id.
    async fn delete_contact(&self, config: &Config, id: &str) -> Result<(), ServerError>;

    /// URL users are sent to in order to authorize the integration.
    async fn get_oauth2_redirect_url(&self) -> Result<String, ServerError>;

    /// Handle the redirect back from the vendor and mint the credential the
    /// host will store.
    async fn handle_oauth2_callback(
        &self,
        query: &OAuth2CallbackQuery,
    ) -> Result<OAuth2Credentials, ServerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_serializes_camel_case_with_nulls() {
        let contact = Contact {
            id: "42".to_string(),
            first_name: None,
            last_name: Some("Doe".to_string()),
            email: Some("d@x.com".to_string()),
            organization: None,
            contact_url: None,
            avatar_url: None,
            phone_numbers: vec![PhoneNumber {
                label: PhoneNumberLabel::Work,
                phone_number: "+4930123456".to_string(),
            }],
        };

        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value["firstName"], serde_json::Value::Null);
        assert_eq!(value["lastName"], "Doe");
        assert_eq!(value["phoneNumbers"][0]["label"], "WORK");
        assert_eq!(value["phoneNumbers"][0]["phoneNumber"], "+4930123456");
    }

    #[test]
    fn test_contact_update_flattens_template_fields() {
        let update: ContactUpdate = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "firstName": "Max",
            "lastName": "Mustermann",
            "email": "max@example.com",
            "phoneNumbers": [{"label": "MOBILE", "phoneNumber": "+491701234567"}]
        }))
        .unwrap();

        assert_eq!(update.id, "abc");
        assert_eq!(update.contact.first_name.as_deref(), Some("Max"));
        assert_eq!(update.contact.phone_numbers[0].label, PhoneNumberLabel::Mobile);
    }

    #[test]
    fn test_callback_query_tolerates_missing_fields() {
        let query: OAuth2CallbackQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.code.is_none());
        assert!(query.error.is_none());
    }
}

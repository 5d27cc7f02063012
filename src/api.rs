//! Teamleader REST client
//!
//! All vendor traffic goes through [`TeamleaderClient`]. Responses are
//! classified exactly once, at the HTTP boundary: the expired-token signal
//! and non-2xx failures become typed errors, everything else is a success
//! payload that the endpoint wrappers deserialize. Callers never have to
//! infer the outcome from the shape of the body.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::config::OAuth2Config;
use crate::error::{AdapterError, Result};

/// Teamleader serves contact data, the authorization flow and token refresh
/// on three different hosts.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// REST API, e.g. `contacts.list`.
    pub api_base: String,
    /// Authorization page and authorization-code exchange.
    pub auth_base: String,
    /// Refresh-token exchange.
    pub account_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: "https://api.focus.teamleader.eu".to_string(),
            auth_base: "https://focus.teamleader.eu".to_string(),
            account_base: "https://app.teamleader.eu".to_string(),
        }
    }
}

/// Contacts are fetched in fixed-size pages.
pub const CONTACTS_PAGE_SIZE: usize = 20;

/// A contact in Teamleader's own shape. The same struct is used for
/// reading and writing; absent `id`/`emails` are omitted on the wire so the
/// vendor can tell a create from an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<VendorEmail>>,
    #[serde(default)]
    pub telephones: Vec<VendorTelephone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorEmail {
    #[serde(rename = "type")]
    pub kind: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorTelephone {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

/// Body of the vendor's token endpoint, for both the initial code exchange
/// and the refresh-token grant.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ContactListResponse {
    data: Vec<VendorContact>,
}

#[derive(Debug, Deserialize)]
struct ContactResponse {
    data: VendorContact,
}

#[derive(Debug, Deserialize)]
struct ResourceResponse {
    #[serde(default)]
    data: Option<ResourceRef>,
}

#[derive(Debug, Deserialize)]
struct ResourceRef {
    id: String,
}

/// HTTP client for the Teamleader API.
pub struct TeamleaderClient {
    http: Client,
    oauth: OAuth2Config,
    endpoints: Endpoints,
}

impl TeamleaderClient {
    /// Create a client against the production Teamleader hosts.
    pub fn new(oauth: OAuth2Config) -> Self {
        Self::with_endpoints(oauth, Endpoints::default())
    }

    /// Create a client against custom hosts. Used by tests and staging
    /// setups.
    pub fn with_endpoints(oauth: OAuth2Config, endpoints: Endpoints) -> Self {
        Self {
            http: Client::new(),
            oauth,
            endpoints,
        }
    }

    /// Fetch one page of contacts. An empty page means the listing is
    /// exhausted.
    pub async fn list_contacts_page(
        &self,
        access_token: &str,
        page: u32,
    ) -> Result<Vec<VendorContact>> {
        let body = json!({
            "page": { "size": CONTACTS_PAGE_SIZE, "number": page }
        });
        let url = format!("{}/contacts.list", self.endpoints.api_base);
        let (_, payload) = self.call(&url, Some(access_token), body).await?;
        let response: ContactListResponse = serde_json::from_value(payload)?;
        Ok(response.data)
    }

    /// Fetch a single contact by id.
    pub async fn get_contact(&self, access_token: &str, id: &str) -> Result<VendorContact> {
        let url = format!("{}/contacts.info", self.endpoints.api_base);
        let (_, payload) = self.call(&url, Some(access_token), json!({ "id": id })).await?;
        let response: ContactResponse = serde_json::from_value(payload)?;
        Ok(response.data)
    }

    /// Create a contact and return the id assigned by Teamleader.
    pub async fn add_contact(&self, access_token: &str, contact: &VendorContact) -> Result<String> {
        let url = format!("{}/contacts.add", self.endpoints.api_base);
        let body = serde_json::to_value(contact)?;
        let (_, payload) = self.call(&url, Some(access_token), body).await?;
        let response: ResourceResponse = serde_json::from_value(payload)?;
        response
            .data
            .map(|resource| resource.id)
            .ok_or_else(|| {
                AdapterError::MappingFailed("create response carried no contact id".to_string())
            })
    }

    /// Update a contact. Teamleader acknowledges with HTTP 204.
    pub async fn update_contact(&self, access_token: &str, contact: &VendorContact) -> Result<()> {
        let url = format!("{}/contacts.update", self.endpoints.api_base);
        let body = serde_json::to_value(contact)?;
        let (status, payload) = self.call(&url, Some(access_token), body).await?;
        expect_no_content(status, payload)
    }

    /// Delete a contact. Teamleader acknowledges with HTTP 204.
    pub async fn delete_contact(&self, access_token: &str, id: &str) -> Result<()> {
        let url = format!("{}/contacts.delete", self.endpoints.api_base);
        let (status, payload) = self.call(&url, Some(access_token), json!({ "id": id })).await?;
        expect_no_content(status, payload)
    }

    /// Exchange an authorization code for a token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let url = format!("{}/oauth2/access_token", self.endpoints.auth_base);
        let body = json!({
            "code": code,
            "redirect_uri": self.oauth.redirect_url,
            "client_id": self.oauth.client_id,
            "client_secret": self.oauth.client_secret,
            "grant_type": "authorization_code",
        });
        let (_, payload) = self.call(&url, None, body).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Trade a refresh token for a fresh token pair.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        let url = format!("{}/oauth2/access_token", self.endpoints.account_base);
        let body = json!({
            "refresh_token": refresh_token,
            "client_id": self.oauth.client_id,
            "client_secret": self.oauth.client_secret,
            "grant_type": "refresh_token",
        });
        let (_, payload) = self.call(&url, None, body).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Authorization URL users are redirected to. Pure construction, no
    /// network call.
    pub fn authorization_url(&self) -> Result<String> {
        let mut url = Url::parse(&format!("{}/oauth2/authorize", self.endpoints.auth_base))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.oauth.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.oauth.redirect_url);
        Ok(url.into())
    }

    /// Issue a request and classify the response.
    ///
    /// The expired-token signal wins over the status code because Teamleader
    /// reports it as a regular error body on a 4xx response.
    async fn call(
        &self,
        url: &str,
        access_token: Option<&str>,
        body: Value,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.http.post(url).json(&body);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if text.trim().is_empty() {
            if !status.is_success() {
                return Err(AdapterError::VendorRequestFailed {
                    status: status.as_u16(),
                    body: text,
                });
            }
            return Ok((status, Value::Null));
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(payload) => {
                if is_access_token_expired(&payload) {
                    Err(AdapterError::AccessTokenExpired)
                } else if !status.is_success() {
                    Err(AdapterError::VendorRequestFailed {
                        status: status.as_u16(),
                        body: text,
                    })
                } else {
                    Ok((status, payload))
                }
            }
            Err(parse_error) => {
                if !status.is_success() {
                    Err(AdapterError::VendorRequestFailed {
                        status: status.as_u16(),
                        body: text,
                    })
                } else {
                    Err(parse_error.into())
                }
            }
        }
    }
}

fn expect_no_content(status: StatusCode, payload: Value) -> Result<()> {
    if status == StatusCode::NO_CONTENT {
        Ok(())
    } else {
        Err(AdapterError::VendorRequestFailed {
            status: status.as_u16(),
            body: payload.to_string(),
        })
    }
}

/// The only expiry signal Teamleader gives is an error entry whose title
/// mentions the access token; there is no machine-readable code. The string
/// match is confined to this function.
fn is_access_token_expired(body: &Value) -> bool {
    body.get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors.iter().any(|error| {
                error
                    .get("title")
                    .and_then(Value::as_str)
                    .is_some_and(|title| title.contains("Access token"))
            })
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_oauth_config() -> OAuth2Config {
        OAuth2Config {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            redirect_url: "https://bridge.example.com/oauth2/callback".to_string(),
        }
    }

    fn test_client(server: &MockServer) -> TeamleaderClient {
        TeamleaderClient::with_endpoints(
            test_oauth_config(),
            Endpoints {
                api_base: server.uri(),
                auth_base: server.uri(),
                account_base: server.uri(),
            },
        )
    }

    fn expired_token_body() -> serde_json::Value {
        json!({
            "errors": [
                { "title": "Access token has expired", "status": 401 }
            ]
        })
    }

    #[tokio::test]
    async fn test_expired_token_body_classified_before_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts.list"))
            .respond_with(ResponseTemplate::new(401).set_body_json(expired_token_body()))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.list_contacts_page("stale-token", 1).await;

        assert!(matches!(result, Err(AdapterError::AccessTokenExpired)));
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_vendor_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts.list"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.list_contacts_page("token", 1).await;

        match result {
            Err(AdapterError::VendorRequestFailed { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("boom"));
            }
            other => panic!("expected VendorRequestFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_page_requests_twenty_records() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts.list"))
            .and(body_partial_json(json!({"page": {"size": 20, "number": 3}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let page = client.list_contacts_page("token", 3).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_add_contact_returns_created_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts.add"))
            .and(body_partial_json(json!({"last_name": "Doe"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "type": "contact", "id": "fresh-id" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let contact = VendorContact {
            last_name: Some("Doe".to_string()),
            ..VendorContact::default()
        };
        let id = client.add_contact("token", &contact).await.unwrap();
        assert_eq!(id, "fresh-id");
    }

    #[tokio::test]
    async fn test_add_contact_without_id_in_response_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts.add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.add_contact("token", &VendorContact::default()).await;
        assert!(matches!(result, Err(AdapterError::MappingFailed(_))));
    }

    #[tokio::test]
    async fn test_update_contact_accepts_204_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts.update"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/contacts.delete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let contact = VendorContact {
            id: Some("42".to_string()),
            ..VendorContact::default()
        };
        client.update_contact("token", &contact).await.unwrap();

        let result = client.delete_contact("token", "42").await;
        assert!(matches!(
            result,
            Err(AdapterError::VendorRequestFailed { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn test_exchange_code_posts_authorization_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/access_token"))
            .and(body_partial_json(json!({
                "grant_type": "authorization_code",
                "code": "the-code",
                "client_id": "test-client",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "access",
                "refresh_token": "refresh",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let tokens = client.exchange_code("the-code").await.unwrap();
        assert_eq!(tokens.access_token, "access");
        assert_eq!(tokens.refresh_token, "refresh");
    }

    #[tokio::test]
    async fn test_refresh_posts_refresh_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/access_token"))
            .and(body_partial_json(json!({
                "grant_type": "refresh_token",
                "refresh_token": "old-refresh",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "new-access",
                "refresh_token": "new-refresh",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let tokens = client.refresh_access_token("old-refresh").await.unwrap();
        assert_eq!(tokens.access_token, "new-access");
        assert_eq!(tokens.refresh_token, "new-refresh");
    }

    #[test]
    fn test_authorization_url_contains_client_and_redirect() {
        let client = TeamleaderClient::new(test_oauth_config());
        let url = client.authorization_url().unwrap();

        assert!(url.starts_with("https://focus.teamleader.eu/oauth2/authorize?"));
        assert!(url.contains("client_id=test-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fbridge.example.com%2Foauth2%2Fcallback"
        ));
    }

    #[test]
    fn test_vendor_contact_omits_absent_id_and_emails() {
        let contact = VendorContact {
            first_name: Some("Max".to_string()),
            last_name: Some("Mustermann".to_string()),
            ..VendorContact::default()
        };
        let value = serde_json::to_value(&contact).unwrap();

        assert!(value.get("id").is_none());
        assert!(value.get("emails").is_none());
        assert_eq!(value["telephones"], json!([]));
        assert_eq!(value["first_name"], "Max");
    }

    #[test]
    fn test_expiry_detection_requires_matching_title() {
        assert!(is_access_token_expired(&expired_token_body()));
        assert!(!is_access_token_expired(&json!({
            "errors": [{ "title": "Rate limit exceeded", "status": 429 }]
        })));
        assert!(!is_access_token_expired(&json!({"data": []})));
        assert!(!is_access_token_expired(&json!("errors")));
    }
}

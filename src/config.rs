//! OAuth2 application configuration
//!
//! The registered client credentials are loaded once at startup and handed
//! to [`TeamleaderClient`](crate::api::TeamleaderClient) explicitly. Nothing
//! in the call path reads the process environment.

use crate::error::{AdapterError, Result};

/// Credentials of the OAuth2 application registered with Teamleader.
#[derive(Debug, Clone)]
pub struct OAuth2Config {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered for the application; users land here after
    /// granting or denying consent.
    pub redirect_url: String,
}

impl OAuth2Config {
    /// Load the configuration from the environment.
    ///
    /// Reads `TEAMLEADER_CLIENT_ID`, `TEAMLEADER_CLIENT_SECRET` and
    /// `TEAMLEADER_REDIRECT_URL`. A missing or empty variable is a fatal
    /// configuration error, raised before any network call is made.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: require_env("TEAMLEADER_CLIENT_ID")?,
            client_secret: require_env("TEAMLEADER_CLIENT_SECRET")?,
            redirect_url: require_env("TEAMLEADER_REDIRECT_URL")?,
        })
    }
}

fn require_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AdapterError::ConfigurationMissing(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because the process environment is shared between test
    // threads.
    #[test]
    fn test_from_env() {
        std::env::set_var("TEAMLEADER_CLIENT_ID", "client-id");
        std::env::set_var("TEAMLEADER_CLIENT_SECRET", "client-secret");
        std::env::set_var("TEAMLEADER_REDIRECT_URL", "https://bridge.example.com/oauth2/callback");

        let config = OAuth2Config::from_env().unwrap();
        assert_eq!(config.client_id, "client-id");
        assert_eq!(config.client_secret, "client-secret");
        assert_eq!(config.redirect_url, "https://bridge.example.com/oauth2/callback");

        std::env::remove_var("TEAMLEADER_CLIENT_ID");
        let err = OAuth2Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            AdapterError::ConfigurationMissing("TEAMLEADER_CLIENT_ID")
        ));

        std::env::set_var("TEAMLEADER_CLIENT_ID", "   ");
        let err = OAuth2Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            AdapterError::ConfigurationMissing("TEAMLEADER_CLIENT_ID")
        ));

        std::env::remove_var("TEAMLEADER_CLIENT_ID");
        std::env::remove_var("TEAMLEADER_CLIENT_SECRET");
        std::env::remove_var("TEAMLEADER_REDIRECT_URL");
    }
}

//! RPC provider configuration

use crate::error::{ConfigError, RpcError};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// How requests to a provider are authenticated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProviderAuth {
    /// No authentication
    #[default]
    None,
    /// `Authorization: Basic base64(login:password)`
    Basic { login: String, password: String },
    /// Token carried as the URL query string
    Token { token: String },
}

/// Configuration for a single RPC provider
///
/// On disk a provider uses the flat shape
/// `{"name", "url", "enabled", "authType", "authLogin", "authPassword", "authToken"}`;
/// deserialization validates it into this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProviderRecord", into = "ProviderRecord")]
pub struct Provider {
    /// Provider name, unique within a chain
    pub name: String,
    /// RPC URL
    pub url: String,
    /// Whether this provider takes part in validation
    pub enabled: bool,
    /// Authentication scheme
    pub auth: ProviderAuth,
}

impl Provider {
    /// Create an enabled provider without authentication
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: true,
            auth: ProviderAuth::None,
        }
    }

    /// Builder-style setter for basic auth
    pub fn with_basic_auth(mut self, login: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = ProviderAuth::Basic {
            login: login.into(),
            password: password.into(),
        };
        self
    }

    /// Builder-style setter for token auth
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth = ProviderAuth::Token {
            token: token.into(),
        };
        self
    }

    /// Builder-style setter for the enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check required fields and credentials
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField("provider name".to_string()));
        }
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "url for provider {}",
                self.name
            )));
        }

        let url = Url::parse(&self.url).map_err(|e| {
            ConfigError::Invalid(format!("provider {} url {}: {}", self.name, self.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "provider {} url must be http or https, got {}",
                self.name,
                url.scheme()
            )));
        }

        match &self.auth {
            ProviderAuth::None => {}
            ProviderAuth::Basic { login, password } => {
                if login.is_empty() || password.is_empty() {
                    return Err(ConfigError::MissingField(format!(
                        "authLogin/authPassword for provider {}",
                        self.name
                    )));
                }
            }
            ProviderAuth::Token { token } => {
                if token.is_empty() {
                    return Err(ConfigError::MissingField(format!(
                        "authToken for provider {}",
                        self.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// URL to send requests to, with token auth applied
    pub fn request_url(&self) -> Result<Url, RpcError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| RpcError::Serialize(format!("invalid url {}: {}", self.url, e)))?;
        if let ProviderAuth::Token { token } = &self.auth {
            url.set_query(Some(token));
        }
        Ok(url)
    }
}

/// Wire form of the authentication type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum AuthType {
    #[default]
    #[serde(rename = "no-auth")]
    NoAuth,
    #[serde(rename = "basic-auth")]
    BasicAuth,
    #[serde(rename = "token-auth")]
    TokenAuth,
}

/// Flat on-disk provider record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRecord {
    name: String,
    url: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    auth_type: AuthType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    auth_login: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    auth_password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    auth_token: String,
}

fn default_enabled() -> bool {
    true
}

impl TryFrom<ProviderRecord> for Provider {
    type Error = ConfigError;

    fn try_from(record: ProviderRecord) -> Result<Self, Self::Error> {
        let auth = match record.auth_type {
            AuthType::NoAuth => ProviderAuth::None,
            AuthType::BasicAuth => ProviderAuth::Basic {
                login: record.auth_login,
                password: record.auth_password,
            },
            AuthType::TokenAuth => ProviderAuth::Token {
                token: record.auth_token,
            },
        };

        let provider = Provider {
            name: record.name,
            url: record.url,
            enabled: record.enabled,
            auth,
        };
        provider.validate()?;
        Ok(provider)
    }
}

impl From<Provider> for ProviderRecord {
    fn from(provider: Provider) -> Self {
        let mut record = ProviderRecord {
            name: provider.name,
            url: provider.url,
            enabled: provider.enabled,
            auth_type: AuthType::NoAuth,
            auth_login: String::new(),
            auth_password: String::new(),
            auth_token: String::new(),
        };

        match provider.auth {
            ProviderAuth::None => {}
            ProviderAuth::Basic { login, password } => {
                record.auth_type = AuthType::BasicAuth;
                record.auth_login = login;
                record.auth_password = password;
            }
            ProviderAuth::Token { token } => {
                record.auth_type = AuthType::TokenAuth;
                record.auth_token = token;
            }
        }

        record
    }
}

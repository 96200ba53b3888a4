use std::fmt;
use url::Url;

use crate::errors::ConfigError;

pub const SERVICE_ID_VAR: &str = "MICROCMS_SERVICE_ID";
pub const API_KEY_VAR: &str = "MICROCMS_API_KEY";
pub const BASE_URL_VAR: &str = "MICROCMS_BASE_URL";

pub const DEFAULT_API_HOST: &str = "microcms.io";

/// Content API settings, resolved once at startup and passed to
/// [`ContentClient::new`](crate::ContentClient::new).
#[derive(Clone)]
pub struct ClientConfig {
    pub service_id: String,
    pub api_key: String,
    pub api_host: String,
    /// Replaces the `https://<service_id>.<api_host>/api/v1` endpoint when set.
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new(
        service_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let service_id = required(SERVICE_ID_VAR, Some(service_id.into()))?;
        let api_key = required(API_KEY_VAR, Some(api_key.into()))?;

        Ok(Self {
            service_id,
            api_key,
            api_host: DEFAULT_API_HOST.to_string(),
            base_url: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Resolves the configuration from an arbitrary variable source. Blank
    /// values count as missing.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_id = required(SERVICE_ID_VAR, lookup(SERVICE_ID_VAR))?;
        let api_key = required(API_KEY_VAR, lookup(API_KEY_VAR))?;
        let base_url = lookup(BASE_URL_VAR).filter(|url| !url.trim().is_empty());

        Ok(Self {
            service_id,
            api_key,
            api_host: DEFAULT_API_HOST.to_string(),
            base_url,
        })
    }

    /// Root of the content API, without a trailing slash.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        let raw = match &self.base_url {
            Some(base_url) => base_url.trim_end_matches('/').to_string(),
            None => {
                if !is_subdomain_label(&self.service_id) {
                    return Err(ConfigError::InvalidBaseUrl(format!(
                        "service id {:?} is not a valid subdomain",
                        self.service_id
                    )));
                }
                format!("https://{}.{}/api/v1", self.service_id, self.api_host)
            }
        };

        let url = Url::parse(&raw)
            .map_err(|err| ConfigError::InvalidBaseUrl(format!("{raw}: {err}")))?;

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl(raw));
        }

        Ok(url)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("service_id", &self.service_id)
            .field("api_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn is_subdomain_label(value: &str) -> bool {
    !value.starts_with('-')
        && !value.ends_with('-')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

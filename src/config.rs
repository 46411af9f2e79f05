//! Login configuration: timeouts, redirect bound, provider endpoint.

use serde::Deserialize;
use url::Url;

use crate::constants::{
    CONNECT_TIMEOUT_SECS, MAX_REDIRECTS, MAX_REDIRECTS_LIMIT, READ_TIMEOUT_SECS,
    STEAM_OPENID_LOGIN_URL,
};
use crate::error::LoginError;
use crate::user_agent;

/// Settings for a [`crate::SteamOpenIdLogin`].
///
/// Deserializable so callers can embed it in their own config files; every
/// field is optional there and falls back to [`LoginConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// TCP/TLS connect timeout in seconds (1..=3600).
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds (1..=3600).
    pub read_timeout_secs: u64,
    /// Redirects followed per request before failing (0..=50).
    pub max_redirects: usize,
    /// Endpoint receiving the resubmitted OpenID form.
    pub provider_login_url: String,
    /// Host treated as the identity provider when classifying HTTP failures.
    /// `None` uses the host of `provider_login_url`.
    pub provider_host: Option<String>,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            max_redirects: MAX_REDIRECTS,
            provider_login_url: STEAM_OPENID_LOGIN_URL.to_string(),
            provider_host: None,
            user_agent: user_agent::default_login_user_agent(),
        }
    }
}

impl LoginConfig {
    /// Points the flow at a different provider endpoint (used by integration tests).
    #[must_use]
    pub fn with_provider_login_url(mut self, url: impl Into<String>) -> Self {
        self.provider_login_url = url.into();
        self
    }

    /// Overrides the host considered to be the identity provider.
    #[must_use]
    pub fn with_provider_host(mut self, host: impl Into<String>) -> Self {
        self.provider_host = Some(host.into());
        self
    }

    /// Sets connect and read timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }

    /// Sets the redirect bound.
    #[must_use]
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Validates values and returns the parsed provider endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::InvalidConfig`] for out-of-range timeouts or
    /// redirect bound, an unparseable or host-less provider URL, or an empty
    /// provider host override.
    pub fn validate(&self) -> Result<Url, LoginError> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        if self.max_redirects > MAX_REDIRECTS_LIMIT {
            return Err(LoginError::invalid_config(
                "max_redirects",
                format!(
                    "{}. Expected range: 0..={MAX_REDIRECTS_LIMIT}",
                    self.max_redirects
                ),
            ));
        }

        let url = Url::parse(&self.provider_login_url).map_err(|error| {
            LoginError::invalid_config(
                "provider_login_url",
                format!("{}: {error}", self.provider_login_url),
            )
        })?;
        if url.host_str().is_none() {
            return Err(LoginError::invalid_config(
                "provider_login_url",
                format!("{} has no host", self.provider_login_url),
            ));
        }

        if let Some(host) = &self.provider_host
            && host.trim().is_empty()
        {
            return Err(LoginError::invalid_config(
                "provider_host",
                "must not be empty",
            ));
        }

        Ok(url)
    }

    /// Returns the lowercased provider host: the override, else the endpoint's host.
    #[must_use]
    pub fn effective_provider_host(&self, provider_login_url: &Url) -> String {
        self.provider_host
            .as_deref()
            .or_else(|| provider_login_url.host_str())
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), LoginError> {
    if !(1..=3600).contains(&value) {
        return Err(LoginError::invalid_config(
            field,
            format!("{value}. Expected range: 1..=3600"),
        ));
    }
    Ok(())
}

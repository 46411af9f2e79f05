//! Shared User-Agent string for login requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/steam-openid-login";

/// Default User-Agent for both the relying-party GET and the provider POST.
#[must_use]
pub(crate) fn default_login_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("steam-openid-login/{version} (+{PROJECT_UA_URL})")
}

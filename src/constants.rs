//! Constants for the login flow (provider endpoint, timeouts, redirect bound).

/// Steam's OpenID endpoint that receives the resubmitted auto-submit form.
pub const STEAM_OPENID_LOGIN_URL: &str = "https://steamcommunity.com/openid/login";

/// Host that counts as "reached Steam" when classifying HTTP failures.
pub const STEAM_HOST: &str = "steamcommunity.com";

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (30 seconds). Both pages are small HTML documents.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Default number of redirects followed per request before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Upper bound accepted for `max_redirects` in [`crate::LoginConfig`].
pub const MAX_REDIRECTS_LIMIT: usize = 50;

/// Element id of the provider's sign-in form (caller is not authenticated).
pub const LOGIN_FORM_ID: &str = "loginForm";

/// Element id of the provider's auto-submit OpenID form.
pub const OPENID_FORM_ID: &str = "openidForm";

/// Separator used both to join request cookies and to split `Set-Cookie` values.
pub const COOKIE_SEPARATOR: &str = "; ";

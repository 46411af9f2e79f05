//! Error types for the login flow.
//!
//! The first three variants are the domain failures a caller is expected to
//! branch on. Transport failures that happened on the provider host pass
//! through as [`LoginError::Http`] with the original `reqwest::Error` intact.

use thiserror::Error;

/// Errors that can occur while logging into an OpenID relying party.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The provider answered with its sign-in page (`#loginForm`).
    ///
    /// The supplied cookies are missing, stale, or belong to a logged-out session.
    #[error("you are not signed in to steam")]
    NotAuthenticated,

    /// The page did not contain exactly one `#openidForm` element.
    #[error("could not find openid login form (found {found} matching elements)")]
    OpenIdFormNotFound {
        /// Number of elements with id `openidForm` in the page.
        found: usize,
    },

    /// An HTTP failure happened somewhere other than the provider host.
    ///
    /// Usually means the relying-party URL never started an OpenID flow toward Steam.
    #[error("was not redirected to steam, make sure the url is correct")]
    NotRedirectedToSteam {
        /// Host of the final request URL, when one was known.
        final_host: Option<String>,
    },

    /// Transport or status failure on the provider host, passed through unchanged.
    #[error(transparent)]
    Http(reqwest::Error),

    /// Redirect chain exceeded the configured bound on the provider host.
    #[error("too many redirects (limit {limit}) while requesting {url}")]
    TooManyRedirects {
        /// URL of the last hop that still answered with a redirect.
        url: String,
        /// Configured redirect limit.
        limit: usize,
    },

    /// A redirect on the provider host had no readable `Location` header.
    #[error("redirect {status} from {url} has no usable Location header")]
    MissingRedirectLocation {
        /// URL that answered with the redirect.
        url: String,
        /// Redirect status code.
        status: u16,
    },

    /// The caller URL or a redirect `Location` could not be parsed as a URL.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
    },

    /// A supplied cookie contains bytes that cannot appear in a `Cookie` header.
    #[error("cookies contain characters not allowed in an HTTP header")]
    InvalidCookieHeader,

    /// A [`crate::LoginConfig`] value failed validation.
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig {
        /// Config field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Builder failure description.
        reason: String,
    },
}

impl LoginError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid config error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Creates a "not redirected to steam" error for the given final host.
    pub fn not_redirected(final_host: Option<&str>) -> Self {
        Self::NotRedirectedToSteam {
            final_host: final_host.map(str::to_string),
        }
    }

    /// Returns the HTTP status of a passed-through status error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}

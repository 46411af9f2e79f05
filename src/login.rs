//! Login orchestrator: relying-party GET, form resubmission, cookie merge.
//!
//! Every request carries the caller's joined cookies. Redirects are followed
//! by hand (bounded by [`LoginConfig::max_redirects`]) so the `Cookie` header
//! is re-attached on each hop, including the hop from the relying party to
//! the provider. HTTP-layer failures are classified by the host of the final
//! request: off the provider they become [`LoginError::NotRedirectedToSteam`],
//! on the provider the original error is returned unchanged.

use std::fmt;

use reqwest::header::{COOKIE, HeaderValue, LOCATION};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::LoginConfig;
use crate::cookies::{CookieHeader, collect_set_cookies, merge_cookies};
use crate::error::LoginError;
use crate::form::OpenIdForm;
use crate::html::HtmlDocument;
use crate::http_client::build_login_http_client;

/// Input to a login: the relying party's OpenID login URL and provider cookies.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// Absolute URL that starts the OpenID flow on the target site.
    pub url: String,
    /// `name=value` cookies authenticated against the provider, in header order.
    pub cookies: Vec<String>,
}

impl LoginRequest {
    /// Creates a request from a URL and cookies.
    pub fn new<S: Into<String>>(url: impl Into<String>, cookies: impl IntoIterator<Item = S>) -> Self {
        Self {
            url: url.into(),
            cookies: cookies.into_iter().map(Into::into).collect(),
        }
    }
}

// Cookie values are session secrets.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("url", &self.url)
            .field("cookies", &format_args!("[{} REDACTED]", self.cookies.len()))
            .finish()
    }
}

/// Performs Steam OpenID logins with a fixed configuration.
///
/// Holds no per-login state; one instance can serve concurrent logins.
///
/// # Example
///
/// ```no_run
/// use steam_openid::{LoginConfig, LoginRequest, SteamOpenIdLogin};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let login = SteamOpenIdLogin::new(LoginConfig::default())?;
/// let request = LoginRequest::new(
///     "https://example.com/auth/steam",
///     ["steamLoginSecure=...", "sessionid=..."],
/// );
/// let cookies = login.login(&request).await?;
/// println!("{} cookies", cookies.len());
/// # Ok(())
/// # }
/// ```
pub struct SteamOpenIdLogin {
    client: Client,
    max_redirects: usize,
    provider_login_url: Url,
    provider_host: String,
}

impl fmt::Debug for SteamOpenIdLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamOpenIdLogin")
            .field("provider_login_url", &self.provider_login_url.as_str())
            .field("provider_host", &self.provider_host)
            .field("max_redirects", &self.max_redirects)
            .finish_non_exhaustive()
    }
}

impl SteamOpenIdLogin {
    /// Validates `config` and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::InvalidConfig`] or [`LoginError::ClientBuild`].
    #[instrument(level = "debug", skip(config))]
    pub fn new(config: LoginConfig) -> Result<Self, LoginError> {
        let provider_login_url = config.validate()?;
        let client = build_login_http_client(&config)?;
        Ok(Self {
            client,
            max_redirects: config.max_redirects,
            provider_host: config.effective_provider_host(&provider_login_url),
            provider_login_url,
        })
    }

    /// Logs into the relying party and returns the merged cookies.
    ///
    /// The result is `request.cookies` followed by every `Set-Cookie` piece
    /// received while submitting the form, in order, without deduplication.
    /// That covers the provider's response and every hop of its redirect
    /// chain back to the relying party, so a session cookie set on a 302
    /// callback is kept.
    ///
    /// # Errors
    ///
    /// - [`LoginError::InvalidUrl`] if `request.url` is not an absolute URL
    /// - [`LoginError::InvalidCookieHeader`] if a cookie is not header-safe
    /// - [`LoginError::NotAuthenticated`] if the provider shows its sign-in page
    /// - [`LoginError::OpenIdFormNotFound`] unless exactly one `#openidForm` exists
    /// - [`LoginError::NotRedirectedToSteam`] for HTTP failures off the provider host
    /// - [`LoginError::Http`], [`LoginError::TooManyRedirects`] or
    ///   [`LoginError::MissingRedirectLocation`] for HTTP failures on the
    ///   provider host
    #[instrument(skip(self, request), fields(url = %request.url, cookies = request.cookies.len()))]
    pub async fn login(&self, request: &LoginRequest) -> Result<Vec<String>, LoginError> {
        let target = Url::parse(&request.url).map_err(|_| LoginError::invalid_url(&request.url))?;
        let cookie = CookieHeader::join(&request.cookies)
            .to_header_value()
            .map_err(|_| LoginError::InvalidCookieHeader)?;

        let Fetched { response: page, .. } = self
            .fetch(Hop::Get, target, &cookie)
            .await
            .map_err(|failure| self.classify(failure))?;
        let page_url = page.url().clone();
        let body = page.text().await.map_err(|source| {
            self.classify(HttpFailure::Body {
                url: page_url,
                source,
            })
        })?;

        let form = OpenIdForm::from_document(&HtmlDocument::parse(&body))?;

        let Fetched {
            response,
            redirect_cookies,
        } = self
            .fetch(Hop::PostForm(&form), self.provider_login_url.clone(), &cookie)
            .await
            .map_err(|failure| self.classify(failure))?;

        let mut issued = redirect_cookies;
        issued.extend(collect_set_cookies(response.headers()));
        if issued.is_empty() {
            warn!("provider response carried no Set-Cookie header");
        }
        let merged = merge_cookies(&request.cookies, issued);
        debug!(
            returned = merged.len(),
            issued = merged.len() - request.cookies.len(),
            "OpenID login complete"
        );
        Ok(merged)
    }

    /// Sends one logical request, following redirects by hand.
    ///
    /// Returns the final non-redirect response, plus the `Set-Cookie` pieces of
    /// every redirect hop before it; 4xx/5xx statuses are errors.
    #[instrument(level = "debug", skip(self, hop, cookie), fields(url = %url))]
    async fn fetch(
        &self,
        mut hop: Hop<'_>,
        mut url: Url,
        cookie: &HeaderValue,
    ) -> Result<Fetched, HttpFailure> {
        let mut redirects = 0;
        let mut redirect_cookies = Vec::new();
        loop {
            let builder = match hop {
                Hop::Get => self.client.get(url.clone()),
                Hop::PostForm(form) => self
                    .client
                    .post(url.clone())
                    .multipart(form.to_multipart()),
            };
            let response = builder
                .header(COOKIE, cookie.clone())
                .send()
                .await
                .map_err(HttpFailure::Request)?;

            let status = response.status();
            if !is_followed_redirect(status) {
                debug!(status = status.as_u16(), url = %response.url(), "final response");
                let response = response.error_for_status().map_err(HttpFailure::Request)?;
                return Ok(Fetched {
                    response,
                    redirect_cookies,
                });
            }

            if redirects == self.max_redirects {
                return Err(HttpFailure::TooManyRedirects {
                    url,
                    limit: self.max_redirects,
                });
            }
            redirects += 1;

            let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
            else {
                return Err(HttpFailure::MissingLocation {
                    url,
                    status: status.as_u16(),
                });
            };
            let next = url.join(location).map_err(|_| HttpFailure::BadLocation {
                url: url.clone(),
                location: location.to_string(),
            })?;
            redirect_cookies.extend(collect_set_cookies(response.headers()));

            hop = hop.after_redirect(status);
            debug!(
                status = status.as_u16(),
                from = %url,
                to = %next,
                redirects,
                "following redirect"
            );
            url = next;
        }
    }

    fn classify(&self, failure: HttpFailure) -> LoginError {
        let final_host = failure.final_host();
        if is_provider_host(final_host.as_deref(), &self.provider_host) {
            debug!(error = %failure, "HTTP failure on provider host; passing through");
            failure.into_error()
        } else {
            warn!(
                final_host = final_host.as_deref().unwrap_or("<unknown>"),
                error = %failure,
                "HTTP failure outside the provider host"
            );
            LoginError::not_redirected(final_host.as_deref())
        }
    }
}

/// Logs in with [`LoginConfig::default`] (Steam's real endpoint).
///
/// # Errors
///
/// See [`SteamOpenIdLogin::login`].
pub async fn login<S: AsRef<str>>(url: &str, cookies: &[S]) -> Result<Vec<String>, LoginError> {
    let request = LoginRequest::new(url, cookies.iter().map(|cookie| cookie.as_ref().to_string()));
    SteamOpenIdLogin::new(LoginConfig::default())?
        .login(&request)
        .await
}

#[derive(Debug, Clone, Copy)]
enum Hop<'a> {
    Get,
    PostForm(&'a OpenIdForm),
}

impl Hop<'_> {
    /// 301/302/303 turn a POST into a bodiless GET; 307/308 replay it.
    fn after_redirect(self, status: StatusCode) -> Self {
        match (self, status) {
            (
                Hop::PostForm(_),
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER,
            ) => Hop::Get,
            (hop, _) => hop,
        }
    }
}

/// Final response of a logical request and the cookies its redirects set.
struct Fetched {
    response: Response,
    redirect_cookies: Vec<String>,
}

/// Statuses that must carry a `Location`. Other 3xx answers are final.
fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// HTTP-layer failure awaiting host classification.
#[derive(Debug)]
enum HttpFailure {
    Request(reqwest::Error),
    Body { url: Url, source: reqwest::Error },
    BadLocation { url: Url, location: String },
    MissingLocation { url: Url, status: u16 },
    TooManyRedirects { url: Url, limit: usize },
}

impl HttpFailure {
    fn final_host(&self) -> Option<String> {
        let url = match self {
            Self::Request(error) => error.url(),
            Self::Body { url, .. }
            | Self::BadLocation { url, .. }
            | Self::MissingLocation { url, .. }
            | Self::TooManyRedirects { url, .. } => Some(url),
        };
        url.and_then(Url::host_str).map(str::to_string)
    }

    fn into_error(self) -> LoginError {
        match self {
            Self::Request(error) | Self::Body { source: error, .. } => LoginError::Http(error),
            Self::BadLocation { location, .. } => LoginError::invalid_url(location),
            Self::MissingLocation { url, status } => LoginError::MissingRedirectLocation {
                url: url.to_string(),
                status,
            },
            Self::TooManyRedirects { url, limit } => LoginError::TooManyRedirects {
                url: url.to_string(),
                limit,
            },
        }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(error) => write!(f, "{error}"),
            Self::Body { url, source } => write!(f, "reading body of {url}: {source}"),
            Self::BadLocation { url, location } => {
                write!(f, "unparseable redirect location {location:?} from {url}")
            }
            Self::MissingLocation { url, status } => {
                write!(f, "redirect {status} from {url} without a usable Location")
            }
            Self::TooManyRedirects { url, limit } => {
                write!(f, "redirect limit {limit} exceeded at {url}")
            }
        }
    }
}

/// Returns true if `final_host` is the provider host (ASCII case-insensitive).
/// An unknown host never counts as the provider.
fn is_provider_host(final_host: Option<&str>, provider_host: &str) -> bool {
    final_host.is_some_and(|host| host.eq_ignore_ascii_case(provider_host))
}

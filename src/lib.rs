//! Steam OpenID Login Library
//!
//! Turns a set of `steamcommunity.com` session cookies into a logged-in
//! cookie set for a site that uses "Sign in through Steam" (OpenID).
//!
//! The flow is one GET of the site's OpenID login URL (redirected to Steam),
//! one resubmission of Steam's auto-submit `#openidForm`, and an append-only
//! merge of the cookies Steam hands back.
//!
//! # Architecture
//!
//! - [`mod@login`] - Orchestrator: requests, redirect handling, failure classification
//! - [`form`] - `#loginForm` detection and `#openidForm` field extraction
//! - [`html`] - HTML parsing into a tagged element/text tree
//! - [`cookies`] - `Cookie` header joining and `Set-Cookie` splitting
//! - [`config`] - Timeouts, redirect bound, provider endpoint
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), steam_openid::LoginError> {
//! let cookies = steam_openid::login(
//!     "https://example.com/auth/steam",
//!     &["steamLoginSecure=...", "sessionid=..."],
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod cookies;
pub mod error;
pub mod form;
pub mod html;
mod http_client;
pub mod login;
mod user_agent;

// Re-export commonly used types
pub use config::LoginConfig;
pub use constants::{STEAM_HOST, STEAM_OPENID_LOGIN_URL};
pub use cookies::CookieHeader;
pub use error::LoginError;
pub use form::OpenIdForm;
pub use html::{HtmlDocument, HtmlNode, NodeId};
pub use login::{LoginRequest, SteamOpenIdLogin, login};

//! HTTP client construction for the login flow.
//!
//! Redirects are disabled at the client level; the orchestrator follows them
//! itself so the `Cookie` header survives cross-host hops.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, Proxy};
use tracing::warn;

use crate::config::LoginConfig;
use crate::error::LoginError;

/// Proxy variables per URL scheme, highest priority first.
const PROXY_ENV_VARS: [(&str, &[&str]); 2] = [
    ("https", &["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]),
    ("http", &["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]),
];

/// Builds the login HTTP client from `config`.
///
/// If the platform's proxy lookup panics (seen in sandboxed macOS runners),
/// the client is rebuilt once with proxies taken from the environment only.
///
/// # Errors
///
/// Returns [`LoginError::ClientBuild`] when client construction fails.
pub fn build_login_http_client(config: &LoginConfig) -> Result<Client, LoginError> {
    let built = match try_build_client(config, ProxySource::System) {
        Err(BuildFailure::Panic) => {
            warn!("system proxy lookup panicked; rebuilding login client from proxy env vars");
            try_build_client(config, ProxySource::Environment)
        }
        built => built,
    };
    built.map_err(|failure| LoginError::ClientBuild {
        reason: failure.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProxySource {
    System,
    Environment,
}

enum BuildFailure {
    Panic,
    Build(reqwest::Error),
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panic => f.write_str("client construction panicked while initializing networking"),
            Self::Build(error) => write!(f, "{error}"),
        }
    }
}

fn try_build_client(config: &LoginConfig, proxies: ProxySource) -> Result<Client, BuildFailure> {
    let build = || {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.read_timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .gzip(true);
        if proxies == ProxySource::Environment {
            builder = env_proxies(|name| std::env::var(name).ok())
                .into_iter()
                .fold(builder.no_proxy(), reqwest::ClientBuilder::proxy);
        }
        builder.build().map_err(BuildFailure::Build)
    };
    catch_unwind(AssertUnwindSafe(build)).unwrap_or(Err(BuildFailure::Panic))
}

/// Resolves one proxy per scheme from the first non-blank variable `lookup` returns.
fn env_proxies(lookup: impl Fn(&str) -> Option<String>) -> Vec<Proxy> {
    PROXY_ENV_VARS
        .iter()
        .filter_map(|&(scheme, names)| {
            let target = names.iter().find_map(|name| {
                lookup(name)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })?;
            let proxy = if scheme == "https" {
                Proxy::https(target.as_str())
            } else {
                Proxy::http(target.as_str())
            };
            proxy
                .inspect_err(|error| warn!(scheme, %error, "ignoring unusable proxy variable"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_build_client_with_default_config() {
        assert!(build_login_http_client(&LoginConfig::default()).is_ok());
    }

    #[test]
    fn test_env_build_ignores_system_proxy_settings() {
        assert!(try_build_client(&LoginConfig::default(), ProxySource::Environment).is_ok());
    }

    #[test]
    fn test_env_proxies_empty_without_variables() {
        assert!(env_proxies(lookup_in(&[])).is_empty());
    }

    #[test]
    fn test_env_proxies_one_per_scheme() {
        let proxies = env_proxies(lookup_in(&[
            ("https_proxy", "http://proxy.local:3128"),
            ("HTTP_PROXY", "http://proxy.local:8080"),
        ]));
        assert_eq!(proxies.len(), 2);
    }

    #[test]
    fn test_all_proxy_covers_both_schemes() {
        let proxies = env_proxies(lookup_in(&[("ALL_PROXY", "http://proxy.local:3128")]));
        assert_eq!(proxies.len(), 2);
    }

    #[test]
    fn test_blank_proxy_variables_are_skipped() {
        let proxies = env_proxies(lookup_in(&[("HTTPS_PROXY", "   "), ("HTTP_PROXY", "")]));
        assert!(proxies.is_empty());
    }
}

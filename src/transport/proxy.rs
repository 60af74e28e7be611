//! Proxy list loading and per-request selection
//!
//! The proxy file is line-oriented text, one credentialed endpoint per line in
//! `ip:port:username:password` form. The list must be non-empty; an empty or
//! malformed file aborts the run before any network activity.

use crate::{ConfigError, ConfigResult};
use rand::seq::SliceRandom;
use std::path::Path;

/// A single credentialed proxy endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ProxyEndpoint {
    /// Parses one `ip:port:username:password` line
    pub fn parse(line: &str, line_number: usize) -> ConfigResult<Self> {
        let malformed = || ConfigError::MalformedProxy {
            line: line_number,
            text: line.to_string(),
        };

        let mut parts = line.trim().splitn(4, ':');
        let host = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let port = parts
            .next()
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(malformed)?;
        let username = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let password = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;

        Ok(Self {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// The scheme://host:port form expected by the HTTP client
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Loads the proxy list from a line-oriented file
///
/// Blank lines are ignored. Fails if the file is unreadable, any line is
/// malformed, or no proxies remain after parsing.
pub fn load_proxy_list(path: &Path) -> ConfigResult<Vec<ProxyEndpoint>> {
    let content = std::fs::read_to_string(path)?;

    let mut proxies = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        proxies.push(ProxyEndpoint::parse(line, index + 1)?);
    }

    if proxies.is_empty() {
        return Err(ConfigError::EmptyProxyList {
            path: path.display().to_string(),
        });
    }

    Ok(proxies)
}

/// Picks one proxy at random, simulating a distinct client identity per request
pub fn pick_proxy(proxies: &[ProxyEndpoint]) -> Option<&ProxyEndpoint> {
    proxies.choose(&mut rand::thread_rng())
}

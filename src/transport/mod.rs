//! Resilient per-request transport
//!
//! Every outbound request carries a fixed identification header chosen once
//! per run; building-detail requests additionally go out through a proxy
//! drawn at random from the configured pool for every single request, so the
//! remote sees a distinct client identity each time.

mod proxy;

pub use proxy::{load_proxy_list, pick_proxy, ProxyEndpoint};

use crate::config::ClientConfig;
use crate::{TransportError, TransportResult};
use rand::seq::SliceRandom;
use reqwest::Client;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Raw response from one request: the status and the parsed JSON body.
///
/// Non-2xx statuses are not a hard failure at this layer; listing callers log
/// a warning and keep whatever partial body came back, while the detail
/// fetcher turns them into a per-building error. That decision belongs to the
/// caller.
#[derive(Debug)]
pub struct RawPayload {
    pub status: u16,
    pub body: Value,
}

impl RawPayload {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues single outbound requests through the rotating proxy pool
pub struct Transport {
    proxies: Vec<ProxyEndpoint>,
    user_agent: String,
    timeout: Duration,
    /// Shared client for direct (unproxied) listing calls
    direct: Client,
}

impl Transport {
    /// Builds the transport from the client configuration
    ///
    /// Loads the proxy list (fatal if empty) and picks the run-lifetime
    /// identification header from the user-agent pool.
    pub fn new(config: &ClientConfig, timeout: Duration) -> crate::Result<Self> {
        let proxies = load_proxy_list(Path::new(&config.proxy_file))?;

        // One identification header per run, not per request
        let user_agent = config
            .user_agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default();

        let direct = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(TransportError::ClientBuild)?;

        Ok(Self {
            proxies,
            user_agent,
            timeout,
            direct,
        })
    }

    /// Number of proxies available for rotation
    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// The identification header fixed for this run
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Fetches one URL and parses the body as JSON
    ///
    /// With `use_proxy` set, a fresh client is built around a randomly drawn
    /// proxy endpoint; there is no pinning across requests. Fails on timeout,
    /// connection errors, or a body that is not JSON. The HTTP status is
    /// returned in the payload for the caller to judge.
    pub async fn fetch(&self, url: &Url, use_proxy: bool) -> TransportResult<RawPayload> {
        let response = if use_proxy {
            self.proxied_client()?.get(url.clone()).send().await
        } else {
            self.direct.get(url.clone()).send().await
        };

        let response = response.map_err(|e| classify_request_error(url, e))?;
        let status = response.status().as_u16();

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::MalformedBody {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(RawPayload { status, body })
    }

    /// Builds a one-shot client routed through a randomly selected proxy
    fn proxied_client(&self) -> TransportResult<Client> {
        let endpoint = pick_proxy(&self.proxies)
            .ok_or_else(|| TransportError::Proxy("proxy pool is empty".to_string()))?;

        let proxy = reqwest::Proxy::all(endpoint.server_url())
            .map_err(|e| TransportError::Proxy(e.to_string()))?
            .basic_auth(&endpoint.username, &endpoint.password);

        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .proxy(proxy)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(TransportError::ClientBuild)
    }
}

/// Maps a request failure onto the transport error taxonomy
fn classify_request_error(url: &Url, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn client_config(proxy_file: &Path) -> ClientConfig {
        ClientConfig {
            proxy_file: proxy_file.display().to_string(),
            user_agents: vec!["AgentA/1.0".to_string(), "AgentB/2.0".to_string()],
            use_proxy: true,
        }
    }

    fn proxy_fixture() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "127.0.0.1:8080:user:pass").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_transport_fixes_user_agent_per_run() {
        let file = proxy_fixture();
        let config = client_config(file.path());
        let transport = Transport::new(&config, Duration::from_secs(5)).unwrap();

        let chosen = transport.user_agent().to_string();
        assert!(config.user_agents.contains(&chosen));
        // Stays fixed across calls within the run
        assert_eq!(transport.user_agent(), chosen);
    }

    #[test]
    fn test_transport_requires_proxies() {
        let file = NamedTempFile::new().unwrap();
        let config = client_config(file.path());
        let result = Transport::new(&config, Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_proxied_client_builds() {
        let file = proxy_fixture();
        let config = client_config(file.path());
        let transport = Transport::new(&config, Duration::from_secs(5)).unwrap();
        assert!(transport.proxied_client().is_ok());
        assert_eq!(transport.proxy_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_parses_json_body() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let file = proxy_fixture();
        let config = client_config(file.path());
        let transport = Transport::new(&config, Duration::from_secs(5)).unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        let payload = transport.fetch(&url, false).await.unwrap();
        assert!(payload.is_success());
        assert_eq!(payload.body["ok"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_json_body() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let file = proxy_fixture();
        let config = client_config(file.path());
        let transport = Transport::new(&config, Duration::from_secs(5)).unwrap();

        let url = Url::parse(&server.uri()).unwrap();
        let result = transport.fetch(&url, false).await;
        assert!(matches!(result, Err(TransportError::MalformedBody { .. })));
    }
}

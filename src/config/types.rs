use serde::Deserialize;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub client: ClientConfig,
    pub output: OutputConfig,
}

/// Remote catalog API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the registry REST API
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound passed to the complex listing endpoint so the remote
    /// returns a single page far larger than any realistic region
    #[serde(rename = "complex-page-bound", default = "default_complex_page_bound")]
    pub complex_page_bound: u32,
}

/// Outbound identity configuration: proxy pool and user-agent pool
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Path to the proxy list, one ip:port:username:password per line
    #[serde(rename = "proxy-file")]
    pub proxy_file: String,

    /// Pool of browser identification strings; one is picked per run
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,

    /// Route building-detail requests through the proxy pool
    #[serde(rename = "use-proxy", default = "default_use_proxy")]
    pub use_proxy: bool,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where the dated data_YYYY-MM-DD.csv file is written
    pub directory: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_complex_page_bound() -> u32 {
    10_000
}

fn default_use_proxy() -> bool {
    true
}

fn default_user_agents() -> Vec<String> {
    vec![
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/108.0.0.0 Safari/537.36"
            .to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 12_5) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/104.0.0.0 YaBrowser/22.7.0 Yowser/2.5 Safari/537.36"
            .to_string(),
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 12_5) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/104.0.0.0 Safari/537.36 Edg/104.0.1293.47"
            .to_string(),
    ]
}

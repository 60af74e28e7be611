use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use erz_harvester::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Base URL: {}", config.api.base_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[api]
base-url = "https://erzrf.ru"
request-timeout-secs = 10
complex-page-bound = 10000

[client]
proxy-file = "proxy.txt"
user-agents = ["TestAgent/1.0"]

[output]
directory = "./data"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://erzrf.ru");
        assert_eq!(config.api.complex_page_bound, 10_000);
        assert_eq!(config.client.user_agents.len(), 1);
        assert_eq!(config.output.directory, "./data");
    }

    #[test]
    fn test_defaults_applied() {
        let config_content = r#"
[api]
base-url = "https://erzrf.ru"

[client]
proxy-file = "proxy.txt"

[output]
directory = "."
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.api.complex_page_bound, 10_000);
        assert!(config.client.use_proxy);
        // Default user-agent pool carries the three desktop browser strings
        assert_eq!(config.client.user_agents.len(), 3);
    }

    #[test]
    fn test_missing_section_fails() {
        let config_content = r#"
[api]
base-url = "https://erzrf.ru"
"#;

        let file = create_temp_config(config_content);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_config_fails_validation() {
        let config_content = r#"
[api]
base-url = "not a url"

[client]
proxy-file = "proxy.txt"

[output]
directory = "."
"#;

        let file = create_temp_config(config_content);
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}

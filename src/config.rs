use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    pub controller: ControllerConfig,
    pub advisor: AdvisorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory the collection artifacts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    /// Controller host[:port]; the https:// scheme is implied
    pub url: String,
    #[serde(default = "default_site")]
    pub site: String,
    pub username: String,
    pub password: String,
    /// Accept the controller's certificate without verification. Needed for
    /// the self-signed certificates controllers ship with; a warning is
    /// logged whenever this is enabled.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdvisorConfig {
    /// OpenAI-compatible API root, without the /chat/completions suffix
    #[serde(default = "default_advisor_base_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        // Expand environment variables
        let expanded = expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded)
            .with_context(|| "Failed to parse configuration")?;

        Ok(config)
    }
}

/// Expand ${ENV_VAR} references in config string
fn expand_env_vars(input: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_default()
    })
    .to_string()
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_site() -> String {
    "default".to_string()
}

fn default_advisor_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [controller]
        url = "unifi.local"
        username = "admin"
        password = "secret"

        [advisor]
        api_key = "sk-test"
    "#;

    #[test]
    fn minimal_config_applies_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.controller.site, "default");
        assert!(!config.controller.accept_invalid_certs);
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.agent.output_dir, ".");
        assert_eq!(config.advisor.model, "gpt-4o");
        assert_eq!(config.advisor.timeout_secs, 120);
        assert!(config.advisor.temperature.is_none());
    }

    #[test]
    fn env_vars_are_expanded() {
        std::env::set_var("UNIFI_ADVISOR_TEST_PW", "hunter2");
        let expanded = expand_env_vars("password = \"${UNIFI_ADVISOR_TEST_PW}\"");
        assert_eq!(expanded, "password = \"hunter2\"");
    }

    #[test]
    fn unset_env_var_expands_to_empty() {
        let expanded = expand_env_vars("key = \"${UNIFI_ADVISOR_TEST_UNSET_XYZ}\"");
        assert_eq!(expanded, "key = \"\"");
    }
}

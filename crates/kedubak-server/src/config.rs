use serde::{Deserialize, Serialize};

/// Token signing configuration. The secret is loaded once at startup and is
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime (default: 24 hours)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    24
}

/// Feed listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Upper bound on the number of posts returned by a listing (default: 1000)
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

fn default_list_limit() -> usize {
    1000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            list_limit: default_list_limit(),
        }
    }
}

/// Account to seed on startup if it does not exist yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialUserConfig {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Server configuration - loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: String, // "0.0.0.0:8080"
    pub auth: AuthConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    /// Deadline for a whole request, including store waits (default: 10s)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    pub initial_user: Option<InitialUserConfig>,
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Load server config from a YAML file with KEDUBAK__ env var overrides.
pub fn load_config(path: &str) -> anyhow::Result<ServerConfig> {
    use anyhow::Context;
    let config: ServerConfig = config::Config::builder()
        .add_source(config::File::new(path, config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("KEDUBAK")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()
        .with_context(|| format!("Failed to build config from: {}", path))?
        .try_deserialize()
        .with_context(|| format!("Failed to deserialize config from: {}", path))?;
    Ok(config)
}

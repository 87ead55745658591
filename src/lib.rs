//! Monitor Charts
//!
//! The custom graphs view of a monitoring frontend:
//! - validates the query and persists the graph filter per user
//! - resolves graphs by id or name pattern through the monitoring JSON-RPC API
//! - assembles chart descriptors or item ids for the page

pub mod api;
pub mod auth;
pub mod charts;
pub mod monitoring;
pub mod profile;
pub mod timeline;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub monitoring: MonitoringYamlConfig,
    pub profile: ProfileYamlConfig,
    pub charts: ChartsYamlConfig,
    /// Auth section, if absent auth_config will be None (deny-by-default)
    pub auth: Option<AuthConfig>,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Monitoring API configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringYamlConfig {
    /// Frontend base URL, `api_jsonrpc.php` is appended
    pub url: String,
    /// API token sent as `Authorization: Bearer`
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for MonitoringYamlConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost/zabbix".into(),
            token: None,
            timeout_secs: 30,
        }
    }
}

/// Profile store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileBackend {
    #[default]
    Memory,
    File,
}

impl std::str::FromStr for ProfileBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "memory" => Ok(ProfileBackend::Memory),
            "file" => Ok(ProfileBackend::File),
            other => bail!("Unknown profile backend \"{}\" (expected memory or file)", other),
        }
    }
}

/// Profile store configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileYamlConfig {
    pub backend: ProfileBackend,
    /// JSON file used by the file backend
    pub path: String,
}

impl Default for ProfileYamlConfig {
    fn default() -> Self {
        Self {
            backend: ProfileBackend::Memory,
            path: "profiles.json".into(),
        }
    }
}

/// Charts view configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartsYamlConfig {
    pub max_graphs_per_page: usize,
    /// Longest selectable period as a relative length (e.g. `2y`, `730d`)
    pub max_period: String,
}

impl Default for ChartsYamlConfig {
    fn default() -> Self {
        Self {
            max_graphs_per_page: charts::DEFAULT_MAX_GRAPHS_PER_PAGE,
            max_period: "2y".into(),
        }
    }
}

/// Authentication configuration.
///
/// No `auth` section in YAML means `auth_config = None` and every protected
/// request is refused.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret (HS256, minimum 32 characters)
    pub jwt_secret: String,
    /// Lifetime of tokens minted by the `token` command (default: 28800 = 8h)
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
}

fn default_jwt_expiry() -> u64 {
    28800 // 8 hours
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub monitoring_url: String,
    pub monitoring_token: Option<String>,
    pub monitoring_timeout_secs: u64,
    pub profile_backend: ProfileBackend,
    pub profile_path: String,
    pub max_graphs_per_page: usize,
    pub max_period: String,
    /// Auth config, None means deny-by-default (no auth section in YAML)
    pub auth_config: Option<AuthConfig>,
}

impl Config {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. If the file doesn't
    /// exist, falls back to pure env var / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let profile_backend = match std::env::var("PROFILE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => yaml.profile.backend,
        };

        Ok(Self {
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(yaml.server.port),
            monitoring_url: std::env::var("MONITORING_API_URL").unwrap_or(yaml.monitoring.url),
            monitoring_token: std::env::var("MONITORING_API_TOKEN")
                .ok()
                .or(yaml.monitoring.token),
            monitoring_timeout_secs: yaml.monitoring.timeout_secs,
            profile_backend,
            profile_path: std::env::var("PROFILE_PATH").unwrap_or(yaml.profile.path),
            max_graphs_per_page: yaml.charts.max_graphs_per_page,
            max_period: yaml.charts.max_period,
            auth_config: yaml.auth,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }

    /// Charts view tunables, checking the configured maximum period
    pub fn charts_settings(&self) -> Result<charts::ChartsSettings> {
        Ok(charts::ChartsSettings {
            max_graphs_per_page: self.max_graphs_per_page,
            period_limits: timeline::PeriodLimits::new(
                timeline::MIN_PERIOD_SECS,
                &self.max_period,
            )?,
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub monitoring: Arc<dyn monitoring::MonitoringApi>,
    pub profiles: Arc<dyn profile::ProfileStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state with all services initialized
    pub async fn new(config: Config) -> Result<Self> {
        let monitoring = Arc::new(monitoring::MonitoringClient::new(
            &config.monitoring_url,
            config.monitoring_token.clone(),
            Duration::from_secs(config.monitoring_timeout_secs),
        )?);

        let profiles: Arc<dyn profile::ProfileStore> = match config.profile_backend {
            ProfileBackend::Memory => Arc::new(profile::MemoryProfileStore::new()),
            ProfileBackend::File => Arc::new(
                profile::FileProfileStore::open(&config.profile_path)
                    .await
                    .with_context(|| {
                        format!("Failed to open profile store {}", config.profile_path)
                    })?,
            ),
        };

        Ok(Self {
            monitoring,
            profiles,
            config: Arc::new(config),
        })
    }
}

/// Build the services and serve the HTTP API until Ctrl+C
pub async fn start_server(config: Config) -> Result<()> {
    let settings = config.charts_settings()?;
    let port = config.server_port;
    let auth_config = config.auth_config.clone();

    if auth_config.is_none() {
        tracing::warn!("No auth section configured, /api/charts will refuse every request");
    }

    let state = AppState::new(config).await?;
    tracing::info!(
        url = %state.config.monitoring_url,
        backend = ?state.config.profile_backend,
        "Services initialized"
    );

    let server_state = Arc::new(api::handlers::ServerState {
        charts: charts::ChartsController::new(
            state.monitoring.clone(),
            state.profiles.clone(),
            settings,
        ),
        auth_config,
    });
    let app = api::create_router(server_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://gitlab.com";
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectScope {
    #[default]
    Owned,
    All,
}

/// GitLab connection settings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitLabSection {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub default_project: Option<String>,
}

/// Server behavior settings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

/// Default parameters applied when a tool call omits them.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub per_page: Option<u32>,
    pub project_scope: Option<ProjectScope>,
}

/// Feature toggles. Caching and metrics are advertised knobs with no code
/// path behind them yet; they are parsed and carried so existing config
/// files keep loading.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeaturesSection {
    pub enable_caching: Option<bool>,
    pub enable_metrics: Option<bool>,
    pub strict_scoping: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gitlab: GitLabSection,
    pub server: ServerSection,
    pub defaults: DefaultsSection,
    pub features: FeaturesSection,
}

impl Config {
    /// Load configuration: defaults <- first readable config file <- env.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        for path in candidate_paths(explicit_path) {
            if !path.exists() {
                continue;
            }
            tracing::info!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            match parse_config::<Config>(&content, &path) {
                Ok(file_config) => {
                    config.merge(file_config);
                    break;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config file {}: {e}", path.display());
                }
            }
        }

        let env: HashMap<String, String> = std::env::vars().collect();
        config.merge(Config::from_env(&env));
        Ok(config)
    }

    /// Build the env-override layer from a map of environment variables.
    fn from_env(env: &HashMap<String, String>) -> Self {
        let var = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();
        Config {
            gitlab: GitLabSection {
                base_url: var("GITLAB_BASE_URL"),
                token: var("GITLAB_TOKEN").or_else(|| var("GITLAB_ACCESS_TOKEN")),
                default_project: var("GITLAB_DEFAULT_PROJECT"),
            },
            server: ServerSection {
                name: None,
                version: None,
                timeout: var("GITLAB_MCP_TIMEOUT").and_then(|v| v.parse().ok()),
            },
            defaults: DefaultsSection {
                per_page: var("GITLAB_MCP_PER_PAGE").and_then(|v| v.parse().ok()),
                project_scope: var("GITLAB_MCP_PROJECT_SCOPE").and_then(|v| match v.as_str() {
                    "owned" => Some(ProjectScope::Owned),
                    "all" => Some(ProjectScope::All),
                    _ => None,
                }),
            },
            features: FeaturesSection {
                enable_caching: var("GITLAB_MCP_ENABLE_CACHING").map(|v| v == "true"),
                enable_metrics: var("GITLAB_MCP_ENABLE_METRICS").map(|v| v == "true"),
                strict_scoping: var("GITLAB_MCP_STRICT_SCOPING").map(|v| v != "false"),
            },
        }
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    fn merge(&mut self, other: Config) {
        let g = &mut self.gitlab;
        g.base_url = other.gitlab.base_url.or(g.base_url.take());
        g.token = other.gitlab.token.or(g.token.take());
        g.default_project = other.gitlab.default_project.or(g.default_project.take());

        let s = &mut self.server;
        s.name = other.server.name.or(s.name.take());
        s.version = other.server.version.or(s.version.take());
        s.timeout = other.server.timeout.or(s.timeout);

        let d = &mut self.defaults;
        d.per_page = other.defaults.per_page.or(d.per_page);
        d.project_scope = other.defaults.project_scope.or(d.project_scope);

        let f = &mut self.features;
        f.enable_caching = other.features.enable_caching.or(f.enable_caching);
        f.enable_metrics = other.features.enable_metrics.or(f.enable_metrics);
        f.strict_scoping = other.features.strict_scoping.or(f.strict_scoping);
    }

    pub fn base_url(&self) -> &str {
        self.gitlab.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn per_page(&self) -> u32 {
        self.defaults.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn project_scope(&self) -> ProjectScope {
        self.defaults.project_scope.unwrap_or_default()
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.server.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn server_name(&self) -> String {
        self.server
            .name
            .clone()
            .unwrap_or_else(|| "gitlab-mcp-server".to_string())
    }

    pub fn server_version(&self) -> String {
        self.server
            .version
            .clone()
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    }

    /// Sanity-check ranges. The token is deliberately not validated here:
    /// it may arrive from the environment at service construction time.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(base_url) = &self.gitlab.base_url
            && url::Url::parse(base_url).is_err()
        {
            errors.push(format!("Invalid GitLab base URL: {base_url}"));
        }
        if let Some(per_page) = self.defaults.per_page
            && !(1..=100).contains(&per_page)
        {
            errors.push("per_page must be between 1 and 100".to_string());
        }
        if let Some(timeout) = self.server.timeout
            && timeout < 1
        {
            errors.push("Server timeout must be at least 1 second".to_string());
        }

        errors
    }
}

fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var("GITLAB_MCP_CONFIG")
        && !env_path.is_empty()
    {
        paths.push(PathBuf::from(env_path));
    }
    if let Ok(cwd) = std::env::current_dir() {
        for name in [
            "gitlab-mcp.json",
            "gitlab-mcp.yaml",
            "gitlab-mcp.toml",
            ".gitlab-mcp.json",
        ] {
            paths.push(cwd.join(name));
        }
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".gitlab-mcp.json"));
        for name in ["config.json", "config.yaml", "config.toml"] {
            paths.push(home.join(".config").join("gitlab-mcp").join(name));
        }
    }

    paths
}

/// Parse a config document based on its file extension.
pub fn parse_config<T: serde::de::DeserializeOwned>(content: &str, file_path: &Path) -> Result<T> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("json");

    match extension.to_lowercase().as_str() {
        "json" => serde_json::from_str(content).context("Failed to parse JSON config"),
        "yaml" | "yml" => serde_yaml::from_str(content).context("Failed to parse YAML config"),
        "toml" => toml::from_str(content).context("Failed to parse TOML config"),
        _ => Err(anyhow::anyhow!(
            "Unsupported config file format: {}",
            extension
        )),
    }
}

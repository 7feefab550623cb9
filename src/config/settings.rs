use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub github: GithubSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GithubSettings {
    /// Token da API do GitHub; sem ele os endpoints de estatísticas respondem 403
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,
    #[serde(default = "default_repo_name")]
    pub repo_name: String,
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
    /// TTL das entradas de cache em segundos
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: i64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            token: None,
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            graphql_url: default_graphql_url(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

fn default_repo_owner() -> String {
    "iterative".to_string()
}

fn default_repo_name() -> String {
    "dvc".to_string()
}

fn default_graphql_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_cache_ttl() -> i64 {
    900
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Variáveis de ambiente específicas
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            builder = builder.set_override("github.token", token)?;
        }
        if let Ok(owner) = std::env::var("GITHUB_REPO_OWNER") {
            builder = builder.set_override("github.repo_owner", owner)?;
        }
        if let Ok(name) = std::env::var("GITHUB_REPO_NAME") {
            builder = builder.set_override("github.repo_name", name)?;
        }
        if let Ok(url) = std::env::var("GITHUB_GRAPHQL_URL") {
            builder = builder.set_override("github.graphql_url", url)?;
        }

        builder = builder.add_source(Environment::with_prefix("GITHUB_STATS"));

        let s = builder.build()?;

        s.try_deserialize()
    }
}

//! Busca de estatísticas do repositório via GitHub GraphQL API
//!
//! Uma única query traz estrelas e issues abertas; todo fetch bem-sucedido
//! aquece as duas chaves do cache ("issues" e "stars") como efeito colateral.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::GithubSettings;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

use super::StatsCache;

pub const ISSUES_CACHE_KEY: &str = "issues";
pub const STARS_CACHE_KEY: &str = "stars";

/// Resumo de uma issue aberta, no formato devolvido aos clientes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub title: String,
    pub url: String,
    pub comments: u64,
    pub date: String,
}

/// Resultado de um fetch bem-sucedido no GraphQL
#[derive(Debug, Clone)]
pub struct FreshStats {
    pub issues: Vec<IssueSummary>,
    pub stars: u64,
}

#[derive(Clone)]
pub struct GithubService {
    http_client: Client,
    graphql_url: String,
    token: Option<String>,
    repo_owner: String,
    repo_name: String,
    cache: StatsCache,
}

// Estruturas de desserialização da resposta GraphQL

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    errors: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
struct Repository {
    stargazers: Stargazers,
    issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
struct Stargazers {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct IssueConnection {
    edges: Vec<IssueEdge>,
}

#[derive(Debug, Deserialize)]
struct IssueEdge {
    node: IssueNode,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    title: String,
    url: String,
    #[serde(rename = "createdAt")]
    created_at: String,
    comments: CommentCount,
}

#[derive(Debug, Deserialize)]
struct CommentCount {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

impl GithubService {
    pub fn new(settings: &GithubSettings) -> Self {
        Self {
            http_client: Client::new(),
            graphql_url: settings.graphql_url.clone(),
            token: settings.token.clone().filter(|t| !t.is_empty()),
            repo_owner: settings.repo_owner.clone(),
            repo_name: settings.repo_name.clone(),
            cache: StatsCache::new(settings.cache_ttl_seconds),
        }
    }

    /// Token configurado? Sem ele os endpoints de estatísticas ficam desabilitados
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn cache(&self) -> &StatsCache {
        &self.cache
    }

    fn build_query(&self) -> String {
        format!(
            r#"{{
  repository(owner: "{}", name: "{}") {{
    stargazers {{
      totalCount
    }}
    issues(
      first: 3
      states: OPEN
      orderBy: {{ field: CREATED_AT, direction: DESC }}
    ) {{
      edges {{
        node {{
          title
          createdAt
          url
          comments {{
            totalCount
          }}
        }}
      }}
    }}
  }}
}}"#,
            self.repo_owner, self.repo_name
        )
    }

    /// Executa a query GraphQL e grava os dois valores no cache
    ///
    /// Em caso de falha nada é gravado: valores antigos, se existirem,
    /// continuam elegíveis para leituras seguintes.
    pub async fn fetch_fresh_stats(&self) -> AppResult<FreshStats> {
        let token = self.token.as_ref().ok_or_else(|| {
            AppError::ConfigError("GITHUB_TOKEN não configurado".to_string())
        })?;

        let body = json!({ "query": self.build_query() });

        let response = self
            .http_client
            .post(&self.graphql_url)
            .header("Authorization", format!("token {}", token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::GithubApi(format!("Falha ao conectar com GitHub GraphQL API: {}", e))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log_github_api_error(&self.graphql_url, Some(status.as_u16()), &error_text);
            return Err(AppError::GithubApi(format!(
                "GraphQL query failed [{}]: {}",
                status, error_text
            )));
        }

        let payload: GraphQlResponse = response.json().await.map_err(|e| {
            AppError::GithubApi(format!("Falha ao parsear resposta GraphQL: {}", e))
        })?;

        if let Some(errors) = payload.errors {
            log_github_api_error(&self.graphql_url, Some(status.as_u16()), &errors.to_string());
            return Err(AppError::GithubApi(format!("GraphQL errors: {}", errors)));
        }

        let repository = payload
            .data
            .and_then(|d| d.repository)
            .ok_or_else(|| AppError::GithubApi("Resposta GraphQL sem repository".to_string()))?;

        let issues: Vec<IssueSummary> = repository
            .issues
            .edges
            .into_iter()
            .map(|edge| IssueSummary {
                title: edge.node.title,
                url: edge.node.url,
                comments: edge.node.comments.total_count,
                date: edge.node.created_at,
            })
            .collect();

        let stars = repository.stargazers.total_count;

        // Um único fetch aquece as duas chaves
        self.cache.set(ISSUES_CACHE_KEY, json!(issues)).await;
        self.cache.set(STARS_CACHE_KEY, json!(stars)).await;

        Ok(FreshStats { issues, stars })
    }

    /// Issues abertas recentes: cache se válido, senão busca no GitHub
    ///
    /// Falha de fetch degrada para `None`; a mensagem de erro não é
    /// repassada ao cliente HTTP.
    pub async fn get_issues(&self) -> Option<Value> {
        if let Some(cached) = self.cache.get(ISSUES_CACHE_KEY).await {
            log_cache_hit(ISSUES_CACHE_KEY);
            return Some(cached);
        }

        log_cache_miss(ISSUES_CACHE_KEY);
        match self.fetch_fresh_stats().await {
            Ok(fresh) => Some(json!(fresh.issues)),
            Err(e) => {
                log_error(&format!("❌ Falha ao buscar issues no GitHub: {}", e));
                None
            }
        }
    }

    /// Contagem de estrelas: cache se válido, senão busca no GitHub
    pub async fn get_stars(&self) -> Option<Value> {
        if let Some(cached) = self.cache.get(STARS_CACHE_KEY).await {
            log_cache_hit(STARS_CACHE_KEY);
            return Some(cached);
        }

        log_cache_miss(STARS_CACHE_KEY);
        match self.fetch_fresh_stats().await {
            Ok(fresh) => Some(json!(fresh.stars)),
            Err(e) => {
                log_error(&format!("❌ Falha ao buscar stars no GitHub: {}", e));
                None
            }
        }
    }
}

//! Endpoints de estatísticas do repositório
//!
//! Política comum aos dois endpoints: 403 sem token configurado,
//! 200 com valor em cache ou recém-buscado, 404 com corpo vazio quando
//! não há valor nem em cache nem no upstream.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

/// GET /api/github/issues
pub async fn github_issues(State(state): State<Arc<AppState>>) -> Response {
    log_request_received("/api/github/issues", "GET");

    if !state.github.has_token() {
        // Sem token do GitHub: endpoint desabilitado
        return StatusCode::FORBIDDEN.into_response();
    }

    match state.github.get_issues().await {
        Some(issues) => (StatusCode::OK, Json(json!({ "issues": issues }))).into_response(),
        // Nada em cache nem fresco
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /api/github/stars
pub async fn github_stars(State(state): State<Arc<AppState>>) -> Response {
    log_request_received("/api/github/stars", "GET");

    if !state.github.has_token() {
        return StatusCode::FORBIDDEN.into_response();
    }

    match state.github.get_stars().await {
        Some(stars) => (StatusCode::OK, Json(json!({ "stars": stars }))).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GithubSettings, ServerSettings, Settings};
    use crate::services::GithubService;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::get;
    use axum::Router;
    use httpmock::prelude::*;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_state(graphql_url: &str, token: Option<&str>) -> Arc<AppState> {
        let settings = Settings {
            server: ServerSettings::default(),
            github: GithubSettings {
                token: token.map(|t| t.to_string()),
                repo_owner: "iterative".to_string(),
                repo_name: "dvc".to_string(),
                graphql_url: graphql_url.to_string(),
                cache_ttl_seconds: 900,
            },
        };
        let github = GithubService::new(&settings.github);
        Arc::new(AppState { settings, github })
    }

    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/github/issues", get(github_issues))
            .route("/api/github/stars", get(github_stars))
            .with_state(state)
    }

    async fn get_response(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_stats_without_token_are_403_with_empty_body() {
        let state = app_state("http://localhost:1/graphql", None);
        // Mesmo com cache quente a resposta é 403
        state.github.cache().set("stars", json!(42)).await;

        let (status, body) = get_response(router(state.clone()), "/api/github/stars").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());

        let (status, body) = get_response(router(state), "/api/github/issues").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_stats_404_when_fetch_fails_and_cache_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(500).body("boom");
        });

        let state = app_state(&server.url("/graphql"), Some("test_token"));

        let (status, body) = get_response(router(state.clone()), "/api/github/issues").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());

        let (status, body) = get_response(router(state), "/api/github/stars").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_cached_value_served_without_upstream_call() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body(json!({}));
        });

        let state = app_state(&server.url("/graphql"), Some("test_token"));
        state
            .github
            .cache()
            .set("issues", json!([{"title": "t", "url": "u", "comments": 1, "date": "d"}]))
            .await;

        let (status, body) = get_response(router(state), "/api/github/issues").await;
        assert_eq!(status, StatusCode::OK);

        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["issues"][0]["title"], "t");
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn test_star_request_warms_issue_cache() {
        // Cenário da especificação: 42 estrelas, nenhuma issue aberta
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).json_body(json!({
                "data": {
                    "repository": {
                        "stargazers": { "totalCount": 42 },
                        "issues": { "edges": [] }
                    }
                }
            }));
        });

        let state = app_state(&server.url("/graphql"), Some("test_token"));

        let (status, body) = get_response(router(state.clone()), "/api/github/stars").await;
        assert_eq!(status, StatusCode::OK);
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload, json!({ "stars": 42 }));

        let (status, body) = get_response(router(state), "/api/github/issues").await;
        assert_eq!(status, StatusCode::OK);
        let payload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload, json!({ "issues": [] }));

        // O segundo request não volta ao upstream
        mock.assert_hits(1);
    }
}

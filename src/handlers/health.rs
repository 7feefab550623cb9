use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check() -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "github-stats-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn status_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_integration_status_check();

    let token_configured = state.github.has_token();

    Json(json!({
        "service": "github-stats-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()),
        "integrations": {
            "github": {
                "token_configured": token_configured,
                "repo": format!("{}/{}", state.settings.github.repo_owner, state.settings.github.repo_name),
                "cache_ttl_seconds": state.settings.github.cache_ttl_seconds
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_healthy() {
        let Json(body) = health_check().await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "github-stats-middleware");
    }
}

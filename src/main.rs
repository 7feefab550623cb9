//! Middleware de estatísticas do GitHub
//!
//! Quatro endpoints sobre duas integrações:
//! - /api/github/issues e /api/github/stars: leitura com cache TTL (900s)
//!   sobre uma única query GraphQL
//! - /api/github/auth e /api/github/callback: fluxo OAuth2 authorization-code
//!   com entrega do token ao popup via postMessage

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use github_stats_middleware::{auth, config, handlers, services, utils, AppState};

use auth::{OAuth2Config, OAuth2State};
use config::Settings;
use handlers::{github_issues, github_stars, health_check, status_check};
use utils::{logging::*, AppError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Carregar variáveis de ambiente do arquivo .env (se existir)
    if dotenvy::dotenv().is_err() {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Inicializar tracing
    tracing_subscriber::fmt::init();

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| AppError::ConfigError(format!("Failed to load settings: {}", e)))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    if settings.github.token.is_none() {
        log_warning("⚠️  GITHUB_TOKEN não configurado. Endpoints de estatísticas responderão 403.");
    }

    let github = services::GithubService::new(&settings.github);

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        github,
    });

    // Rotas base
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status_check))
        .route("/api/github/issues", get(github_issues))
        .route("/api/github/stars", get(github_stars))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Rotas OAuth2 apenas quando client id/secret estiverem presentes
    match OAuth2Config::from_env() {
        Ok(oauth_config) => {
            log_info("✅ OAuth2 endpoints enabled: /api/github/auth, /api/github/callback");

            let oauth_router = Router::new()
                .route("/api/github/auth", get(auth::start_oauth_flow))
                .route("/api/github/callback", get(auth::handle_oauth_callback))
                .with_state(Arc::new(OAuth2State {
                    config: oauth_config,
                }));

            app = app.merge(oauth_router);
        }
        Err(e) => {
            log_warning(&format!("⚠️  OAuth2 endpoints disabled: {}", e));
        }
    }

    // Iniciar servidor; PORT do ambiente tem precedência (Cloud Run)
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port)).await?;

    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}

//! OAuth2 HTTP Handlers
//!
//! Endpoints HTTP para iniciar e completar o fluxo OAuth2.
//!
//! O callback sempre responde 200: o popup que abre esta página só confia
//! no postMessage para a janela de origem, nunca no status HTTP. Mudar isso
//! quebra o listener do consumidor.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

use super::{OAuth2Client, OAuth2Config};

/// Parâmetros do callback OAuth2
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    /// Authorization code retornado pelo GitHub
    code: Option<String>,
    /// Erro retornado pelo GitHub (se houver)
    error: Option<String>,
}

/// State compartilhado para os handlers OAuth2
pub struct OAuth2State {
    pub config: OAuth2Config,
}

/// Redirect URI fixo, derivado do Host da requisição
fn callback_redirect_uri(host: &str) -> String {
    format!("https://{}/api/github/callback", host)
}

/// State token aleatório: 8 caracteres hexadecimais, um por chamada
///
/// Gerado para correlação CSRF e nunca verificado no callback
/// (comportamento observado do contrato externo).
fn random_state() -> String {
    let bytes: [u8; 4] = rand::random();
    hex::encode(bytes)
}

fn host_header(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get("host")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::ValidationError("Missing Host header".to_string()))
}

/// GET /api/github/auth
///
/// Inicia o fluxo OAuth2 redirecionando o usuário para a página de
/// autorização do GitHub
///
/// # Retorno
/// - `302`: Redireciona para o GitHub
/// - `500`: Erro na construção da URL, com o erro no corpo
pub async fn start_oauth_flow(
    State(oauth_state): State<Arc<OAuth2State>>,
    headers: HeaderMap,
) -> Response {
    log_request_received("/api/github/auth", "GET");

    let host = match host_header(&headers) {
        Ok(host) => host,
        Err(e) => {
            log_error(&format!("❌ [OAuth2] Falha ao iniciar fluxo: {}", e));
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let auth_url = oauth_state
        .config
        .authorization_url(&callback_redirect_uri(host), &random_state());

    log_info(&format!("↗️  [OAuth2] Redirecionando para: {}", auth_url));

    // 302 explícito; Redirect::to do axum emite 303
    (StatusCode::FOUND, [(header::LOCATION, auth_url)]).into_response()
}

/// GET /api/github/callback?code=XXX
///
/// Recebe o callback OAuth2 do GitHub, troca o code por access token e
/// devolve a página do popup. Sucesso e falha respondem 200; o desfecho
/// vai no payload do postMessage.
pub async fn handle_oauth_callback(
    State(oauth_state): State<Arc<OAuth2State>>,
    Query(params): Query<OAuthCallbackParams>,
    headers: HeaderMap,
) -> Html<String> {
    log_request_received("/api/github/callback", "GET");

    match exchange_callback_code(&oauth_state, &params, &headers).await {
        Ok(access_token) => {
            log_info("✅ [OAuth2] Token obtido, devolvendo para a janela de origem");
            render_popup_body(
                "success",
                &json!({ "token": access_token, "provider": "github" }),
            )
        }
        Err(e) => {
            log_error(&format!("❌ [OAuth2] Falha no callback: {}", e));
            render_popup_body("error", &json!(e.to_string()))
        }
    }
}

async fn exchange_callback_code(
    oauth_state: &OAuth2State,
    params: &OAuthCallbackParams,
    headers: &HeaderMap,
) -> AppResult<String> {
    if let Some(error) = &params.error {
        return Err(AppError::OAuth(format!("Autorização negada: {}", error)));
    }

    let code = params
        .code
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("Missing code parameter".to_string()))?;

    let host = host_header(headers)?;

    let oauth_client = OAuth2Client::new(oauth_state.config.clone());

    oauth_client
        .exchange_code_for_token(code, &callback_redirect_uri(host))
        .await
}

/// Página mínima do popup: repassa o resultado para window.opener
///
/// O script envia "authorizing:github" imediatamente (para qualquer origem)
/// e o resultado apenas em resposta à mensagem do opener, dirigido à origem
/// dela; depois remove o próprio listener.
fn render_popup_body(status: &str, content: &serde_json::Value) -> Html<String> {
    Html(format!(
        r#"
<script>
  const receiveMessage = (message) => {{
    window.opener.postMessage(
      'authorization:github:{}:{}',
      message.origin
    );
    window.removeEventListener("message", receiveMessage, false);
  }}
  window.addEventListener("message", receiveMessage, false);

  window.opener.postMessage("authorizing:github", "*");
</script>
"#,
        status, content
    ))
}

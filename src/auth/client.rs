//! OAuth2 HTTP Client
//!
//! Cliente HTTP isolado para a troca de authorization code por access token

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};

use super::OAuth2Config;

/// Resposta da API de troca de token
///
/// O GitHub responde 200 mesmo em falha; nesse caso o corpo traz
/// `error`/`error_description` em vez de `access_token`.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Cliente OAuth2 para GitHub
pub struct OAuth2Client {
    config: OAuth2Config,
    http_client: Client,
}

impl OAuth2Client {
    /// Criar novo cliente OAuth2
    pub fn new(config: OAuth2Config) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    /// Trocar authorization code por access token
    ///
    /// # Parâmetros
    /// - `code`: Authorization code recebido do callback
    /// - `redirect_uri`: O mesmo redirect URI usado na autorização
    ///
    /// # Retorno
    /// - `Ok(String)`: Access token obtido com sucesso
    /// - `Err(AppError)`: Erro na troca do token
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> AppResult<String> {
        log_info("🔐 [OAuth2] Trocando authorization code por access token...");

        let body = serde_json::json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "code": code,
            "redirect_uri": redirect_uri
        });

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::OAuth(format!("Falha ao conectar com GitHub OAuth API: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log_error(&format!("❌ [OAuth2] Token exchange failed: {} - {}", status, error_text));
            return Err(AppError::OAuth(format!(
                "OAuth token exchange failed [{}]: {}",
                status, error_text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::OAuth(format!("Falha ao parsear resposta do token: {}", e)))?;

        if let Some(error) = token_response.error {
            let description = token_response
                .error_description
                .unwrap_or_else(|| error.clone());
            log_error(&format!("❌ [OAuth2] Erro na troca do token: {} - {}", error, description));
            return Err(AppError::OAuth(description));
        }

        let access_token = token_response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::OAuth("Resposta do token sem access_token".to_string()))?;

        log_info("✅ [OAuth2] Access token obtido");

        Ok(access_token)
    }
}

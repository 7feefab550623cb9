//! OAuth2 Configuration
//!
//! Centraliza todas as configurações necessárias para OAuth2 do GitHub

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Config {
    /// Client ID fornecido pelo GitHub
    pub client_id: String,

    /// Client Secret fornecido pelo GitHub
    pub client_secret: String,

    /// Endpoint de autorização do provedor
    pub authorize_url: String,

    /// Endpoint de troca de token do provedor
    pub token_url: String,
}

impl OAuth2Config {
    /// Criar configuração a partir de variáveis de ambiente
    pub fn from_env() -> Result<Self, String> {
        let client_id = std::env::var("GITHUB_CLIENT_ID")
            .map_err(|_| "GITHUB_CLIENT_ID não configurado".to_string())?;

        let client_secret = std::env::var("GITHUB_CLIENT_SECRET")
            .map_err(|_| "GITHUB_CLIENT_SECRET não configurado".to_string())?;

        let authorize_url = std::env::var("GITHUB_AUTHORIZE_URL")
            .unwrap_or_else(|_| "https://github.com/login/oauth/authorize".to_string());

        let token_url = std::env::var("GITHUB_TOKEN_URL")
            .unwrap_or_else(|_| "https://github.com/login/oauth/access_token".to_string());

        Ok(Self {
            client_id,
            client_secret,
            authorize_url,
            token_url,
        })
    }

    /// Gerar URL de autorização do GitHub
    ///
    /// O redirect_uri vem do Host da requisição; o state é gerado por chamada
    /// e nunca verificado de volta neste módulo.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope=repo,user&state={}",
            self.authorize_url,
            self.client_id,
            urlencoding::encode(redirect_uri),
            state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OAuth2Config {
        OAuth2Config {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
        }
    }

    #[test]
    fn test_authorization_url() {
        let url = test_config().authorization_url(
            "https://example.com/api/github/callback",
            "0a1b2c3d",
        );

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fexample.com%2Fapi%2Fgithub%2Fcallback"));
        assert!(url.contains("scope=repo,user"));
        assert!(url.contains("state=0a1b2c3d"));
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            vec![
                ("GITHUB_CLIENT_ID", Some("cid")),
                ("GITHUB_CLIENT_SECRET", Some("csecret")),
            ],
            || {
                let config = OAuth2Config::from_env().unwrap();
                assert_eq!(config.client_id, "cid");
                assert_eq!(config.client_secret, "csecret");
                assert_eq!(config.token_url, "https://github.com/login/oauth/access_token");
            },
        );
    }

    #[test]
    fn test_from_env_missing_credentials() {
        temp_env::with_vars_unset(vec!["GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET"], || {
            assert!(OAuth2Config::from_env().is_err());
        });
    }
}

//! # GitHub OAuth2 Authentication Module
//!
//! Módulo isolado para o fluxo OAuth2 authorization-code do GitHub.
//!
//! ## Responsabilidades:
//! - Iniciar fluxo OAuth2 (authorization URL com state aleatório)
//! - Trocar authorization code por access token
//! - Entregar o resultado ao popup via postMessage (janela de origem)
//!
//! ## Estrutura:
//! - `config.rs`: Configurações OAuth2
//! - `client.rs`: Cliente HTTP OAuth2
//! - `handlers.rs`: Handlers HTTP (auth, callback)

pub mod client;
pub mod config;
pub mod handlers;

pub use client::OAuth2Client;
pub use config::OAuth2Config;
pub use handlers::{handle_oauth_callback, start_oauth_flow, OAuth2State};

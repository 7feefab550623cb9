// Biblioteca do middleware de estatísticas do GitHub
// Expõe módulos para uso em testes e binários

pub mod auth;
pub mod config;
pub mod handlers;
pub mod services;
pub mod utils;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub github: services::GithubService,
}

pub mod health;
pub mod stats;

pub use health::*;
pub use stats::*;

// Handlers OAuth2 estão em src/auth/handlers.rs (módulo separado)

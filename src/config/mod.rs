pub mod settings;

pub use settings::{GithubSettings, ServerSettings, Settings};

pub mod github;
pub mod stats_cache;

pub use github::*;
pub use stats_cache::StatsCache;

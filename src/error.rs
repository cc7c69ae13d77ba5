use crate::config::ConfigError;
use crate::session::SessionError;
use thiserror::Error;

/// Why a search produced no records
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The listing yielded no product links at all
    #[error("No products found.")]
    NoProducts,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The task running the scrape panicked or was cancelled
    #[error("scrape task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

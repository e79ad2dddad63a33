use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Index not built. Call build_index() first.")]
    IndexNotBuilt,
}

pub type Result<T> = std::result::Result<T, Error>;

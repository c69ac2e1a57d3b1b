use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token storage unavailable: {0}")]
    Storage(#[from] std::io::Error),

    #[error("could not resolve a data directory for the token file")]
    NoDataDir,

    #[error("empty token")]
    EmptyToken,
}

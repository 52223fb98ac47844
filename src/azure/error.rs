use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend request timed out after {0}s")]
    Timeout(u64),

    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned HTTP {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

use thiserror::Error;

/// Raised while resolving client configuration. Fatal: nothing can be
/// fetched without a service id and an API key.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingVar(&'static str),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("API key contains characters not allowed in a header value")]
    InvalidApiKey,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure of a single content request. Only the strict `fetch_*` calls
/// surface this; the `ContentSource` operations collapse it to an empty result.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page numbers start at 1")]
    ZeroPage,

    #[error("Page size must be greater than 0")]
    ZeroPageSize,
}

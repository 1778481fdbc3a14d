pub mod github_api_helper;
pub mod search_query;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid request header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Github responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Couldn't decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

use thiserror::Error;

/// Errors returned by the Kakao API clients.
#[derive(Debug, Error)]
pub enum KakaoError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Kakao API answered with a non-2xx status.
    #[error("Kakao API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Neither keyword nor address search produced a coordinate for the query.
    #[error("could not resolve coordinates for: {0}")]
    UnresolvableLocation(String),
}

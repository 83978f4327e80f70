use thiserror::Error;

/// Errors returned by the expressway open-data client and snapshot store.
#[derive(Debug, Error)]
pub enum ExdataError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The open-data service answered with a non-2xx status.
    #[error("expressway API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot file could not be written.
    #[error("snapshot write failed for {path}: {source}")]
    SnapshotWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("failed to (de)serialize history: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The payload does not fit into a version 40 symbol at the requested level.
    #[error("payload of {len} bytes is too long for a QR code")]
    DataTooLong { len: usize },

    #[error("history entries need a non-empty name")]
    EmptyName,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

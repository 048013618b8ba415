use thiserror::Error;

/// Errors that can occur while searching for references and linking them
/// into the graph.
#[derive(Error, Debug)]
pub enum RefGraphError {
    #[error("service unavailable: {service}")]
    ServiceUnavailable { service: String },

    #[error("interface mismatch: {message}")]
    InterfaceMismatch { message: String },

    #[error("navigation failed: {message} (entry: {index})")]
    NavigationFailed { message: String, index: u32 },

    #[error("read failed: {message} (entry: {index:?})")]
    ReadFailed { message: String, index: Option<u32> },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("fixture error: {message} (path: {path})")]
    Fixture { message: String, path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RefGraphError {
    /// Returns `true` for the host quirk where a result list cannot be viewed
    /// through its richer interface. Callers treat it as "no data yet".
    pub fn is_interface_mismatch(&self) -> bool {
        matches!(self, RefGraphError::InterfaceMismatch { .. })
    }
}

/// Convenience alias for results using `RefGraphError`.
pub type Result<T> = std::result::Result<T, RefGraphError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Connection refused, timeout, or a body that could not be read.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },

    /// Body was not JSON, or did not match the record shape.
    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification shown to the user when a load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Network,
    Malformed,
    Other,
}

impl FailureKind {
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Network => "Network error",
            FailureKind::Malformed => "Malformed response",
            FailureKind::Other => "Error",
        }
    }
}

impl DashboardError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DashboardError::Transport { .. } | DashboardError::Status { .. } => FailureKind::Network,
            DashboardError::Decode { .. } | DashboardError::Json(_) => FailureKind::Malformed,
            DashboardError::Config(_) | DashboardError::Io(_) => FailureKind::Other,
        }
    }
}

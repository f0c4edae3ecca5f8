// src/error.rs
use serde_json::json;

use crate::model::SourceId;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("{source_id} returned unexpected payload: {detail}")]
    Parse { source_id: SourceId, detail: String },

    #[error("{source_id} returned HTTP {status}")]
    UpstreamStatus {
        source_id: SourceId,
        status: reqwest::StatusCode,
    },

    #[error("rate limited by {0}")]
    RateLimited(SourceId),

    #[error("{source_id} timed out after {elapsed_ms}ms")]
    Timeout { source_id: SourceId, elapsed_ms: u64 },

    #[error("unknown platform: {0}")]
    UnknownSource(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("tool not found")]
    ToolNotFound,

    #[error("method not found")]
    MethodNotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl PlatformError {
    /// Short machine-readable code, used in log fields and failure records.
    pub fn code_str(&self) -> &'static str {
        match self {
            PlatformError::InvalidParams(_) => "invalid_params",
            PlatformError::UnknownSource(_) => "unknown_platform",
            PlatformError::ToolNotFound => "tool_not_found",
            PlatformError::MethodNotFound => "method_not_found",
            PlatformError::Parse { .. } => "parse_error",
            PlatformError::Timeout { .. } => "timeout",
            PlatformError::RateLimited(_) => "rate_limited",
            PlatformError::HttpRequest(_) | PlatformError::UpstreamStatus { .. } => {
                "upstream_error"
            }
            _ => "internal_error",
        }
    }

    pub fn to_jsonrpc_error(&self) -> serde_json::Value {
        let (code, message) = match self {
            PlatformError::UnknownSource(name) => {
                (-32602, format!("Unknown platform: {}", name))
            }
            PlatformError::InvalidParams(msg) => (-32602, msg.to_string()),
            PlatformError::ToolNotFound => (-32602, "Tool not found".to_string()),
            PlatformError::MethodNotFound => (-32601, "Method not found".to_string()),
            PlatformError::SerdeJson(e) => (-32700, e.to_string()),
            PlatformError::Internal(msg) => (-32603, msg.to_string()),
            err => (-32603, err.to_string()),
        };

        json!({
            "code": code,
            "message": message,
        })
    }
}

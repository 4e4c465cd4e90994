//! Request/response types for the invocation API

use pcbuilder::{Configuration, MessagesState};
use serde::{Deserialize, Serialize};

/// Request body for `POST /invoke`
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeRequest {
    /// Conversation state carried over from the previous turn
    pub input: MessagesState,

    /// Per-invocation configuration (`{"configurable": {"experience": ...}}`)
    #[serde(default)]
    pub config: Configuration,
}

/// Response body for `POST /invoke`
#[derive(Debug, Clone, Serialize)]
pub struct InvokeResponse {
    pub run_id: String,
    pub output: MessagesState,
}

/// Error body, OpenAI style
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
            },
        }
    }
}

/// Response body for `GET /info`
#[derive(Debug, Clone, Serialize)]
pub struct GraphInfo {
    pub name: String,
    pub nodes: Vec<String>,
    pub model: String,
    pub experience_levels: Vec<String>,
    pub default_experience: String,
}

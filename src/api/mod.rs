use serde::{Deserialize, Serialize};

/// One prior turn as the agent sees it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GenerateRequest {
    pub question: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub history: Vec<HistoryMessage>,
}

/// Body of `POST /generate`. Error responses carry the same shape with
/// `success: false`, so every field is optional.
#[derive(Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(rename = "hasApiKey", default)]
    pub has_api_key: bool,
}

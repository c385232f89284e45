use serde::{Deserialize, Serialize};

/// Per-session quality summary (percentages and milliseconds)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SessionQuality {
    pub audio: f64,
    pub video: f64,
    pub latency: f64,
}

/// A past room session listed on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveKitSession {
    pub id: String,
    pub room_name: String,
    pub user_id: String,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub quality: SessionQuality,
    pub participants: Vec<String>,
}

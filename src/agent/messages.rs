//! Agent Wire Messages
//!
//! Frames the agent sends. Every frame is one JSON object carrying an
//! epoch-millisecond `timestamp`.

use serde::Serialize;

use super::features::Features;

pub const GREETING_MESSAGE: &str = "Hello from telemetry agent, waiting for pointer activity";

/// Frames sent from agent to dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AgentMessage {
    /// First frame on every connection
    Greeting {
        timestamp: i64,
        status: &'static str,
        message: &'static str,
    },
    /// Periodic feature report
    Features(Features),
}

impl AgentMessage {
    pub fn greeting(timestamp: i64) -> Self {
        AgentMessage::Greeting {
            timestamp,
            status: "connected",
            message: GREETING_MESSAGE,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_serialize() {
        let json = AgentMessage::greeting(1700000000000).to_json().unwrap();
        assert_eq!(
            json,
            format!(
                r#"{{"timestamp":1700000000000,"status":"connected","message":"{}"}}"#,
                GREETING_MESSAGE
            )
        );
    }

    #[test]
    fn test_features_serialize_flat() {
        let msg = AgentMessage::Features(Features {
            timestamp: 1,
            sample_count: 3,
            mean_speed: 12.5,
            std_speed: 0.0,
            jitter: 0.0,
            direction_changes: 0,
        });
        let json = msg.to_json().unwrap();
        assert!(json.starts_with(r#"{"timestamp":1,"sample_count":3,"mean_speed":12.5"#));
    }
}

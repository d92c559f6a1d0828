//! Task messages exchanged between the service and the consumer.

use serde::{Deserialize, Serialize};

use crate::error_handling::QueueError;
use crate::models::Journey;

/// A deferred write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", content = "payload", rename_all = "snake_case")]
pub enum TaskMessage {
    Create(Journey),
    MultiCreate(Vec<Journey>),
    Update(Journey),
    Delete(u64),
}

impl TaskMessage {
    pub fn encode(&self) -> Result<String, QueueError> {
        serde_json::to_string(self).map_err(QueueError::Encode)
    }

    pub fn decode(payload: &str) -> Result<Self, QueueError> {
        serde_json::from_str(payload).map_err(QueueError::Decode)
    }

    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskMessage::Create(_) => "create",
            TaskMessage::MultiCreate(_) => "multi_create",
            TaskMessage::Update(_) => "update",
            TaskMessage::Delete(_) => "delete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn journey() -> Journey {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
        Journey::new(3, "Ufa", "", start, end)
    }

    #[test]
    fn test_encoded_message_is_tagged() {
        let payload = TaskMessage::Delete(42).encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["task"], "delete");
        assert_eq!(value["payload"], 42);
    }

    #[test]
    fn test_decode_multi_create() {
        let message = TaskMessage::MultiCreate(vec![journey(), journey().with_id(9)]);
        let decoded = TaskMessage::decode(&message.encode().unwrap()).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.kind(), "multi_create");
    }

    #[test]
    fn test_decode_rejects_unknown_task() {
        let err = TaskMessage::decode(r#"{"task":"archive","payload":1}"#).unwrap_err();
        assert!(matches!(err, QueueError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            TaskMessage::decode("not json"),
            Err(QueueError::Decode(_))
        ));
    }
}

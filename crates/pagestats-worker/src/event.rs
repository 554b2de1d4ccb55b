//! Triggering event shapes.
//!
//! Three shapes are accepted, checked in this order:
//!
//! ```text
//! direct:       {"bucket": "...", "key": "..."}
//! notification: {"Records": [{"s3": {"bucket": {"name": "..."}, "object": {"key": "..."}}}]}
//! event bus:    {"detail": {"bucket": {"name": "..."}, "object": {"key": "..."}}}
//! ```
//!
//! Only the fields above are read. Notification keys arrive URL-encoded
//! with `+` for spaces; the other shapes carry plain keys.

use pagestats_core::storage::ObjectLocation;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{Result, WorkerError};

/// An event that triggers a statistics update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerEvent {
    /// Direct invocation payload.
    Direct { bucket: String, key: String },
    /// Storage notification with one or more records.
    Notification {
        #[serde(rename = "Records")]
        records: Vec<NotificationRecord>,
    },
    /// Event bus envelope.
    EventBus { detail: ObjectDetail },
}

/// One record of a storage notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Affected object.
    pub s3: ObjectDetail,
}

/// Bucket and object of a notification or event bus detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDetail {
    /// Bucket of the object.
    pub bucket: BucketRef,
    /// The object itself.
    pub object: ObjectRef,
}

/// Bucket reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRef {
    /// Bucket name.
    pub name: String,
}

/// Object reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Object key, URL-encoded in notifications.
    pub key: String,
}

impl TriggerEvent {
    /// Recognizes the shape of a raw JSON event.
    pub fn from_value(event: &serde_json::Value) -> Result<Self> {
        if !event.is_object() {
            return Err(WorkerError::unrecognized_event("event is not a JSON object"));
        }

        Self::deserialize(event).map_err(|_| {
            WorkerError::unrecognized_event(
                "expected `bucket`/`key`, `Records[].s3` or `detail.bucket`/`detail.object`",
            )
        })
    }

    /// Returns the location of the object that triggered the event.
    pub fn location(&self) -> Result<ObjectLocation> {
        match self {
            Self::Direct { bucket, key } => Ok(ObjectLocation::new(bucket, key)),
            Self::Notification { records } => {
                let record = records
                    .first()
                    .ok_or_else(|| WorkerError::unrecognized_event("notification has no records"))?;
                Ok(ObjectLocation::new(
                    &record.s3.bucket.name,
                    decode_key(&record.s3.object.key),
                ))
            }
            Self::EventBus { detail } => Ok(ObjectLocation::new(
                &detail.bucket.name,
                &detail.object.key,
            )),
        }
    }

    /// Returns a short name of the event shape.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "direct",
            Self::Notification { .. } => "notification",
            Self::EventBus { .. } => "event_bus",
        }
    }
}

/// Decodes a form-encoded object key: `+` is a space, `%XX` an escaped byte.
fn decode_key(raw: &str) -> String {
    // Notification keys are form encoded: '&' and '=' only occur escaped.
    form_urlencoded::parse(raw.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn location_of(event: serde_json::Value) -> Result<ObjectLocation> {
        TriggerEvent::from_value(&event)?.location()
    }

    #[test]
    fn direct_payload() {
        let location = location_of(json!({
            "bucket": "covenants-deed-images",
            "key": "ocr/hits/wf/a b.json",
        }))
        .unwrap();
        assert_eq!(location, ObjectLocation::new("covenants-deed-images", "ocr/hits/wf/a b.json"));
    }

    #[test]
    fn notification_key_is_decoded() {
        let event = json!({
            "Records": [{
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": {"name": "covenants-deed-images", "arn": "arn:aws:s3:::x"},
                    "object": {"key": "ocr/hits/wf/17760704/Deed+Book+12%2C+p%C3%A4ge.json", "size": 10}
                }
            }]
        });

        let parsed = TriggerEvent::from_value(&event).unwrap();
        assert_eq!(parsed.shape(), "notification");
        assert_eq!(
            parsed.location().unwrap().key,
            "ocr/hits/wf/17760704/Deed Book 12, päge.json"
        );
    }

    #[test]
    fn notification_uses_first_record() {
        let location = location_of(json!({
            "Records": [
                {"s3": {"bucket": {"name": "first"}, "object": {"key": "a.json"}}},
                {"s3": {"bucket": {"name": "second"}, "object": {"key": "b.json"}}}
            ]
        }))
        .unwrap();
        assert_eq!(location.bucket, "first");
    }

    #[test]
    fn event_bus_key_is_not_decoded() {
        let location = location_of(json!({
            "source": "aws.s3",
            "detail-type": "Object Created",
            "detail": {
                "bucket": {"name": "covenants-deed-images"},
                "object": {"key": "ocr/hits/wf/a+b%20c.json"}
            }
        }))
        .unwrap();
        assert_eq!(location.key, "ocr/hits/wf/a+b%20c.json");
    }

    #[test]
    fn direct_shape_wins_over_others() {
        let event = TriggerEvent::from_value(&json!({
            "bucket": "direct",
            "key": "k",
            "detail": {"bucket": {"name": "bus"}, "object": {"key": "k"}}
        }))
        .unwrap();
        assert_eq!(event.shape(), "direct");
    }

    #[test]
    fn unrecognized_shapes() {
        for event in [
            json!({}),
            json!({"key": "only-key"}),
            json!({"Records": "nope"}),
            json!({"detail": {"bucket": {"name": "b"}}}),
            json!(["bucket", "key"]),
            json!(null),
        ] {
            let err = location_of(event).unwrap_err();
            assert!(matches!(err, WorkerError::UnrecognizedEventShape { .. }));
        }
    }

    #[test]
    fn empty_records_is_unrecognized() {
        let err = location_of(json!({"Records": []})).unwrap_err();
        assert_eq!(err.kind(), "unrecognized_event_shape");
    }
}

//! Trigger event input.

use std::path::Path;

use anyhow::Context;
use tokio::io::AsyncReadExt;

use crate::TRACING_TARGET_CONFIG;

/// Reads the trigger event from `path`, or from stdin when no path is given.
pub async fn read_event(path: Option<&Path>) -> anyhow::Result<serde_json::Value> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read event file '{}'", path.display()))?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read event from stdin")?;
            raw
        }
    };

    tracing::debug!(
        target: TRACING_TARGET_CONFIG,
        source = path.map_or("stdin".into(), |path| path.display().to_string()),
        size = raw.len(),
        "Read event"
    );

    parse_event(&raw)
}

/// Parses a raw trigger event.
fn parse_event(raw: &str) -> anyhow::Result<serde_json::Value> {
    let event: serde_json::Value =
        serde_json::from_str(raw).context("event is not valid JSON")?;

    anyhow::ensure!(event.is_object(), "event must be a JSON object");
    Ok(event)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn reads_event_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"bucket": "b", "key": "ocr/hits/wf/page.json"}}"#).unwrap();

        let event = read_event(Some(file.path())).await.unwrap();
        assert_eq!(event["bucket"], "b");
        assert_eq!(event["key"], "ocr/hits/wf/page.json");
    }

    #[tokio::test]
    async fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = read_event(Some(&path)).await.unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[tokio::test]
    async fn invalid_json_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "bucket=b").unwrap();

        let err = read_event(Some(file.path())).await.unwrap_err();
        assert_eq!(err.to_string(), "event is not valid JSON");
    }

    #[test]
    fn rejects_non_object_event() {
        assert!(parse_event("[1, 2]").is_err());
        assert!(parse_event(r#"{"Records": []}"#).is_ok());
    }
}

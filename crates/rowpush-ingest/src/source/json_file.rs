//! JSON export files as a source
//!
//! The source id is a file path. The file must hold a JSON array of objects;
//! each object becomes one raw row with its keys in file order. Nested arrays
//! and objects are kept as their JSON text.

use async_trait::async_trait;
use rowpush_common::{Result, SyncError};
use serde_json::Value;
use tracing::debug;

use super::RecordSource;
use crate::record::{RawRow, RawValue};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileSource;

impl JsonFileSource {
    /// Parse an export document into rows
    pub fn parse(source_id: &str, content: &str) -> Result<Vec<RawRow>> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| SyncError::source_read(source_id, format!("invalid JSON: {}", e)))?;

        let Value::Array(items) = document else {
            return Err(SyncError::source_read(source_id, "expected a JSON array of objects"));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map
                    .into_iter()
                    .map(|(name, value)| (name, raw_value(value)))
                    .collect()),
                other => Err(SyncError::source_read(
                    source_id,
                    format!("row {} is not an object: {}", i + 1, other),
                )),
            })
            .collect()
    }
}

fn raw_value(value: Value) -> RawValue {
    match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Int(i)
            } else if n.is_f64() {
                n.as_f64().map(RawValue::Float).unwrap_or(RawValue::Null)
            } else {
                // unsigned beyond i64, kept digit for digit
                RawValue::Text(n.to_string())
            }
        },
        Value::String(s) => RawValue::Text(s),
        nested => RawValue::Text(nested.to_string()),
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch(&self, source_id: &str) -> Result<Vec<RawRow>> {
        let content = tokio::fs::read_to_string(source_id)
            .await
            .map_err(|e| SyncError::source_read(source_id, e))?;
        let rows = Self::parse(source_id, &content)?;
        debug!(path = source_id, rows = rows.len(), "Read export file");
        Ok(rows)
    }

    /// Files are named explicitly, there is nothing to discover
    async fn list_sources(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn describe(&self) -> String {
        "json files".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_keeps_key_order_and_types() {
        let rows = JsonFileSource::parse(
            "export.json",
            r#"[{"msisdn": "+62 812", "temp": 36.6, "active": true, "n": 7, "x": null, "tags": [1, 2]}]"#,
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        let fields: Vec<_> = rows[0].iter().collect();
        assert_eq!(fields[0], ("msisdn", &RawValue::Text("+62 812".into())));
        assert_eq!(fields[1], ("temp", &RawValue::Float(36.6)));
        assert_eq!(fields[2], ("active", &RawValue::Bool(true)));
        assert_eq!(fields[3], ("n", &RawValue::Int(7)));
        assert_eq!(fields[4], ("x", &RawValue::Null));
        assert_eq!(fields[5], ("tags", &RawValue::Text("[1,2]".into())));
    }

    #[test]
    fn test_parse_keeps_large_integers_exact() {
        let rows = JsonFileSource::parse(
            "export.json",
            r#"[{"meter": 18446744073709551615, "small": -3}]"#,
        )
        .unwrap();

        let fields: Vec<_> = rows[0].iter().collect();
        assert_eq!(fields[0], ("meter", &RawValue::Text("18446744073709551615".into())));
        assert_eq!(fields[1], ("small", &RawValue::Int(-3)));
    }

    #[test]
    fn test_parse_rejects_non_array_and_non_object_rows() {
        assert!(JsonFileSource::parse("a.json", r#"{"msisdn": "1"}"#).is_err());
        assert!(JsonFileSource::parse("a.json", "[1, 2]").is_err());
        assert!(JsonFileSource::parse("a.json", "not json").is_err());
        assert!(JsonFileSource::parse("a.json", "[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"msisdn": "0812"}}, {{"msisdn": "0813"}}]"#).unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let rows = JsonFileSource.fetch(&path).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_source_read_error() {
        let err = JsonFileSource.fetch("/definitely/not/here.json").await.unwrap_err();
        assert!(matches!(err, SyncError::SourceRead { .. }));
    }
}

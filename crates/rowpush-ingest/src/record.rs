//! Raw rows and canonical records
//!
//! A [`RawRow`] is whatever a source produced: an ordered list of column
//! names and values, binary included. A [`Record`] is the canonical shape
//! sent to the sink: scalar values only, tagged with the source it came from.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Wire key carrying the originating source of a record
pub const SOURCE_TAG_KEY: &str = "DB";

/// A column value as read from a source
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(value: Vec<u8>) -> Self {
        RawValue::Bytes(value)
    }
}

/// One row as returned by a source, columns in result-set order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: Vec<(String, RawValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, returning the row for chaining
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.columns.push((name.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for RawRow {
    type Item = (String, RawValue);
    type IntoIter = std::vec::IntoIter<(String, RawValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl<N: Into<String>> FromIterator<(N, RawValue)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (N, RawValue)>>(iter: T) -> Self {
        Self {
            columns: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

/// A scalar value inside a canonical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A normalized row, ready to be sent to the sink.
///
/// Serializes as a JSON object whose first key is [`SOURCE_TAG_KEY`]
/// followed by the kept fields in source column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    source: String,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(source: impl Into<String>, fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            source: source.into(),
            fields,
        }
    }

    /// Identifier of the source this record was read from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields, not counting the source tag
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(SOURCE_TAG_KEY, &self.source)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_source_tag_first() {
        let record = Record::new(
            "ED-02",
            vec![
                ("msisdn".to_string(), FieldValue::Text("812345".into())),
                ("temp".to_string(), FieldValue::Float(36.5)),
                ("active".to_string(), FieldValue::Bool(true)),
                ("note".to_string(), FieldValue::Null),
            ],
        );

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"DB":"ED-02","msisdn":"812345","temp":36.5,"active":true,"note":null}"#
        );
    }

    #[test]
    fn test_raw_row_preserves_column_order() {
        let row = RawRow::new()
            .with("b", "second")
            .with("a", 1i64)
            .with("c", vec![0u8, 1]);

        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn test_record_lookup() {
        let record = Record::new("src", vec![("k".to_string(), FieldValue::Int(7))]);
        assert_eq!(record.get("k"), Some(&FieldValue::Int(7)));
        assert_eq!(record.get("missing"), None);
        assert_eq!(record.source(), "src");
        assert_eq!(record.field_count(), 1);
    }
}

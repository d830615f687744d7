//! Record normalization
//!
//! Turns a [`RawRow`] into a [`Record`]: only allow-listed columns survive,
//! binary values become base64 text and the designated phone field is
//! cleansed. Columns that are not allow-listed, and allow-listed columns the
//! row does not have, are dropped without any error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashSet;

use crate::record::{FieldValue, RawRow, RawValue, Record, SOURCE_TAG_KEY};

/// Columns kept when no explicit allow-list is configured
pub const DEFAULT_KEEP_FIELDS: [&str; 3] = ["msisdn", "temp", "active"];

/// Column cleansed as a phone number by default
pub const DEFAULT_PHONE_FIELD: &str = "msisdn";

/// Country calling code stripped from phone numbers
const COUNTRY_CODE: &str = "62";

/// Strip whitespace and hyphens, one leading `+`, then one leading `62`.
///
/// ```
/// use rowpush_ingest::cleanse_phone;
///
/// assert_eq!(cleanse_phone("+62 812-345"), "812345");
/// assert_eq!(cleanse_phone("0812345"), "0812345");
/// ```
pub fn cleanse_phone(raw: &str) -> String {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let without_plus = compact.strip_prefix('+').unwrap_or(&compact);
    without_plus
        .strip_prefix(COUNTRY_CODE)
        .unwrap_or(without_plus)
        .to_string()
}

/// Maps raw rows onto the canonical record shape
#[derive(Debug, Clone)]
pub struct Normalizer {
    keep: HashSet<String>,
    phone_field: Option<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_FIELDS).with_phone_field(DEFAULT_PHONE_FIELD)
    }
}

impl Normalizer {
    /// Normalizer keeping exactly `keep`, with no phone cleansing
    pub fn new<I, S>(keep: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keep: keep.into_iter().map(Into::into).collect(),
            phone_field: None,
        }
    }

    /// Cleanse `field` with [`cleanse_phone`]
    pub fn with_phone_field(mut self, field: impl Into<String>) -> Self {
        self.phone_field = Some(field.into());
        self
    }

    pub fn keeps(&self, field: &str) -> bool {
        self.keep.contains(field)
    }

    pub fn phone_field(&self) -> Option<&str> {
        self.phone_field.as_deref()
    }

    /// Build the record for one row read from `source`.
    ///
    /// A raw column named like the source tag is dropped so the tag is never
    /// shadowed. If a kept column appears twice, the later value wins and the
    /// field stays at the position of its first occurrence.
    pub fn normalize(&self, source: &str, row: RawRow) -> Record {
        let mut fields: Vec<(String, FieldValue)> = Vec::with_capacity(self.keep.len());

        for (name, raw) in row {
            if name == SOURCE_TAG_KEY || !self.keep.contains(&name) {
                continue;
            }

            let mut value = to_field_value(raw);
            if self.phone_field.as_deref() == Some(name.as_str()) {
                value = cleanse_phone_value(value);
            }

            match fields.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => fields.push((name, value)),
            }
        }

        Record::new(source, fields)
    }

    pub fn normalize_all<I>(&self, source: &str, rows: I) -> Vec<Record>
    where
        I: IntoIterator<Item = RawRow>,
    {
        rows.into_iter()
            .map(|row| self.normalize(source, row))
            .collect()
    }
}

fn to_field_value(raw: RawValue) -> FieldValue {
    match raw {
        RawValue::Null => FieldValue::Null,
        RawValue::Bool(b) => FieldValue::Bool(b),
        RawValue::Int(i) => FieldValue::Int(i),
        RawValue::Float(f) => FieldValue::Float(f),
        RawValue::Text(s) => FieldValue::Text(s),
        RawValue::Bytes(bytes) => FieldValue::Text(STANDARD.encode(bytes)),
    }
}

// Integer phone columns are rendered as text first; anything else is left alone.
fn cleanse_phone_value(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(s) => FieldValue::Text(cleanse_phone(&s)),
        FieldValue::Int(i) => FieldValue::Text(cleanse_phone(&i.to_string())),
        other => other,
    }
}

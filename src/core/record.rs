//! Flat `type | key | field | value` rows as read from the data sheet.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::utils::normalize::clean_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Text,
    Image,
    Product,
    Ingredient,
    Review,
}

impl RecordType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(RecordType::Text),
            "image" => Some(RecordType::Image),
            "product" => Some(RecordType::Product),
            "ingredient" => Some(RecordType::Ingredient),
            "review" => Some(RecordType::Review),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub key: String,
    pub field: String,
    pub value: String,
}

impl Record {
    pub fn new(
        record_type: RecordType,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            key: key.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Build a record from a header-keyed row.
    ///
    /// Returns `None` when `type` or `key` is blank, or the type is not one of
    /// the known record types. Such rows are dropped without a report.
    pub fn from_row(row: &Map<String, Value>) -> Option<Self> {
        let record_type = clean_value(row.get("type"));
        let key = clean_value(row.get("key"));
        if record_type.is_empty() || key.is_empty() {
            return None;
        }

        Some(Self {
            record_type: RecordType::parse(&record_type)?,
            key,
            field: clean_value(row.get("field")),
            value: clean_value(row.get("value")),
        })
    }
}

/// Convert raw rows into records, discarding malformed ones.
pub fn from_rows(rows: &[Map<String, Value>]) -> Vec<Record> {
    rows.iter().filter_map(Record::from_row).collect()
}

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Number, Value as JsonValue};

use crate::types::RowValues;

/// A row whose values can be looked up by column name.
///
/// Column names and the name lookup table are shared by every record of the same cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValues>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl Record {
    /// Build a record, computing its own lookup table.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let cache = Arc::new(column_index(&column_names));
        Self {
            column_names,
            values,
            column_index_cache: cache,
        }
    }

    pub(crate) fn with_cache(
        column_names: Arc<Vec<String>>,
        column_index_cache: Arc<HashMap<String, usize>>,
        values: Vec<RowValues>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index_cache,
        }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Position of a column, by exact name; the first column wins on duplicates.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }
}

pub(crate) fn column_index(column_names: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    index
}

/// One fetched row, in the format the facade was configured with.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Tuple(Vec<RowValues>),
    Record(Record),
}

impl Row {
    /// Values in column order, regardless of format.
    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        match self {
            Row::Tuple(values) => values,
            Row::Record(record) => record.values(),
        }
    }

    #[must_use]
    pub fn into_values(self) -> Vec<RowValues> {
        match self {
            Row::Tuple(values) => values,
            Row::Record(record) => record.values,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values().get(index)
    }

    /// Look up a value by column name. Tuple rows carry no names and always return `None`.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.as_record().and_then(|record| record.get(column_name))
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Row::Record(record) => Some(record),
            Row::Tuple(_) => None,
        }
    }

    /// JSON rendering: an array for tuples, an object for records.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Row::Tuple(values) => JsonValue::Array(values.iter().map(value_to_json).collect()),
            Row::Record(record) => {
                let mut map = Map::with_capacity(record.values.len());
                for (name, value) in record.column_names.iter().zip(&record.values) {
                    map.entry(name.clone()).or_insert_with(|| value_to_json(value));
                }
                JsonValue::Object(map)
            }
        }
    }
}

fn value_to_json(value: &RowValues) -> JsonValue {
    match value {
        RowValues::Int(i) => JsonValue::from(*i),
        RowValues::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        RowValues::Text(s) => JsonValue::String(s.clone()),
        RowValues::Bool(b) => JsonValue::Bool(*b),
        RowValues::Timestamp(dt) => JsonValue::String(dt.format("%F %T%.f").to_string()),
        RowValues::Null => JsonValue::Null,
        RowValues::JSON(j) => j.clone(),
        RowValues::Blob(bytes) => JsonValue::from(bytes.clone()),
    }
}

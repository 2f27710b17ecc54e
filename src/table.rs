//! Tabular view of list responses
//!
//! Most GIDEON endpoints answer with `{"data": [ {...}, {...} ]}`. Those
//! responses convert into a `Table`; anything else is kept as raw JSON.

use serde_json::{Map, Value};
use std::fmt;

/// Column-oriented view over a list of JSON records
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names in first-seen order
    pub columns: Vec<String>,
    /// One row per record; missing cells are `Value::Null`
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table from a list of JSON objects
    ///
    /// Returns `None` if any element is not an object.
    pub fn from_records(records: &[Value]) -> Option<Self> {
        let objects: Vec<&Map<String, Value>> =
            records.iter().map(Value::as_object).collect::<Option<_>>()?;

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|column| object.get(column).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Some(Self { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, if it exists
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }
}

/// Renders the table as tab-separated text with a header line
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns.join("\t"))?;
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        Ok(())
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A response converted to a table where possible
#[derive(Debug, Clone, PartialEq)]
pub enum Tabular {
    Table(Table),
    Raw(Value),
}

impl From<Value> for Tabular {
    fn from(value: Value) -> Self {
        let table = match &value {
            Value::Object(map) if map.len() == 1 => map
                .get("data")
                .and_then(Value::as_array)
                .and_then(|records| Table::from_records(records)),
            _ => None,
        };

        match table {
            Some(table) => Tabular::Table(table),
            None => Tabular::Raw(value),
        }
    }
}

impl fmt::Display for Tabular {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tabular::Table(table) => fmt::Display::fmt(table, f),
            Tabular::Raw(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                writeln!(f, "{}", pretty)
            }
        }
    }
}

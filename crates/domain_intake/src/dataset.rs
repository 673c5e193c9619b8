//! Training data schema
//!
//! Historical claims arrive as a table of loosely-typed rows. Before any
//! model is fitted the table is checked against an explicit [`ColumnSchema`]:
//! the text and label columns are required, the two numeric columns are
//! optional and only enable anomaly detection when both are present.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::anomaly::NumericRow;
use crate::error::SchemaError;

/// Column names used to read a training table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    /// Free-text claim description (required)
    pub text: String,
    /// Category label (required)
    pub label: String,
    /// Claimed amount (optional)
    pub amount: String,
    /// Customer tenure in whole years (optional)
    pub tenure: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            text: "Description".to_string(),
            label: "Policy_Type".to_string(),
            amount: "Amount".to_string(),
            tenure: "Customer_Tenure".to_string(),
        }
    }
}

/// Raw training rows keyed by column name
///
/// The column set is the union of keys over all rows; a key missing from a
/// single row is a missing value, not a missing column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingTable {
    rows: Vec<Map<String, Value>>,
}

impl TrainingTable {
    pub fn new(rows: Vec<Map<String, Value>>) -> Self {
        Self { rows }
    }

    /// Parses a JSON array of row objects
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| SchemaError::Malformed(format!("invalid JSON: {}", e)))?;
        Self::from_json_value(value)
    }

    /// Accepts a JSON array whose elements are all objects
    pub fn from_json_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Array(items) = value else {
            return Err(SchemaError::Malformed(
                "expected an array of row objects".to_string(),
            ));
        };

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(row) => Ok(row),
                other => Err(SchemaError::Malformed(format!(
                    "row {} is {} rather than an object",
                    index + 1,
                    json_kind(&other)
                ))),
            })
            .collect::<Result<_, _>>()?;

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All column names seen in any row
    pub fn columns(&self) -> BTreeSet<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.rows.iter().any(|row| row.contains_key(name))
    }
}

/// One validated historical claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub description: String,
    pub category_label: String,
    /// 0 when the amount column is absent or the cell is blank
    pub amount: f64,
    /// 0 when the tenure column is absent or the cell is blank
    pub tenure: u32,
}

/// Validated, ordered training records
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingDataset {
    records: Vec<TrainingRecord>,
    missing_numeric_columns: Vec<String>,
}

impl TrainingDataset {
    /// Validates a table against the schema
    ///
    /// # Errors
    ///
    /// - `SchemaError::EmptyDataset` when the table has no rows
    /// - `SchemaError::MissingColumn` when the text or label column is absent
    /// - `SchemaError::InvalidValue` for blank labels, non-numeric or
    ///   negative amounts, and tenures that are not whole non-negative numbers
    pub fn from_table(table: &TrainingTable, schema: &ColumnSchema) -> Result<Self, SchemaError> {
        if table.is_empty() {
            return Err(SchemaError::EmptyDataset);
        }

        for required in [&schema.text, &schema.label] {
            if !table.has_column(required) {
                return Err(SchemaError::MissingColumn {
                    column: required.clone(),
                });
            }
        }

        let missing_numeric_columns: Vec<String> = [&schema.amount, &schema.tenure]
            .into_iter()
            .filter(|column| !table.has_column(column))
            .cloned()
            .collect();
        let numeric_enabled = missing_numeric_columns.is_empty();

        let records = table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| -> Result<TrainingRecord, SchemaError> {
                let row_number = index + 1;
                let (amount, tenure) = if numeric_enabled {
                    (
                        read_amount(row, &schema.amount, row_number)?,
                        read_tenure(row, &schema.tenure, row_number)?,
                    )
                } else {
                    (0.0, 0)
                };

                Ok(TrainingRecord {
                    description: read_text(row.get(&schema.text)),
                    category_label: read_label(row, &schema.label, row_number)?,
                    amount,
                    tenure,
                })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            records,
            missing_numeric_columns,
        })
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.records.iter().map(|r| r.description.clone()).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.category_label.clone()).collect()
    }

    /// True when both numeric columns were present
    pub fn has_numeric_features(&self) -> bool {
        self.missing_numeric_columns.is_empty()
    }

    /// Names of absent numeric columns, in schema order
    pub fn missing_numeric_columns(&self) -> &[String] {
        &self.missing_numeric_columns
    }

    /// (amount, tenure) rows, or `None` when anomaly detection is disabled
    pub fn numeric_rows(&self) -> Option<Vec<NumericRow>> {
        self.has_numeric_features().then(|| {
            self.records
                .iter()
                .map(|r| [r.amount, f64::from(r.tenure)])
                .collect()
        })
    }
}

fn read_text(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn read_label(row: &Map<String, Value>, column: &str, row_number: usize) -> Result<String, SchemaError> {
    let label = read_text(row.get(column));
    let label = label.trim();
    if label.is_empty() {
        return Err(invalid(row_number, column, "category label is missing"));
    }
    Ok(label.to_string())
}

/// Reads a non-negative number; null and blank cells count as zero
fn read_number(row: &Map<String, Value>, column: &str, row_number: usize) -> Result<f64, SchemaError> {
    let value = match row.get(column) {
        None | Some(Value::Null) => return Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| invalid(row_number, column, "number out of range"))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(0.0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(row_number, column, format!("'{}' is not a number", s)))?,
        Some(other) => {
            return Err(invalid(
                row_number,
                column,
                format!("expected a number, found {}", json_kind(other)),
            ))
        }
    };

    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            row_number,
            column,
            format!("{} is not a finite non-negative number", value),
        ));
    }
    Ok(value)
}

fn read_amount(row: &Map<String, Value>, column: &str, row_number: usize) -> Result<f64, SchemaError> {
    read_number(row, column, row_number)
}

fn read_tenure(row: &Map<String, Value>, column: &str, row_number: usize) -> Result<u32, SchemaError> {
    let value = read_number(row, column, row_number)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(invalid(
            row_number,
            column,
            format!("tenure {} is not a whole number of years", value),
        ));
    }
    Ok(value as u32)
}

fn invalid(row: usize, column: &str, message: impl Into<String>) -> SchemaError {
    SchemaError::InvalidValue {
        row,
        column: column.to_string(),
        message: message.into(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: Value) -> TrainingTable {
        TrainingTable::from_json_value(value).unwrap()
    }

    #[test]
    fn test_full_schema_enables_numeric_features() {
        let t = table(json!([
            {"Description": "car crash", "Policy_Type": "Auto", "Amount": 1200.5, "Customer_Tenure": 3},
            {"Description": "tooth", "Policy_Type": "Health", "Amount": "300", "Customer_Tenure": "2"},
        ]));
        let dataset = TrainingDataset::from_table(&t, &ColumnSchema::default()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.has_numeric_features());
        assert_eq!(dataset.numeric_rows().unwrap(), vec![[1200.5, 3.0], [300.0, 2.0]]);
    }

    #[test]
    fn test_missing_label_column_is_schema_error() {
        let t = table(json!([{"Description": "car crash"}]));
        let err = TrainingDataset::from_table(&t, &ColumnSchema::default()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumn {
                column: "Policy_Type".to_string()
            }
        );
    }

    #[test]
    fn test_missing_numeric_columns_disable_features() {
        let t = table(json!([
            {"Description": "car crash", "Policy_Type": "Auto", "Amount": 10},
        ]));
        let dataset = TrainingDataset::from_table(&t, &ColumnSchema::default()).unwrap();
        assert!(!dataset.has_numeric_features());
        assert_eq!(dataset.missing_numeric_columns(), &["Customer_Tenure".to_string()]);
        assert!(dataset.numeric_rows().is_none());
    }

    #[test]
    fn test_blank_numeric_cells_are_zero() {
        let t = table(json!([
            {"Description": "a", "Policy_Type": "Auto", "Amount": null, "Customer_Tenure": ""},
            {"Description": "b", "Policy_Type": "Home", "Amount": 5, "Customer_Tenure": 1},
        ]));
        let dataset = TrainingDataset::from_table(&t, &ColumnSchema::default()).unwrap();
        assert_eq!(dataset.records()[0].amount, 0.0);
        assert_eq!(dataset.records()[0].tenure, 0);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let t = table(json!([
            {"Description": "a", "Policy_Type": "Auto", "Amount": -5, "Customer_Tenure": 1},
        ]));
        let err = TrainingDataset::from_table(&t, &ColumnSchema::default()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn test_fractional_tenure_rejected() {
        let t = table(json!([
            {"Description": "a", "Policy_Type": "Auto", "Amount": 5, "Customer_Tenure": 1.5},
        ]));
        assert!(TrainingDataset::from_table(&t, &ColumnSchema::default()).is_err());
    }

    #[test]
    fn test_blank_label_rejected() {
        let t = table(json!([
            {"Description": "a", "Policy_Type": "Auto"},
            {"Description": "b", "Policy_Type": "  "},
        ]));
        let err = TrainingDataset::from_table(&t, &ColumnSchema::default()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { row: 2, .. }));
    }

    #[test]
    fn test_non_array_is_malformed() {
        let err = TrainingTable::from_json_str(r#"{"Description": "x"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn test_empty_table_rejected() {
        let err = TrainingDataset::from_table(&TrainingTable::default(), &ColumnSchema::default())
            .unwrap_err();
        assert_eq!(err, SchemaError::EmptyDataset);
    }

    #[test]
    fn test_custom_schema_column_names() {
        let schema = ColumnSchema {
            text: "notes".to_string(),
            label: "line".to_string(),
            ..ColumnSchema::default()
        };
        let t = table(json!([{"notes": "hail on roof", "line": "Home"}]));
        let dataset = TrainingDataset::from_table(&t, &schema).unwrap();
        assert_eq!(dataset.labels(), vec!["Home".to_string()]);
        assert_eq!(dataset.descriptions(), vec!["hail on roof".to_string()]);
    }
}

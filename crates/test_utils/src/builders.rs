//! Test Data Builders
//!
//! Builder patterns for constructing training tables and claims with
//! sensible defaults, so tests specify only the fields they care about.

use serde_json::{Map, Value};

use domain_intake::{ClaimInput, TrainingTable};

/// Builder for training tables
///
/// Rows start with the four standard columns; individual columns can be
/// dropped or blanked to exercise schema handling.
#[derive(Debug, Clone, Default)]
pub struct TrainingTableBuilder {
    rows: Vec<Map<String, Value>>,
}

impl TrainingTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fully populated row
    pub fn row(mut self, description: &str, label: &str, amount: f64, tenure: u32) -> Self {
        let mut row = Map::new();
        row.insert("Description".to_string(), Value::from(description));
        row.insert("Policy_Type".to_string(), Value::from(label));
        row.insert("Amount".to_string(), Value::from(amount));
        row.insert("Customer_Tenure".to_string(), Value::from(tenure));
        self.rows.push(row);
        self
    }

    /// Adds `count` rows for one label with spread-out amounts
    pub fn rows_for(mut self, label: &str, descriptions: &[&str], count: usize) -> Self {
        for i in 0..count {
            let description = descriptions[i % descriptions.len()];
            self = self.row(description, label, 500.0 + 75.0 * i as f64, (i % 8) as u32);
        }
        self
    }

    /// Sets a cell on every row
    pub fn with_cell(mut self, column: &str, value: Value) -> Self {
        for row in &mut self.rows {
            row.insert(column.to_string(), value.clone());
        }
        self
    }

    /// Removes a column from every row
    pub fn without_column(mut self, column: &str) -> Self {
        for row in &mut self.rows {
            row.remove(column);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as a JSON array, the body accepted by the training endpoint
    pub fn to_json(&self) -> Value {
        Value::Array(self.rows.iter().cloned().map(Value::Object).collect())
    }

    pub fn build(self) -> TrainingTable {
        TrainingTable::new(self.rows)
    }
}

/// Builder for claim inputs
#[derive(Debug, Clone)]
pub struct ClaimInputBuilder {
    customer_id: String,
    description: String,
    amount: f64,
    tenure: u32,
}

impl Default for ClaimInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimInputBuilder {
    pub fn new() -> Self {
        Self {
            customer_id: "CUST-0001".to_string(),
            description: "water damage in kitchen".to_string(),
            amount: 1_000.0,
            tenure: 3,
        }
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_tenure(mut self, tenure: u32) -> Self {
        self.tenure = tenure;
        self
    }

    pub fn build(self) -> ClaimInput {
        ClaimInput {
            customer_id: self.customer_id,
            description: self.description,
            amount: self.amount,
            tenure: self.tenure,
        }
    }

    /// The claim as a submission request body
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "customer_id": self.customer_id,
            "description": self.description,
            "amount": self.amount,
            "tenure": self.tenure,
        })
    }
}

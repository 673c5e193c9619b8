//! Pre-built Test Fixtures
//!
//! Historical claim tables shaped like the production training export,
//! plus a handful of incoming claims. Amounts and tenures are generated
//! deterministically so every test trains on identical data.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

use domain_intake::{ClaimInput, ModelBundle, TrainingPipeline, TrainingTable};

/// Descriptions per policy type used across the fixtures
pub const AUTO_DESCRIPTIONS: &[&str] = &[
    "rear-ended at traffic lights, bumper and boot damaged",
    "windscreen cracked by stone on the motorway",
    "side mirror knocked off while parked",
    "car crash at junction, front wing dented",
    "vehicle scraped by lorry in car park",
    "hail dented car roof and bonnet",
    "stolen car recovered with broken ignition",
];

pub const HEALTH_DESCRIPTIONS: &[&str] = &[
    "hospital stay after appendix surgery",
    "dental treatment for broken tooth",
    "physiotherapy sessions after knee surgery",
    "prescription medication for chronic back pain",
    "emergency room visit for allergic reaction",
    "specialist consultation and blood tests",
    "ambulance transfer to hospital after fall",
];

pub const HOME_DESCRIPTIONS: &[&str] = &[
    "kitchen flooded by burst pipe",
    "roof tiles blown off in storm",
    "burglary, television and laptop stolen from house",
    "fire in garage destroyed tools",
    "ceiling collapsed after water leak from bathroom",
    "fence and shed damaged by fallen tree",
    "lightning strike damaged boiler and wiring",
];

/// Fixture for training tables
pub struct TrainingFixtures;

impl TrainingFixtures {
    /// Raw rows with all four standard columns
    pub fn historical_rows() -> Vec<Value> {
        let groups = [
            ("Auto", AUTO_DESCRIPTIONS),
            ("Health", HEALTH_DESCRIPTIONS),
            ("Home", HOME_DESCRIPTIONS),
        ];

        let mut rows = Vec::new();
        for (label, descriptions) in groups {
            for (i, description) in descriptions.iter().enumerate() {
                rows.push(json!({
                    "Description": description,
                    "Policy_Type": label,
                    "Amount": 850.0 + 125.0 * i as f64,
                    "Customer_Tenure": 1 + (i % 6),
                }));
            }
        }
        rows
    }

    /// All standard columns
    pub fn historical() -> TrainingTable {
        Self::table(Self::historical_rows())
    }

    /// Description and label only; trains without fraud detection
    pub fn text_only() -> TrainingTable {
        let rows = Self::historical_rows()
            .into_iter()
            .map(|row| {
                json!({
                    "Description": row["Description"],
                    "Policy_Type": row["Policy_Type"],
                })
            })
            .collect();
        Self::table(rows)
    }

    /// Rows lacking the label column
    pub fn unlabelled() -> TrainingTable {
        Self::table(vec![
            json!({"Description": "burst pipe", "Amount": 100, "Customer_Tenure": 2}),
            json!({"Description": "cracked windscreen", "Amount": 300, "Customer_Tenure": 4}),
        ])
    }

    /// Number of rows in [`TrainingFixtures::historical`]
    pub fn historical_len() -> usize {
        AUTO_DESCRIPTIONS.len() + HEALTH_DESCRIPTIONS.len() + HOME_DESCRIPTIONS.len()
    }

    fn table(rows: Vec<Value>) -> TrainingTable {
        TrainingTable::from_json_value(Value::Array(rows))
            .expect("fixture rows are JSON objects")
    }
}

static HISTORICAL_BUNDLE: Lazy<ModelBundle> = Lazy::new(|| {
    TrainingPipeline::default()
        .train(&TrainingFixtures::historical())
        .expect("fixture table trains")
        .bundle
});

static TEXT_ONLY_BUNDLE: Lazy<ModelBundle> = Lazy::new(|| {
    TrainingPipeline::default()
        .train(&TrainingFixtures::text_only())
        .expect("fixture table trains")
        .bundle
});

/// Fixture for trained bundles, fitted once per test binary
pub struct BundleFixtures;

impl BundleFixtures {
    /// Bundle with category model and anomaly detector
    pub fn historical() -> &'static ModelBundle {
        &HISTORICAL_BUNDLE
    }

    /// Bundle without an anomaly detector
    pub fn text_only() -> &'static ModelBundle {
        &TEXT_ONLY_BUNDLE
    }
}

/// Fixture for incoming claims
pub struct ClaimFixtures;

impl ClaimFixtures {
    pub fn routine() -> ClaimInput {
        ClaimInput {
            customer_id: "CUST-1001".to_string(),
            description: "roof tiles blown off in storm".to_string(),
            amount: 1_100.0,
            tenure: 4,
        }
    }

    pub fn urgent() -> ClaimInput {
        ClaimInput {
            customer_id: "CUST-1002".to_string(),
            description: "severe pain after car crash on the motorway".to_string(),
            amount: 1_400.0,
            tenure: 3,
        }
    }

    /// Far outside the historical amount range with no tenure
    pub fn suspicious() -> ClaimInput {
        ClaimInput {
            customer_id: "CUST-1003".to_string(),
            description: "laptop stolen from house".to_string(),
            amount: 750_000.0,
            tenure: 0,
        }
    }
}

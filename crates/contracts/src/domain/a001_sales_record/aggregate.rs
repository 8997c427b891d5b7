use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::date_utils::parse_sales_date;

/// ID of a sales record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesRecordId(pub Uuid);

impl SalesRecordId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }

    pub fn as_string(&self) -> String {
        self.0.to_string()
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SalesRecordId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

impl std::fmt::Display for SalesRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One sales transaction line (aggregate a001)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub id: SalesRecordId,

    /// Transaction date, ISO-ish text ("2024-01-15")
    pub date: String,

    pub product: String,
    pub category: String,
    pub region: String,

    /// Customer segment ("Retail", "B2B"), if the file carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<String>,

    pub quantity: f64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl SalesRecord {
    /// Parsed transaction date (UTC); `None` if the stored text is not a date.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        parse_sales_date(&self.date)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.parsed_date().is_none() {
            return Err(format!("Invalid date: '{}'", self.date));
        }
        if self.product.trim().is_empty() {
            return Err("Product must not be empty".into());
        }
        Ok(())
    }
}

/// Response for the record list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecordListResponse {
    pub items: Vec<SalesRecord>,
    /// Records matching the filter
    pub shown: usize,
    /// Records in the store
    pub total: usize,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a name is for sale, and at what price.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleState {
    pub sellable: bool,
    pub price: f64,
}

/// Pricing and availability of a name, merged from the registry's name-info
/// and sale-state views.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameInfo {
    pub price: f64,
    pub market_price: f64,
    pub is_available: bool,
    pub is_for_sale: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
}

/// The registry's own name-info row. Only read, never returned as-is.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawNameInfo {
    #[serde(default)]
    pub expiry_date: Option<Value>,
    #[serde(default)]
    pub last_price: Option<Value>,
}

/// Handle for a submitted command, used to poll for its result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
    pub request_key: String,
    pub chain_id: String,
    pub network_id: String,
}

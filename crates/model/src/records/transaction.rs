use crate::{core::time, error::ModelError};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Complete,
}

/// Normalized exchange transaction, identical in shape for every partner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTransaction {
    pub status: TxStatus,
    pub order_id: String,

    pub deposit_txid: String,
    pub deposit_address: String,
    pub deposit_currency: String,
    pub deposit_amount: BigDecimal,

    pub payout_txid: Option<String>,
    pub payout_address: String,
    pub payout_currency: String,
    pub payout_amount: BigDecimal,

    /// Unix epoch seconds.
    pub timestamp: f64,
    pub iso_date: String,
    pub usd_value: Option<f64>,

    pub raw_tx: Value,
}

impl CanonicalTransaction {
    /// Whole epoch seconds, rounded down. Used for watermark bookkeeping.
    pub fn epoch_seconds(&self) -> i64 {
        self.timestamp.floor() as i64
    }

    /// Epoch seconds as recovered from `iso_date`.
    pub fn iso_epoch_seconds(&self) -> Result<f64, ModelError> {
        time::iso_to_epoch_seconds(&self.iso_date)
    }
}

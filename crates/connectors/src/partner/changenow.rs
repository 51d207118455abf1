//! ChangeNOW partner.
//!
//! The listing endpoint has no time ordering, so progress is tracked with an
//! offset cursor that is rolled back at the end of each run to pick up
//! transactions that finalized after they were first listed.

use crate::{
    error::SchemaViolation,
    http::PageRequest,
    partner::{Partner, PartnerDefaults},
    validation::{Probe, populated, validate},
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use model::{
    core::{amount::de_decimal_number, time},
    pagination::cursor::CursorKind,
    records::transaction::{CanonicalTransaction, TxStatus},
};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://changenow.io/api/v1/transactions";
pub const ROLLBACK: u64 = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeNowProbe {
    status: String,
    #[serde(default)]
    payin_hash: Option<Value>,
    #[serde(default)]
    amount_send: Option<Value>,
    #[serde(default)]
    amount_receive: Option<Value>,
}

impl Probe for ChangeNowProbe {
    fn is_final(&self) -> bool {
        self.status == "finished"
            && populated(&self.payin_hash)
            && populated(&self.amount_send)
            && populated(&self.amount_receive)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNowTx {
    pub id: String,
    pub updated_at: DateTime<Utc>,
    pub payin_hash: String,
    pub payout_hash: String,
    pub payin_address: String,
    pub from_currency: String,
    #[serde(deserialize_with = "de_decimal_number")]
    pub amount_send: BigDecimal,
    pub payout_address: String,
    pub to_currency: String,
    #[serde(deserialize_with = "de_decimal_number")]
    pub amount_receive: BigDecimal,
}

pub fn map(tx: ChangeNowTx, raw: &Value) -> CanonicalTransaction {
    let (timestamp, iso_date) = time::stamp(tx.updated_at);
    CanonicalTransaction {
        status: TxStatus::Complete,
        order_id: tx.id,
        deposit_txid: tx.payin_hash,
        deposit_address: tx.payin_address,
        deposit_currency: tx.from_currency.to_uppercase(),
        deposit_amount: tx.amount_send,
        payout_txid: Some(tx.payout_hash),
        payout_address: tx.payout_address,
        payout_currency: tx.to_currency.to_uppercase(),
        payout_amount: tx.amount_receive,
        timestamp,
        iso_date,
        usd_value: None,
        raw_tx: raw.clone(),
    }
}

#[derive(Debug, Clone)]
pub struct ChangeNow {
    base_url: String,
}

impl ChangeNow {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for ChangeNow {
    fn default() -> Self {
        Self::new()
    }
}

impl Partner for ChangeNow {
    fn id(&self) -> &'static str {
        "changenow"
    }

    fn name(&self) -> &'static str {
        "Changenow"
    }

    fn cursor_kind(&self) -> CursorKind {
        CursorKind::Offset
    }

    fn defaults(&self) -> PartnerDefaults {
        PartnerDefaults {
            rollback: ROLLBACK,
            lookback: Duration::days(5),
        }
    }

    fn credential_key(&self) -> &'static str {
        "changenowApiKey"
    }

    fn credential_env(&self) -> &'static str {
        "CHANGENOW_API_KEY"
    }

    fn page_request(&self, api_key: &str, limit: usize, offset: u64) -> PageRequest {
        // The key is part of the path.
        PageRequest::new(format!("{}/{}", self.base_url, api_key))
            .with_log_url(format!("{}/<redacted>", self.base_url))
            .with_query("limit", limit)
            .with_query("offset", offset)
    }

    fn normalize(&self, raw: &Value) -> Result<Option<CanonicalTransaction>, SchemaViolation> {
        let verdict = validate::<ChangeNowProbe, ChangeNowTx>(self.id(), raw)?;
        Ok(verdict.accepted().map(|tx| map(tx, raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn finished() -> Value {
        json!({
            "id": "cn-1",
            "status": "finished",
            "updatedAt": "2024-02-10T08:30:00.250Z",
            "payinHash": "0xpayin",
            "payoutHash": "0xpayout",
            "payinAddress": "bc1qdeposit",
            "fromCurrency": "btc",
            "amountSend": 0.0153,
            "payoutAddress": "0xwithdraw",
            "toCurrency": "eth",
            "amountReceive": 0.42
        })
    }

    #[test]
    fn maps_finished_record() {
        let raw = finished();
        let tx = ChangeNow::new().normalize(&raw).unwrap().unwrap();

        assert_eq!(tx.status, TxStatus::Complete);
        assert_eq!(tx.order_id, "cn-1");
        assert_eq!(tx.deposit_txid, "0xpayin");
        assert_eq!(tx.deposit_currency, "BTC");
        assert_eq!(tx.payout_currency, "ETH");
        assert_eq!(tx.deposit_amount, BigDecimal::from_str("0.0153").unwrap());
        assert_eq!(tx.payout_amount, BigDecimal::from_str("0.42").unwrap());
        assert_eq!(tx.payout_txid.as_deref(), Some("0xpayout"));
        assert_eq!(tx.iso_date, "2024-02-10T08:30:00.250Z");
        assert_eq!(tx.iso_epoch_seconds().unwrap(), tx.timestamp);
        assert_eq!(tx.usd_value, None);
        assert_eq!(tx.raw_tx, raw);
    }

    #[test]
    fn skips_unfinished_and_partially_populated() {
        let partner = ChangeNow::new();

        let mut waiting = finished();
        waiting["status"] = json!("waiting");
        assert!(partner.normalize(&waiting).unwrap().is_none());

        let mut no_hash = finished();
        no_hash["payinHash"] = Value::Null;
        assert!(partner.normalize(&no_hash).unwrap().is_none());

        let mut no_amount = finished();
        no_amount.as_object_mut().unwrap().remove("amountReceive");
        assert!(partner.normalize(&no_amount).unwrap().is_none());
    }

    #[test]
    fn finished_record_with_broken_contract_is_a_violation() {
        let mut raw = finished();
        raw.as_object_mut().unwrap().remove("payoutAddress");
        let err = ChangeNow::new().normalize(&raw).unwrap_err();
        assert_eq!(err.partner, "changenow");

        let mut raw = finished();
        raw["amountSend"] = json!("0.0153");
        assert!(ChangeNow::new().normalize(&raw).is_err());
    }

    #[test]
    fn api_key_goes_in_the_path_but_not_the_log_url() {
        let req = ChangeNow::new()
            .with_base_url("http://localhost:9000/tx/")
            .page_request("secret", 100, 300);
        assert_eq!(req.url, "http://localhost:9000/tx/secret");
        assert!(!req.log_url.contains("secret"));
        assert_eq!(req.query_value("offset"), Some("300"));
        assert!(req.headers.is_empty());
    }
}

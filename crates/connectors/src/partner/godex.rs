//! Godex partner.
//!
//! The affiliate history is listed newest first, so runs resume from a
//! timestamp watermark and stop once a page reaches back past it.

use crate::{
    error::SchemaViolation,
    http::PageRequest,
    partner::{Partner, PartnerDefaults},
    validation::{Probe, populated, validate},
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use model::{
    core::{amount::de_decimal_str, time},
    pagination::cursor::CursorKind,
    records::transaction::{CanonicalTransaction, TxStatus},
};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.godex.io/api/v1/affiliate/history";

#[derive(Debug, Deserialize)]
struct GodexProbe {
    status: String,
    #[serde(default)]
    hash_in: Option<Value>,
}

impl Probe for GodexProbe {
    fn is_final(&self) -> bool {
        self.status == "success" && populated(&self.hash_in)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GodexTx {
    pub transaction_id: String,
    pub status: String,
    pub hash_in: String,
    pub deposit: String,
    pub coin_from: String,
    #[serde(deserialize_with = "de_decimal_str")]
    pub deposit_amount: BigDecimal,
    pub withdrawal: String,
    pub coin_to: String,
    #[serde(deserialize_with = "de_decimal_str")]
    pub withdrawal_amount: BigDecimal,
    /// Creation time, epoch seconds sent as a string.
    #[serde(deserialize_with = "time::de_epoch_seconds_str")]
    pub created_at: DateTime<Utc>,
}

/// Godex exposes no separate order id or payout hash; the deposit hash
/// doubles as the order id.
pub fn map(tx: GodexTx, raw: &Value) -> CanonicalTransaction {
    let (timestamp, iso_date) = time::stamp(tx.created_at);
    CanonicalTransaction {
        status: TxStatus::Complete,
        order_id: tx.hash_in.clone(),
        deposit_txid: tx.hash_in,
        deposit_address: tx.deposit,
        deposit_currency: tx.coin_from.to_uppercase(),
        deposit_amount: tx.deposit_amount,
        payout_txid: None,
        payout_address: tx.withdrawal,
        payout_currency: tx.coin_to.to_uppercase(),
        payout_amount: tx.withdrawal_amount,
        timestamp,
        iso_date,
        usd_value: None,
        raw_tx: raw.clone(),
    }
}

#[derive(Debug, Clone)]
pub struct Godex {
    base_url: String,
}

impl Godex {
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

impl Default for Godex {
    fn default() -> Self {
        Self::new()
    }
}

impl Partner for Godex {
    fn id(&self) -> &'static str {
        "godex"
    }

    fn name(&self) -> &'static str {
        "Godex"
    }

    fn cursor_kind(&self) -> CursorKind {
        CursorKind::Watermark
    }

    fn defaults(&self) -> PartnerDefaults {
        PartnerDefaults {
            rollback: 0,
            lookback: Duration::days(5),
        }
    }

    fn credential_key(&self) -> &'static str {
        "apiKey"
    }

    fn credential_env(&self) -> &'static str {
        "GODEX_API_KEY"
    }

    fn page_request(&self, api_key: &str, limit: usize, offset: u64) -> PageRequest {
        PageRequest::new(self.base_url.clone())
            .with_header("Authorization", api_key)
            .with_query("limit", limit)
            .with_query("offset", offset)
    }

    fn normalize(&self, raw: &Value) -> Result<Option<CanonicalTransaction>, SchemaViolation> {
        let verdict = validate::<GodexProbe, GodexTx>(self.id(), raw)?;
        Ok(verdict.accepted().map(|tx| map(tx, raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn success() -> Value {
        json!({
            "transaction_id": "gd-77",
            "status": "success",
            "hash_in": "hashin77",
            "deposit": "LTCdepositaddr",
            "coin_from": "ltc",
            "deposit_amount": "3.5",
            "withdrawal": "XMRwithdrawaddr",
            "coin_to": "xmr",
            "withdrawal_amount": "1.0125",
            "created_at": "1700000000"
        })
    }

    #[test]
    fn maps_success_record() {
        let raw = success();
        let tx = Godex::new().normalize(&raw).unwrap().unwrap();

        assert_eq!(tx.order_id, "hashin77");
        assert_eq!(tx.deposit_txid, "hashin77");
        assert_eq!(tx.payout_txid, None);
        assert_eq!(tx.deposit_currency, "LTC");
        assert_eq!(tx.payout_currency, "XMR");
        assert_eq!(tx.deposit_amount, BigDecimal::from_str("3.5").unwrap());
        assert_eq!(tx.payout_amount, BigDecimal::from_str("1.0125").unwrap());
        assert_eq!(tx.timestamp, 1_700_000_000.0);
        assert_eq!(tx.iso_date, "2023-11-14T22:13:20.000Z");
        assert_eq!(tx.raw_tx, raw);
    }

    #[test]
    fn skips_pending_and_hashless_records() {
        let partner = Godex::new();

        let mut pending = success();
        pending["status"] = json!("wait");
        assert!(partner.normalize(&pending).unwrap().is_none());

        let mut no_hash = success();
        no_hash["hash_in"] = Value::Null;
        assert!(partner.normalize(&no_hash).unwrap().is_none());
    }

    #[test]
    fn success_with_unparseable_amount_is_a_violation() {
        let mut raw = success();
        raw["deposit_amount"] = json!("three");
        let err = Godex::new().normalize(&raw).unwrap_err();
        assert_eq!(err.partner, "godex");

        let mut raw = success();
        raw["created_at"] = json!("yesterday");
        assert!(Godex::new().normalize(&raw).is_err());
    }

    #[test]
    fn api_key_travels_in_authorization_header() {
        let req = Godex::new().page_request("k-123", 100, 0);
        assert_eq!(req.url, DEFAULT_BASE_URL);
        assert_eq!(
            req.headers,
            vec![("Authorization".to_string(), "k-123".to_string())]
        );
        assert_eq!(req.query_value("limit"), Some("100"));
    }

    #[test]
    fn base_url_override_drops_trailing_slash() {
        let req = Godex::new()
            .with_base_url("http://localhost:9000/history/")
            .page_request("k", 10, 20);
        assert_eq!(req.url, "http://localhost:9000/history");
        assert_eq!(req.query_value("offset"), Some("20"));
    }
}

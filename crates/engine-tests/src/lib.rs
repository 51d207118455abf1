#![allow(dead_code)]

use async_trait::async_trait;
use connectors::{
    error::FetchError,
    http::{PageFetcher, PageRequest},
};
use model::sync::result::Credentials;
use serde_json::{Value, json};
use std::{collections::VecDeque, sync::Mutex};


/// One scripted upstream response.
pub enum Reply {
    Page(Vec<Value>),
    Fail(u16),
}

/// In-memory upstream: hands out scripted pages in order and records every
/// request it receives. Once the script runs out it serves empty pages.
#[derive(Default)]
pub struct ScriptedFetcher {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedFetcher {
    pub fn new(replies: Vec<Reply>) -> Self {
        ScriptedFetcher {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(pages: Vec<Vec<Value>>) -> Self {
        Self::new(pages.into_iter().map(Reply::Page).collect())
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    /// `offset` query values in request order.
    pub fn offsets(&self) -> Vec<u64> {
        self.requests()
            .iter()
            .filter_map(|r| r.query_value("offset"))
            .map(|o| o.parse().expect("numeric offset"))
            .collect()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<Value>, FetchError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let reply = self.replies.lock().expect("replies lock").pop_front();
        match reply {
            Some(Reply::Page(records)) => Ok(records),
            Some(Reply::Fail(status)) => Err(FetchError::Status {
                url: request.log_url.clone(),
                status,
            }),
            None => Ok(Vec::new()),
        }
    }
}

pub fn changenow_credentials() -> Credentials {
    Credentials::from([("changenowApiKey".to_string(), "cn-test-key".to_string())])
}

pub fn godex_credentials() -> Credentials {
    Credentials::from([("apiKey".to_string(), "gx-test-key".to_string())])
}

/// Finished ChangeNOW transaction with id `cn-{n}`.
pub fn changenow_finished(n: usize) -> Value {
    json!({
        "id": format!("cn-{n}"),
        "status": "finished",
        "updatedAt": "2024-05-06T07:08:09.500Z",
        "payinHash": format!("in-{n}"),
        "payoutHash": format!("out-{n}"),
        "payinAddress": "bc1qdeposit",
        "fromCurrency": "btc",
        "amountSend": 0.015,
        "payoutAddress": "0xpayout",
        "toCurrency": "eth",
        "amountReceive": 0.27
    })
}

pub fn changenow_with_status(n: usize, status: &str) -> Value {
    let mut raw = changenow_finished(n);
    raw["status"] = json!(status);
    raw
}

pub fn changenow_page(from: usize, count: usize) -> Vec<Value> {
    (from..from + count).map(changenow_finished).collect()
}

/// Successful Godex transaction created at `created_at` epoch seconds.
pub fn godex_success(created_at: i64) -> Value {
    json!({
        "transaction_id": format!("gx-{created_at}"),
        "status": "success",
        "hash_in": format!("hash-{created_at}"),
        "deposit": "LTCdepositaddr",
        "coin_from": "ltc",
        "deposit_amount": "1.25",
        "withdrawal": "TRXpayoutaddr",
        "coin_to": "usdt",
        "withdrawal_amount": "98.7",
        "created_at": created_at.to_string()
    })
}

pub fn godex_with_status(created_at: i64, status: &str) -> Value {
    let mut raw = godex_success(created_at);
    raw["status"] = json!(status);
    raw
}

/// `count` Godex records, newest first, one second apart, starting at `newest`.
pub fn godex_page(newest: i64, count: usize) -> Vec<Value> {
    (0..count as i64).map(|i| godex_success(newest - i)).collect()
}

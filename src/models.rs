use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEMO_BALANCE: u64 = 750;
pub const DEMO_STREAK: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
    pub streak: u64,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            balance: DEMO_BALANCE,
            streak: DEMO_STREAK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub at_ms: i64,
    pub delta: u64,
    pub reason: String,
}

/// Everything kept in the data file. `entries` is a flat string key-value map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StoreData {
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: Option<String>,
}

impl User {
    pub fn demo() -> Self {
        Self {
            id: 123_456,
            username: Some("DemoUser".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRules {
    pub cooldown_secs: u64,
    pub reward: u64,
}

impl Default for ClaimRules {
    fn default() -> Self {
        Self {
            cooldown_secs: crate::cooldown::DEFAULT_COOLDOWN_SECS,
            reward: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: u64,
    pub username: Option<String>,
    pub balance: u64,
    pub streak: u64,
    pub last_daily_claim: Option<i64>,
    pub next_claim_in: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub allowed: bool,
    pub balance: u64,
    pub streak: u64,
    pub next_claim_in: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// A `/health` body as received; only `status` is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub body: serde_json::Value,
}

impl HealthReport {
    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(serde_json::Value::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.status() == Some("ok")
    }
}

/// Who logged in, plus the account fetched while doing so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub user: User,
    pub me: MeResponse,
}

#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub entries: Vec<LedgerEntry>,
}

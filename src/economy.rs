use crate::cooldown::{ClaimDecision, LAST_CLAIM_KEY, evaluate_claim, parse_last_claim};
use crate::errors::StoreError;
use crate::models::{Account, ClaimResponse, ClaimRules, LedgerEntry, StoreData};
use crate::storage::{LocalStore, persist_data};
use tracing::info;

pub const DAILY_REASON: &str = "daily";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountView {
    pub account: Account,
    pub last_claim_ms: Option<i64>,
    pub next_claim_in: Option<u64>,
}

pub fn last_claim(data: &StoreData) -> Option<i64> {
    parse_last_claim(data.entries.get(LAST_CLAIM_KEY).map(String::as_str))
}

pub fn account_view(data: &StoreData, now_ms: i64, rules: ClaimRules) -> AccountView {
    let last_claim_ms = last_claim(data);
    AccountView {
        account: data.account.unwrap_or_default(),
        last_claim_ms,
        next_claim_in: evaluate_claim(last_claim_ms, now_ms, rules.cooldown_secs).remaining_secs(),
    }
}

/// Computes the store value after a claim at `now_ms`. Returns `None` when
/// the claim is still cooling down.
pub fn apply_claim(
    data: &StoreData,
    now_ms: i64,
    rules: ClaimRules,
) -> (ClaimResponse, Option<StoreData>) {
    let account = data.account.unwrap_or_default();
    let previous = last_claim(data);
    if let ClaimDecision::Cooldown { remaining_secs } =
        evaluate_claim(previous, now_ms, rules.cooldown_secs)
    {
        let response = ClaimResponse {
            allowed: false,
            balance: account.balance,
            streak: account.streak,
            next_claim_in: Some(remaining_secs),
        };
        return (response, None);
    }

    let streak = if previous.is_some_and(|last| missed_period(last, now_ms, rules.cooldown_secs)) {
        1
    } else {
        account.streak.saturating_add(1)
    };
    let updated = Account {
        balance: account.balance.saturating_add(rules.reward),
        streak,
    };
    let mut next = data.clone();
    next.entries.insert(LAST_CLAIM_KEY.to_string(), now_ms.to_string());
    next.account = Some(updated);
    next.ledger.push(LedgerEntry {
        at_ms: now_ms,
        delta: rules.reward,
        reason: DAILY_REASON.to_string(),
    });

    let response = ClaimResponse {
        allowed: true,
        balance: updated.balance,
        streak: updated.streak,
        next_claim_in: Some(rules.cooldown_secs),
    };
    (response, Some(next))
}

/// A whole claimable period went by without a claim.
fn missed_period(last_ms: i64, now_ms: i64, cooldown_secs: u64) -> bool {
    i128::from(now_ms) - i128::from(last_ms) >= 2 * i128::from(cooldown_secs) * 1000
}

/// Claim commit: the timestamp, account and ledger entry land in one file
/// write, and memory is only updated after that write succeeds.
pub async fn claim_daily(
    store: &LocalStore,
    now_ms: i64,
    rules: ClaimRules,
) -> Result<ClaimResponse, StoreError> {
    let mut data = store.lock().await;
    let (response, next) = apply_claim(&data, now_ms, rules);

    match next {
        Some(next) => {
            persist_data(store.path(), &next).await?;
            *data = next;
            info!(
                balance = response.balance,
                streak = response.streak,
                "daily claim committed"
            );
        }
        None => {
            info!(
                remaining_secs = response.next_claim_in,
                "daily claim denied, cooldown active"
            );
        }
    }

    Ok(response)
}

pub async fn balance(store: &LocalStore, now_ms: i64, rules: ClaimRules) -> AccountView {
    let data = store.lock().await;
    account_view(&data, now_ms, rules)
}

pub async fn ledger(store: &LocalStore) -> Vec<LedgerEntry> {
    store.lock().await.ledger.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_data, unique_test_path};

    const T: i64 = 1_767_225_600_000;

    fn rules() -> ClaimRules {
        ClaimRules::default()
    }

    #[tokio::test]
    async fn first_claim_rewards_demo_account_and_stores_timestamp() {
        let path = unique_test_path("claim_first");
        let store = LocalStore::new(path.clone(), StoreData::default());

        let response = claim_daily(&store, T, rules()).await.unwrap();

        assert!(response.allowed);
        assert_eq!(response.balance, 850);
        assert_eq!(response.streak, 4);
        assert_eq!(response.next_claim_in, Some(86_400));

        let on_disk = load_data(&path).await;
        assert_eq!(on_disk.entries.get(LAST_CLAIM_KEY).map(String::as_str), Some("1767225600000"));
        assert_eq!(on_disk.account, Some(Account { balance: 850, streak: 4 }));
        assert_eq!(on_disk.ledger.len(), 1);
        assert_eq!(on_disk.ledger[0].delta, 100);
        assert_eq!(on_disk.ledger[0].reason, DAILY_REASON);
        assert_eq!(store.snapshot().await, on_disk);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn second_claim_within_period_is_denied_without_writes() {
        let path = unique_test_path("claim_twice");
        let store = LocalStore::new(path.clone(), StoreData::default());
        claim_daily(&store, T, rules()).await.unwrap();
        let before = store.snapshot().await;

        let response = claim_daily(&store, T + 1000, rules()).await.unwrap();

        assert!(!response.allowed);
        assert_eq!(response.next_claim_in, Some(86_399));
        assert_eq!(response.balance, 850);
        assert_eq!(store.snapshot().await, before);
        assert_eq!(load_data(&path).await, before);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn claim_after_full_period_extends_streak() {
        let path = unique_test_path("claim_next_day");
        let store = LocalStore::new(path.clone(), StoreData::default());
        claim_daily(&store, T, rules()).await.unwrap();

        let response = claim_daily(&store, T + 86_400_000, rules()).await.unwrap();

        assert!(response.allowed);
        assert_eq!(response.balance, 950);
        assert_eq!(response.streak, 5);
        assert_eq!(ledger(&store).await.len(), 2);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn missed_day_restarts_streak() {
        let path = unique_test_path("claim_missed");
        let store = LocalStore::new(path.clone(), StoreData::default());
        claim_daily(&store, T, rules()).await.unwrap();

        let late = claim_daily(&store, T + 10 * 86_400_000, rules()).await.unwrap();
        assert!(late.allowed);
        assert_eq!(late.streak, 1);
        assert_eq!(late.balance, 950);

        let next = claim_daily(&store, T + 11 * 86_400_000, rules()).await.unwrap();
        assert_eq!(next.streak, 2);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn streak_survives_claims_just_under_two_periods_apart() {
        let mut data = StoreData::default();
        data.entries.insert(LAST_CLAIM_KEY.to_string(), T.to_string());
        data.account = Some(Account { balance: 0, streak: 7 });

        let (response, _) = apply_claim(&data, T + 2 * 86_400_000 - 1, rules());
        assert_eq!(response.streak, 8);

        let (response, _) = apply_claim(&data, T + 2 * 86_400_000, rules());
        assert_eq!(response.streak, 1);
    }

    #[tokio::test]
    async fn corrupted_timestamp_allows_claim() {
        let path = unique_test_path("claim_corrupt");
        let mut data = StoreData::default();
        data.entries.insert(LAST_CLAIM_KEY.to_string(), "not-a-number".to_string());
        let store = LocalStore::new(path.clone(), data);

        let response = claim_daily(&store, T, rules()).await.unwrap();

        assert!(response.allowed);
        assert_eq!(last_claim(&store.snapshot().await), Some(T));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn failed_write_leaves_memory_untouched() {
        let mut dir = unique_test_path("claim_nodir");
        dir.set_extension("d");
        let store = LocalStore::new(dir.join("state.json"), StoreData::default());

        assert!(claim_daily(&store, T, rules()).await.is_err());

        let data = store.snapshot().await;
        assert_eq!(data, StoreData::default());
        assert_eq!(last_claim(&data), None);
    }

    #[test]
    fn account_view_reports_remaining_cooldown() {
        let mut data = StoreData::default();
        data.entries.insert(LAST_CLAIM_KEY.to_string(), T.to_string());
        data.account = Some(Account { balance: 10, streak: 2 });

        let view = account_view(&data, T + 60_000, rules());
        assert_eq!(view.account, Account { balance: 10, streak: 2 });
        assert_eq!(view.last_claim_ms, Some(T));
        assert_eq!(view.next_claim_in, Some(86_340));

        let view = account_view(&data, T + 86_400_000, rules());
        assert_eq!(view.next_claim_in, None);
    }

    #[test]
    fn custom_reward_is_applied() {
        let rules = ClaimRules {
            cooldown_secs: 60,
            reward: 25,
        };
        let (response, next) = apply_claim(&StoreData::default(), T, rules);
        assert_eq!(response.balance, 775);
        assert_eq!(response.next_claim_in, Some(60));
        assert_eq!(next.unwrap().ledger[0].delta, 25);
    }
}

use tracing::warn;

/// Key under which the last successful claim is stored, as epoch milliseconds.
pub const LAST_CLAIM_KEY: &str = "demo_last_claim";

pub const DEFAULT_COOLDOWN_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimDecision {
    Allowed,
    Cooldown { remaining_secs: u64 },
}

impl ClaimDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ClaimDecision::Allowed)
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        match self {
            ClaimDecision::Allowed => None,
            ClaimDecision::Cooldown { remaining_secs } => Some(*remaining_secs),
        }
    }
}

/// Decides whether a claim at `now_ms` is allowed given the last claim time.
///
/// A clock that moved backwards yields more than one full period remaining.
pub fn evaluate_claim(last_claim_ms: Option<i64>, now_ms: i64, cooldown_secs: u64) -> ClaimDecision {
    let Some(last) = last_claim_ms else {
        return ClaimDecision::Allowed;
    };

    let cooldown_ms = i128::from(cooldown_secs) * 1000;
    let elapsed_ms = i128::from(now_ms) - i128::from(last);
    if elapsed_ms >= cooldown_ms {
        return ClaimDecision::Allowed;
    }

    let remaining_ms = cooldown_ms - elapsed_ms;
    let remaining_secs = (remaining_ms + 999) / 1000;
    ClaimDecision::Cooldown {
        remaining_secs: u64::try_from(remaining_secs).unwrap_or(u64::MAX),
    }
}

/// Parses a stored claim timestamp. Anything unusable counts as "never claimed"
/// so a damaged value cannot lock the user out.
pub fn parse_last_claim(raw: Option<&str>) -> Option<i64> {
    let raw = raw?;
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 0 => Some(value),
        Ok(value) => {
            warn!("ignoring negative {LAST_CLAIM_KEY} value: {value}");
            None
        }
        Err(err) => {
            warn!("ignoring corrupted {LAST_CLAIM_KEY} value {raw:?}: {err}");
            None
        }
    }
}

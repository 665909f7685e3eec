use crate::models::{ClaimResponse, MeResponse, User};

pub const MAX_LOG_LINES: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub at: String,
    pub message: String,
}

/// Everything the widget page shows. Handlers never mutate a shared copy in
/// place: they build the next value from a snapshot and store it whole.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WidgetState {
    pub user: Option<User>,
    pub balance: Option<u64>,
    pub streak: Option<u64>,
    pub next_claim_in: Option<u64>,
    pub status: String,
    pub log: Vec<LogLine>,
}

impl WidgetState {
    pub fn logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn claim_blocked(&self) -> bool {
        self.next_claim_in.is_some_and(|secs| secs > 0)
    }

    pub fn with_user(self, user: User) -> Self {
        Self {
            user: Some(user),
            ..self
        }
    }

    pub fn with_balance(self, me: &MeResponse) -> Self {
        Self {
            balance: Some(me.balance),
            streak: Some(me.streak),
            next_claim_in: me.next_claim_in,
            ..self
        }
    }

    pub fn with_claim(self, claim: &ClaimResponse) -> Self {
        Self {
            balance: Some(claim.balance),
            streak: Some(claim.streak),
            next_claim_in: claim.next_claim_in,
            ..self
        }
    }

    pub fn with_status(self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..self
        }
    }

    /// Newest line first; the oldest lines fall off past [`MAX_LOG_LINES`].
    pub fn with_log(self, at: impl Into<String>, message: impl Into<String>) -> Self {
        let mut log = Vec::with_capacity((self.log.len() + 1).min(MAX_LOG_LINES));
        log.push(LogLine {
            at: at.into(),
            message: message.into(),
        });
        log.extend(self.log.into_iter().take(MAX_LOG_LINES - 1));
        Self { log, ..self }
    }
}

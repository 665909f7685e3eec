//! Economy backends the widget can talk to.
//!
//! [`MockEconomyClient`] serves the demo user from the local store.
//! [`HttpEconomyClient`] calls a remote API origin with the same JSON surface
//! this service exposes. Both probe `GET {API_BASE}/health`.

use crate::clock::Clock;
use crate::economy;
use crate::errors::ClientError;
use crate::models::{ClaimResponse, ClaimRules, HealthReport, Login, MeResponse, User};
use crate::storage::LocalStore;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait EconomyClient: Send + Sync {
    async fn login(&self) -> Result<Login, ClientError>;
    async fn get_balance(&self) -> Result<MeResponse, ClientError>;
    async fn claim_daily(&self) -> Result<ClaimResponse, ClientError>;
    async fn health(&self) -> Result<HealthReport, ClientError>;
}

/// Any JSON body counts as a response; the status code is not checked.
async fn fetch_health(http: &Client, api_base: Option<&str>) -> Result<HealthReport, ClientError> {
    let base = api_base.ok_or(ClientError::NotConfigured)?;
    let url = format!("{base}/health");
    debug!(%url, "probing health");
    let response = http.get(&url).send().await?;
    let body = response.json::<serde_json::Value>().await?;
    Ok(HealthReport { body })
}

pub fn me_response(user: &User, view: economy::AccountView) -> MeResponse {
    MeResponse {
        user_id: user.id,
        username: user.username.clone(),
        balance: view.account.balance,
        streak: view.account.streak,
        last_daily_claim: view.last_claim_ms,
        next_claim_in: view.next_claim_in,
    }
}

pub struct MockEconomyClient {
    store: LocalStore,
    rules: ClaimRules,
    clock: Arc<dyn Clock>,
    user: User,
    http: Client,
    api_base: Option<String>,
}

impl MockEconomyClient {
    pub fn new(
        store: LocalStore,
        rules: ClaimRules,
        clock: Arc<dyn Clock>,
        api_base: Option<String>,
    ) -> Self {
        Self {
            store,
            rules,
            clock,
            user: User::demo(),
            http: Client::new(),
            api_base,
        }
    }
}

#[async_trait]
impl EconomyClient for MockEconomyClient {
    async fn login(&self) -> Result<Login, ClientError> {
        Ok(Login {
            user: self.user.clone(),
            me: self.get_balance().await?,
        })
    }

    async fn get_balance(&self) -> Result<MeResponse, ClientError> {
        let view = economy::balance(&self.store, self.clock.now_millis(), self.rules).await;
        Ok(me_response(&self.user, view))
    }

    async fn claim_daily(&self) -> Result<ClaimResponse, ClientError> {
        Ok(economy::claim_daily(&self.store, self.clock.now_millis(), self.rules).await?)
    }

    async fn health(&self) -> Result<HealthReport, ClientError> {
        fetch_health(&self.http, self.api_base.as_deref()).await
    }
}

pub struct HttpEconomyClient {
    http: Client,
    api_base: String,
}

impl HttpEconomyClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl EconomyClient for HttpEconomyClient {
    async fn login(&self) -> Result<Login, ClientError> {
        let me = self.get_balance().await?;
        let user = User {
            id: me.user_id,
            username: me.username.clone(),
        };
        Ok(Login { user, me })
    }

    async fn get_balance(&self) -> Result<MeResponse, ClientError> {
        let response = self.http.get(self.url("/me")).send().await?;
        Self::decode(response).await
    }

    async fn claim_daily(&self) -> Result<ClaimResponse, ClientError> {
        let response = self.http.post(self.url("/economy/daily")).send().await?;
        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthReport, ClientError> {
        fetch_health(&self.http, Some(&self.api_base)).await
    }
}

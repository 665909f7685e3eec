use crate::client::me_response;
use crate::economy;
use crate::errors::{AppError, ClientError};
use crate::models::{ClaimResponse, HealthResponse, LedgerResponse, MeResponse, User};
use crate::state::AppState;
use crate::ui::render_widget;
use axum::{
    Json,
    extract::State,
    response::{Html, Redirect},
};
use tracing::warn;

pub const BUSY_MESSAGE: &str = "Another action is still in progress.";

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_widget(&state.widget().await))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_me(State(state): State<AppState>) -> Result<Json<MeResponse>, AppError> {
    let view = economy::balance(&state.store, state.clock.now_millis(), state.rules).await;
    Ok(Json(me_response(&User::demo(), view)))
}

pub async fn claim_daily(State(state): State<AppState>) -> Result<Json<ClaimResponse>, AppError> {
    let response = economy::claim_daily(&state.store, state.clock.now_millis(), state.rules).await?;
    Ok(Json(response))
}

pub async fn get_ledger(State(state): State<AppState>) -> Json<LedgerResponse> {
    Json(LedgerResponse {
        entries: economy::ledger(&state.store).await,
    })
}

pub async fn ui_login(State(state): State<AppState>) -> Redirect {
    let Some(_guard) = state.busy.try_begin() else {
        state.log(BUSY_MESSAGE).await;
        return Redirect::to("/");
    };

    match state.client.login().await {
        Ok(login) => {
            let name = login.user.username.clone().unwrap_or_else(|| "User".to_string());
            state.update_widget(|widget| widget.with_user(login.user)).await;
            state.log(format!("Login complete for {name}.")).await;
            show_balance(&state, &login.me).await;
        }
        Err(err) => {
            warn!("login failed: {err}");
            state.update_widget(|widget| widget.with_status("Login failed")).await;
            state.log(format!("Login failed: {err}")).await;
        }
    }

    Redirect::to("/")
}

pub async fn ui_refresh(State(state): State<AppState>) -> Redirect {
    let Some(_guard) = state.busy.try_begin() else {
        state.log(BUSY_MESSAGE).await;
        return Redirect::to("/");
    };

    refresh_balance(&state).await;
    Redirect::to("/")
}

pub async fn ui_daily(State(state): State<AppState>) -> Redirect {
    let Some(_guard) = state.busy.try_begin() else {
        state.log(BUSY_MESSAGE).await;
        return Redirect::to("/");
    };

    match state.client.claim_daily().await {
        Ok(claim) => {
            state.update_widget(|widget| widget.with_claim(&claim)).await;
            if claim.allowed {
                state.log(format!("Daily claimed. Balance is now {} dbx.", claim.balance)).await;
            } else {
                state.log("Daily already claimed. Cooldown active.").await;
            }
        }
        Err(err) => {
            warn!("daily claim failed: {err}");
            state.update_widget(|widget| widget.with_status("Claim failed")).await;
            state.log(format!("Daily claim failed: {err}")).await;
        }
    }

    Redirect::to("/")
}

pub async fn ui_health(State(state): State<AppState>) -> Redirect {
    let Some(_guard) = state.busy.try_begin() else {
        state.log(BUSY_MESSAGE).await;
        return Redirect::to("/");
    };

    let (status, message) = match state.client.health().await {
        Ok(report) => {
            let status = if report.is_ok() { "API online" } else { "API issue" };
            (status, format!("Health: {}", report.body))
        }
        Err(ClientError::NotConfigured) => (
            "Set API_BASE to test live health.",
            "API_BASE not set. Using demo-only mode.".to_string(),
        ),
        Err(err) => {
            warn!("health check failed: {err}");
            ("API unreachable", format!("Health check failed: {err}"))
        }
    };

    state.update_widget(|widget| widget.with_status(status)).await;
    state.log(message).await;
    Redirect::to("/")
}

async fn refresh_balance(state: &AppState) {
    match state.client.get_balance().await {
        Ok(me) => show_balance(state, &me).await,
        Err(err) => {
            warn!("balance refresh failed: {err}");
            state.update_widget(|widget| widget.with_status("Balance unavailable")).await;
            state.log(format!("Balance refresh failed: {err}")).await;
        }
    }
}

async fn show_balance(state: &AppState, me: &MeResponse) {
    state.update_widget(|widget| widget.with_balance(me)).await;
    state.log(format!("Balance refreshed: {} dbx, streak {}.", me.balance, me.streak)).await;
}

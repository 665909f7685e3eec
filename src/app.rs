use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/ui/login", post(handlers::ui_login))
        .route("/ui/refresh", post(handlers::ui_refresh))
        .route("/ui/daily", post(handlers::ui_daily))
        .route("/ui/health", post(handlers::ui_health))
        .route("/health", get(handlers::health))
        .route("/me", get(handlers::get_me))
        .route("/economy/balance", get(handlers::get_me))
        .route("/economy/daily", post(handlers::claim_daily))
        .route("/economy/ledger", get(handlers::get_ledger))
        .with_state(state)
}

#[cfg(test)]
pub(crate) async fn serve_for_test(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

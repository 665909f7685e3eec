pub mod app;
pub mod client;
pub mod clock;
pub mod config;
pub mod cooldown;
pub mod economy;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;
pub mod widget;

pub use app::router;
pub use config::Settings;
pub use cooldown::{ClaimDecision, evaluate_claim};
pub use state::AppState;
pub use storage::LocalStore;

use crate::client::{EconomyClient, HttpEconomyClient, MockEconomyClient};
use crate::clock::{Clock, SystemClock};
use crate::config::{BackendMode, Settings};
use crate::models::ClaimRules;
use crate::storage::LocalStore;
use crate::widget::WidgetState;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: LocalStore,
    pub rules: ClaimRules,
    pub clock: Arc<dyn Clock>,
    pub client: Arc<dyn EconomyClient>,
    pub widget: Arc<Mutex<WidgetState>>,
    pub busy: Arc<InFlight>,
}

impl AppState {
    pub fn new(settings: &Settings, store: LocalStore) -> Self {
        Self::with_clock(settings, store, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: &Settings, store: LocalStore, clock: Arc<dyn Clock>) -> Self {
        let client: Arc<dyn EconomyClient> = match (settings.backend, settings.api_base.as_deref()) {
            (BackendMode::Http, Some(base)) => Arc::new(HttpEconomyClient::new(base)),
            _ => Arc::new(MockEconomyClient::new(
                store.clone(),
                settings.rules,
                clock.clone(),
                settings.api_base.clone(),
            )),
        };
        Self {
            store,
            rules: settings.rules,
            clock,
            client,
            widget: Arc::new(Mutex::new(WidgetState::default())),
            busy: Arc::new(InFlight::default()),
        }
    }

    pub async fn widget(&self) -> WidgetState {
        self.widget.lock().await.clone()
    }

    /// Applies one update to the current widget value.
    pub async fn update_widget(&self, update: impl FnOnce(WidgetState) -> WidgetState) {
        let mut guard = self.widget.lock().await;
        let next = update(guard.clone());
        *guard = next;
    }

    pub async fn log(&self, message: impl Into<String>) {
        let at = self.clock.time_label();
        let message = message.into();
        self.update_widget(|widget| widget.with_log(at, message)).await;
    }
}

/// Rejects a second widget action while one is still running.
#[derive(Debug, Default)]
pub struct InFlight {
    active: AtomicBool,
}

impl InFlight {
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { flag: &self.active })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

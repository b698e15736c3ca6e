//! Top-level session orchestration.
//!
//! The [`SessionController`] sequences location resolution, data fetching,
//! history recording and alerting, and is the single API surface a
//! presentation layer talks to.
//!
//! # Supersession
//!
//! Every action issues a new request token and enters `Loading`
//! immediately. When a request completes, its result is committed only if
//! its token is still the latest; otherwise it is discarded, so a slow older
//! request can never overwrite the result of a newer one. Several actions
//! may be awaited concurrently on the same controller.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use airsight_core::mock::{MemoryStore, MockAirQuality, MockGeocoder, MockGeolocation, RecordingSink};
//! use airsight_core::{EnvironmentalDataFetcher, LocationResolver, SessionController, SessionState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let resolver = LocationResolver::new(
//!     Arc::new(MockGeolocation::denied()),
//!     Arc::new(MockGeocoder::new().with_place("berlin", "Berlin", "Germany", 52.5, 13.4)),
//! );
//! let fetcher = EnvironmentalDataFetcher::new(Arc::new(MockAirQuality::with_index(35.0)), None);
//! let session = SessionController::new(
//!     resolver,
//!     fetcher,
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(RecordingSink::new()),
//! );
//!
//! let state = session.search("Berlin").await;
//! assert_eq!(state.location(), Some("Berlin, Germany"));
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use airsight_types::{HistoryEntry, ResolvedLocation, ThemePreference};

use crate::error::Result;
use crate::fetcher::{EnvironmentalData, EnvironmentalDataFetcher};
use crate::history::HistoryStore;
use crate::preferences::PreferenceStore;
use crate::resolver::LocationResolver;
use crate::state::{Action, Effect, RequestToken, SessionMachine, SessionState};
use crate::thresholds::Thresholds;
use crate::traits::{AlertSink, HapticKind, KeyValueStore};

/// Title of the high-index notification.
pub const ALERT_TITLE: &str = "High AQI Alert!";

/// Body of the high-index notification.
pub fn alert_body(index: f64) -> String {
    format!("The current Air Quality Index is {index}. Consider staying indoors.")
}

/// Orchestrates a single viewing session.
pub struct SessionController {
    resolver: LocationResolver,
    fetcher: EnvironmentalDataFetcher,
    history_store: HistoryStore,
    preferences: PreferenceStore,
    sink: Arc<dyn AlertSink>,
    thresholds: Thresholds,
    machine: Mutex<SessionMachine>,
    state_tx: watch::Sender<SessionState>,
    /// Cached history view; held across record() so two records never interleave.
    history: tokio::sync::Mutex<Vec<HistoryEntry>>,
    theme: tokio::sync::Mutex<ThemePreference>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("resolver", &self.resolver)
            .field("fetcher", &self.fetcher)
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Create a controller in the `Idle` state.
    ///
    /// `store` backs both the history and the theme preference.
    pub fn new(
        resolver: LocationResolver,
        fetcher: EnvironmentalDataFetcher,
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);
        Self {
            resolver,
            fetcher,
            history_store: HistoryStore::new(store.clone()),
            preferences: PreferenceStore::new(store),
            sink,
            thresholds: Thresholds::default(),
            machine: Mutex::new(SessionMachine::new()),
            state_tx,
            history: tokio::sync::Mutex::new(Vec::new()),
            theme: tokio::sync::Mutex::new(ThemePreference::default()),
        }
    }

    /// Use custom thresholds for alerting.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Use a custom history store (e.g. a different cap).
    #[must_use]
    pub fn with_history_store(mut self, history_store: HistoryStore) -> Self {
        self.history_store = history_store;
        self
    }

    /// Thresholds used for classification and alerting.
    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    // --- Observation ---

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Cached history view, newest first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().await.clone()
    }

    /// Current theme preference.
    pub async fn theme(&self) -> ThemePreference {
        *self.theme.lock().await
    }

    // --- Lifecycle ---

    /// Load persisted history and theme into the cached views.
    pub async fn load_persisted(&self) {
        let entries = self.history_store.load().await;
        let theme = self.preferences.load().await;
        info!(history = entries.len(), %theme, "Loaded persisted session data");
        *self.history.lock().await = entries;
        *self.theme.lock().await = theme;
    }

    /// App launch: load persisted data, then look up the device position.
    pub async fn start(&self) -> SessionState {
        self.load_persisted().await;
        self.dispatch(Action::Start).await
    }

    // --- Actions ---

    /// Run the flow for `action`.
    ///
    /// Returns the state committed by this request, or the current state if
    /// this request was superseded before it completed.
    pub async fn dispatch(&self, action: Action) -> SessionState {
        let token = self.begin();
        debug!(token, ?action, "Request started");

        match self.execute(token, &action).await {
            Some(outcome) => self.complete(token, outcome).await,
            None => self.state(),
        }
    }

    /// Look up the device position.
    pub async fn use_current_location(&self) -> SessionState {
        self.dispatch(Action::UseCurrentLocation).await
    }

    /// Search for a place by name.
    pub async fn search(&self, query: &str) -> SessionState {
        self.dispatch(Action::Search(query.to_string())).await
    }

    /// Re-open a remembered location.
    pub async fn select_history(&self, entry: HistoryEntry) -> SessionState {
        self.dispatch(Action::SelectHistory(entry)).await
    }

    /// Flip the theme, persist it and fire a light haptic.
    ///
    /// Does not touch the session state.
    pub async fn toggle_theme(&self) -> ThemePreference {
        let theme = {
            let mut current = self.theme.lock().await;
            *current = current.toggled();
            self.preferences.set(*current).await;
            *current
        };
        if let Err(e) = self.sink.haptic(HapticKind::Light).await {
            warn!(error = %e, "Failed to deliver haptic");
        }
        info!(%theme, "Theme toggled");
        theme
    }

    /// Set the theme explicitly and persist it.
    pub async fn set_theme(&self, theme: ThemePreference) {
        let mut current = self.theme.lock().await;
        *current = theme;
        self.preferences.set(theme).await;
    }

    // --- Internals ---

    fn machine(&self) -> MutexGuard<'_, SessionMachine> {
        self.machine.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self) -> RequestToken {
        let mut machine = self.machine();
        let token = machine.begin(&self.thresholds);
        self.state_tx.send_replace(machine.state().clone());
        token
    }

    fn is_latest(&self, token: RequestToken) -> bool {
        self.machine().latest() == token
    }

    /// Resolve then fetch. `None` when the request was superseded between
    /// the two steps.
    async fn execute(
        &self,
        token: RequestToken,
        action: &Action,
    ) -> Option<Result<(ResolvedLocation, EnvironmentalData)>> {
        let resolved = match action {
            Action::Start | Action::UseCurrentLocation => self.resolver.resolve_current().await,
            Action::Search(query) => self.resolver.resolve_query(query).await,
            Action::SelectHistory(entry) => Ok(entry.clone().into()),
        };
        let location = match resolved {
            Ok(location) => location,
            Err(e) => return Some(Err(e)),
        };

        if !self.is_latest(token) {
            debug!(token, "Request superseded before fetch");
            return None;
        }

        Some(
            self.fetcher
                .fetch(location.coordinate)
                .await
                .map(|data| (location, data)),
        )
    }

    async fn complete(
        &self,
        token: RequestToken,
        outcome: Result<(ResolvedLocation, EnvironmentalData)>,
    ) -> SessionState {
        // Held until history is written: history order matches commit order
        let mut history = self.history.lock().await;

        let committed = {
            let mut machine = self.machine();
            match machine.complete(token, outcome, &self.thresholds) {
                Some(effects) => {
                    let state = machine.state().clone();
                    self.state_tx.send_replace(state.clone());
                    Some((state, effects))
                }
                None => None,
            }
        };

        let Some((state, effects)) = committed else {
            drop(history);
            debug!(token, "Discarding superseded result");
            return self.state();
        };

        match &state {
            SessionState::Failed { reason, message } => {
                info!(token, %reason, message, "Request failed");
            }
            SessionState::Ready { location, .. } => info!(token, location, "Request ready"),
            _ => {}
        }

        let mut signals = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::RecordHistory(entry) => {
                    let updated = self.history_store.record(entry, &history).await;
                    *history = updated;
                }
                other => signals.push(other),
            }
        }
        drop(history);

        for effect in signals {
            self.perform(effect).await;
        }
        state
    }

    async fn perform(&self, effect: Effect) {
        match effect {
            Effect::Alert { index } => {
                if let Err(e) = self.sink.notify(ALERT_TITLE, &alert_body(index)).await {
                    warn!(error = %e, "Failed to deliver alert notification");
                }
                if let Err(e) = self.sink.haptic(HapticKind::Warning).await {
                    warn!(error = %e, "Failed to deliver haptic");
                }
            }
            Effect::Haptic(kind) => {
                if let Err(e) = self.sink.haptic(kind).await {
                    warn!(error = %e, "Failed to deliver haptic");
                }
            }
            // Written in complete() under the history lock
            Effect::RecordHistory(_) => {}
        }
    }
}

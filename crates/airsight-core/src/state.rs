//! Session state machine.
//!
//! Transitions are pure: [`transition`] maps the latest issued request token
//! and an [`Event`] to the next state plus the
//! [`Effect`]s the controller must perform. The controller owns the only
//! [`SessionMachine`] and performs effects after committing.
//!
//! ```text
//!   Idle ──Begin──▶ Loading ──Completed(Ok)──▶ Ready
//!                    │   ▲                       │
//!       Completed(Err)   └──────── Begin ────────┤
//!                    ▼                           │
//!                  Failed ─────── Begin ─────────┘
//! ```
//!
//! A `Completed` event whose token is not the latest issued is stale and is
//! discarded without changing state or producing effects.

use serde::Serialize;

use airsight_types::{
    AirQualityReading, Coordinate, ForecastPoint, HistoryEntry, ResolvedLocation, WeatherReading,
};

use crate::error::{ErrorKind, Result};
use crate::fetcher::EnvironmentalData;
use crate::thresholds::Thresholds;
use crate::traits::HapticKind;

/// Monotonic identifier of a triggered request.
pub type RequestToken = u64;

/// User or lifecycle action that starts a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// App launch: use the device position.
    Start,
    /// "Use current location".
    UseCurrentLocation,
    /// Submit a search query.
    Search(String),
    /// Re-open a remembered location.
    SelectHistory(HistoryEntry),
}

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Latest request succeeded.
    Ready {
        /// Display name of the location.
        location: String,
        /// Position the data was fetched for.
        coordinate: Coordinate,
        /// Current pollutants (index always present).
        air_quality: AirQualityReading,
        /// Hourly forecast, at most 24 points.
        forecast: Vec<ForecastPoint>,
        /// Current weather, if available.
        weather: Option<WeatherReading>,
    },
    /// Latest request failed.
    Failed {
        /// Error classification.
        reason: ErrorKind,
        /// Human-readable message.
        message: String,
    },
}

impl SessionState {
    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    /// Failure classification, if failed.
    pub fn failure(&self) -> Option<ErrorKind> {
        match self {
            SessionState::Failed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Display name of the ready location, if ready.
    pub fn location(&self) -> Option<&str> {
        match self {
            SessionState::Ready { location, .. } => Some(location),
            _ => None,
        }
    }
}

/// Input to the state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// A new request with this token started.
    Begin(RequestToken),
    /// The request with this token finished.
    Completed {
        /// Token captured when the request started.
        token: RequestToken,
        /// Resolved location and fetched data, or the failure.
        outcome: Result<(ResolvedLocation, EnvironmentalData)>,
    },
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Warn the user about a high index (notification and warning haptic).
    Alert {
        /// The index that triggered the alert.
        index: f64,
    },
    /// Plain haptic feedback.
    Haptic(HapticKind),
    /// Record the location at the front of the history.
    RecordHistory(HistoryEntry),
}

/// Next state and effects, or `None` when the event was stale.
pub fn transition(
    latest: RequestToken,
    event: Event,
    thresholds: &Thresholds,
) -> Option<(SessionState, Vec<Effect>)> {
    match event {
        Event::Begin(token) if token > latest => Some((SessionState::Loading, Vec::new())),
        Event::Begin(_) => None,
        Event::Completed { token, .. } if token != latest => None,
        Event::Completed {
            outcome: Err(e), ..
        } => Some((
            SessionState::Failed {
                reason: e.kind(),
                message: e.to_string(),
            },
            Vec::new(),
        )),
        Event::Completed {
            outcome: Ok((location, data)),
            ..
        } => {
            let mut effects = Vec::with_capacity(2);
            match data.air_quality.index {
                Some(index) if thresholds.should_alert(index) => {
                    effects.push(Effect::Alert { index });
                }
                _ => effects.push(Effect::Haptic(HapticKind::Success)),
            }
            effects.push(Effect::RecordHistory(HistoryEntry::new(
                location.name.clone(),
                location.coordinate,
            )));

            let state = SessionState::Ready {
                location: location.name,
                coordinate: location.coordinate,
                air_quality: data.air_quality,
                forecast: data.forecast,
                weather: data.weather,
            };
            Some((state, effects))
        }
    }
}

/// Current state plus the latest issued request token.
#[derive(Debug, Default)]
pub struct SessionMachine {
    state: SessionState,
    latest: RequestToken,
}

impl SessionMachine {
    /// Machine in the `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Latest issued token.
    pub fn latest(&self) -> RequestToken {
        self.latest
    }

    /// Issue a new token and enter `Loading`. Any earlier in-flight request
    /// becomes stale.
    pub fn begin(&mut self, thresholds: &Thresholds) -> RequestToken {
        let token = self.latest + 1;
        if let Some((state, _)) = transition(self.latest, Event::Begin(token), thresholds) {
            self.state = state;
            self.latest = token;
        }
        token
    }

    /// Apply a completion. Returns the effects to perform, or `None` if the
    /// token was superseded.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<(ResolvedLocation, EnvironmentalData)>,
        thresholds: &Thresholds,
    ) -> Option<Vec<Effect>> {
        let (state, effects) =
            transition(self.latest, Event::Completed { token, outcome }, thresholds)?;
        self.state = state;
        Some(effects)
    }
}

//! Reservation state machine
//!
//! Drives the asynchronous create-reservation call behind the booking
//! screens:
//!
//! ```text
//! Idle ──▶ Loading ──▶ Success(reservation)
//!   ▲         │   └──▶ Error(message)
//!   └─cancel──┘
//! ```
//!
//! `Success` and `Error` accept a new `Loading` transition (retry). Every
//! transition bumps a revision so observers can react once per value.

use app_core::money::Money;
use app_core::reservation::{Reservation, ReservationRepository, ReservationRequest};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Message shown when a reservation is created
pub const RESERVATION_CREATED_MESSAGE: &str = "Reservation created successfully!";

/// UI-facing reservation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "value")]
pub enum ReservationUiState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Call in flight
    Loading,
    /// Backend created the reservation
    Success(Reservation),
    /// Backend or request failed; stays until retry or reset
    Error(String),
}

impl ReservationUiState {
    /// Whether a call is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, ReservationUiState::Loading)
    }
}

/// State plus the revision it was produced at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationSnapshot {
    /// Current state
    pub state: ReservationUiState,
    /// Increments on every transition
    pub revision: u64,
}

#[derive(Debug, Default)]
struct Inner {
    state: ReservationUiState,
    revision: u64,
    /// Identifies the call whose result may still be applied
    generation: u64,
}

impl Inner {
    fn transition(&mut self, next: ReservationUiState) {
        self.state = next;
        self.revision += 1;
    }
}

/// State holder for one booking screen (or one booking flow)
pub struct ReservationStateHolder {
    repository: Arc<dyn ReservationRepository>,
    inner: RwLock<Inner>,
}

impl ReservationStateHolder {
    /// Create an idle holder backed by a repository
    pub fn new(repository: Arc<dyn ReservationRepository>) -> Self {
        Self {
            repository,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Current state
    pub fn state(&self) -> ReservationUiState {
        self.inner.read().state.clone()
    }

    /// Current state with its revision
    pub fn snapshot(&self) -> ReservationSnapshot {
        let inner = self.inner.read();
        ReservationSnapshot {
            state: inner.state.clone(),
            revision: inner.revision,
        }
    }

    /// Whether a call is in flight
    pub fn is_loading(&self) -> bool {
        self.inner.read().state.is_loading()
    }

    /// Build a request from raw booking values and submit it
    ///
    /// An invalid date range goes straight to `Error` without calling the
    /// repository.
    pub async fn create(
        &self,
        car_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: Money,
    ) -> ReservationUiState {
        match ReservationRequest::new(car_id, start_date, end_date, total_price) {
            Ok(request) => self.create_reservation(request).await,
            Err(e) => {
                let mut inner = self.inner.write();
                inner.generation += 1;
                inner.transition(ReservationUiState::Error(e.to_string()));
                inner.state.clone()
            }
        }
    }

    /// Submit a reservation request
    ///
    /// Moves to `Loading`, awaits the repository, then moves to `Success` or
    /// `Error`. Preventing a second call while `Loading` is up to the caller;
    /// if one is issued anyway, only the newest call's result is applied.
    /// A result arriving after [`cancel`](Self::cancel) is discarded.
    pub async fn create_reservation(&self, request: ReservationRequest) -> ReservationUiState {
        let generation = {
            let mut inner = self.inner.write();
            inner.generation += 1;
            inner.transition(ReservationUiState::Loading);
            inner.generation
        };

        tracing::info!(
            car_id = request.car_id(),
            total = %request.total_price(),
            "Creating reservation"
        );
        let result = self.repository.create_reservation(request).await;

        let mut inner = self.inner.write();
        if inner.generation != generation {
            tracing::warn!("Discarding reservation result from a superseded call");
            return inner.state.clone();
        }

        let next = match result {
            Ok(reservation) => {
                tracing::info!(reservation_id = reservation.id, "Reservation created");
                ReservationUiState::Success(reservation)
            }
            Err(e) => {
                tracing::warn!("Reservation failed: {}", e);
                ReservationUiState::Error(e.to_string())
            }
        };
        inner.transition(next);
        inner.state.clone()
    }

    /// Cancel the in-flight call
    ///
    /// Returns to `Idle`; the pending result is dropped when it arrives.
    /// Returns false if nothing was in flight.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.write();
        if !inner.state.is_loading() {
            return false;
        }
        inner.generation += 1;
        inner.transition(ReservationUiState::Idle);
        tracing::info!("Reservation call cancelled");
        true
    }

    /// Return to `Idle`, dropping any in-flight result
    pub fn reset(&self) {
        let mut inner = self.inner.write();
        inner.generation += 1;
        inner.transition(ReservationUiState::Idle);
    }
}

impl std::fmt::Debug for ReservationStateHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationStateHolder")
            .field("state", &self.inner.read().state)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use app_core::reservation::{ReservationError, Result};
    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::{Mutex, Notify};

    mockall::mock! {
        pub Repository {}

        #[async_trait]
        impl ReservationRepository for Repository {
            async fn create_reservation(&self, request: ReservationRequest) -> Result<Reservation>;
        }
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn reservation_for(request: &ReservationRequest, id: i64) -> Reservation {
        Reservation {
            id,
            car_id: request.car_id().to_string(),
            start_date: request.start_date(),
            end_date: request.end_date(),
            total_price: request.total_price(),
            created_at: Utc::now(),
        }
    }

    pub fn request() -> ReservationRequest {
        ReservationRequest::new("7", date(2024, 1, 1), date(2024, 1, 4), Money::from_units(150))
            .unwrap()
    }

    /// Repository that holds every call until released
    #[derive(Default)]
    pub struct GatedRepository {
        pub release: Notify,
        pub outcomes: Mutex<Vec<Result<i64>>>,
    }

    #[async_trait]
    impl ReservationRepository for GatedRepository {
        async fn create_reservation(&self, request: ReservationRequest) -> Result<Reservation> {
            self.release.notified().await;
            let outcome = self
                .outcomes
                .lock()
                .await
                .pop()
                .unwrap_or(Err(ReservationError::Network("no outcome".to_string())));
            outcome.map(|id| reservation_for(&request, id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use app_core::reservation::ReservationError;

    #[tokio::test]
    async fn test_idle_to_success() {
        let mut repo = MockRepository::new();
        repo.expect_create_reservation()
            .times(1)
            .returning(|request| Ok(reservation_for(&request, 11)));
        let holder = ReservationStateHolder::new(Arc::new(repo));
        assert_eq!(holder.state(), ReservationUiState::Idle);

        let state = holder.create_reservation(request()).await;
        match state {
            ReservationUiState::Success(reservation) => {
                assert_eq!(reservation.id, 11);
                assert_eq!(reservation.total_price, Money::from_units(150));
            }
            other => panic!("unexpected state {other:?}"),
        }
        // Idle -> Loading -> Success
        assert_eq!(holder.snapshot().revision, 2);
    }

    #[tokio::test]
    async fn test_error_persists_until_retry() {
        let mut repo = MockRepository::new();
        let mut calls = 0;
        repo.expect_create_reservation().times(2).returning(move |request| {
            calls += 1;
            if calls == 1 {
                Err(ReservationError::Rejected("Car already booked".to_string()))
            } else {
                Ok(reservation_for(&request, 3))
            }
        });
        let holder = ReservationStateHolder::new(Arc::new(repo));

        let state = holder.create_reservation(request()).await;
        assert_eq!(state, ReservationUiState::Error("Car already booked".to_string()));
        assert_eq!(holder.state(), state);

        let retried = holder.create_reservation(request()).await;
        assert!(matches!(retried, ReservationUiState::Success(r) if r.id == 3));
    }

    #[tokio::test]
    async fn test_invalid_dates_skip_repository() {
        let mut repo = MockRepository::new();
        repo.expect_create_reservation().never();
        let holder = ReservationStateHolder::new(Arc::new(repo));

        let day = date(2024, 3, 3);
        let state = holder.create("1", day, day, Money::ZERO).await;
        assert_eq!(
            state,
            ReservationUiState::Error(ReservationError::InvalidDates.to_string())
        );
    }

    #[tokio::test]
    async fn test_loading_while_in_flight() {
        let repo = Arc::new(GatedRepository::default());
        repo.outcomes.lock().await.push(Ok(5));
        let holder = Arc::new(ReservationStateHolder::new(repo.clone()));

        let task = tokio::spawn({
            let holder = Arc::clone(&holder);
            async move { holder.create_reservation(request()).await }
        });
        while !holder.is_loading() {
            tokio::task::yield_now().await;
        }
        assert_eq!(holder.state(), ReservationUiState::Loading);

        repo.release.notify_one();
        let state = task.await.unwrap();
        assert!(matches!(state, ReservationUiState::Success(r) if r.id == 5));
    }

    #[tokio::test]
    async fn test_cancel_discards_late_result() {
        let repo = Arc::new(GatedRepository::default());
        repo.outcomes.lock().await.push(Ok(9));
        let holder = Arc::new(ReservationStateHolder::new(repo.clone()));

        let task = tokio::spawn({
            let holder = Arc::clone(&holder);
            async move { holder.create_reservation(request()).await }
        });
        while !holder.is_loading() {
            tokio::task::yield_now().await;
        }

        assert!(holder.cancel());
        assert_eq!(holder.state(), ReservationUiState::Idle);

        repo.release.notify_one();
        assert_eq!(task.await.unwrap(), ReservationUiState::Idle);
        assert_eq!(holder.state(), ReservationUiState::Idle);
    }

    #[tokio::test]
    async fn test_cancel_when_not_loading() {
        let holder = ReservationStateHolder::new(Arc::new(GatedRepository::default()));
        assert!(!holder.cancel());
        assert_eq!(holder.snapshot().revision, 0);
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_string(&ReservationUiState::Error("boom".to_string())).unwrap();
        assert_eq!(json, r#"{"state":"Error","value":"boom"}"#);
    }
}

//! Reservations
//!
//! This module defines the reservation request sent to the backend and the
//! repository contract that fulfils it. Persistence lives behind
//! [`ReservationRepository`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Car;
use crate::money::Money;
use crate::pricing::compute_booking;

/// Reservation errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReservationError {
    /// Drop-off is not after pickup
    #[error("Drop-off date must be after pickup date")]
    InvalidDates,

    /// Backend rejected the reservation
    #[error("{0}")]
    Rejected(String),

    /// Backend could not be reached
    #[error("Network error: {0}")]
    Network(String),
}

/// Result type for reservation operations
pub type Result<T> = std::result::Result<T, ReservationError>;

/// Request to create a reservation
///
/// Construction guarantees `end > start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    car_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_price: Money,
}

impl ReservationRequest {
    /// Create a request with an explicit total
    pub fn new(
        car_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: Money,
    ) -> Result<Self> {
        if end_date <= start_date {
            return Err(ReservationError::InvalidDates);
        }
        Ok(Self {
            car_id: car_id.into(),
            start_date,
            end_date,
            total_price,
        })
    }

    /// Create a request whose total is derived from the car's daily rate
    pub fn priced(car: &Car, start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        let quote = compute_booking(car.daily_rate, start_date, end_date);
        Self::new(car.id.clone(), start_date, end_date, quote.total)
    }

    /// Car being reserved
    pub fn car_id(&self) -> &str {
        &self.car_id
    }

    /// Pickup date
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Drop-off date
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Total price
    pub fn total_price(&self) -> Money {
        self.total_price
    }
}

/// A confirmed booking record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Backend-assigned ID
    pub id: i64,
    /// Reserved car
    pub car_id: String,
    /// Pickup date
    pub start_date: NaiveDate,
    /// Drop-off date
    pub end_date: NaiveDate,
    /// Total price
    pub total_price: Money,
    /// When the backend created it
    pub created_at: DateTime<Utc>,
}

/// Reservation backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Create a reservation
    async fn create_reservation(&self, request: ReservationRequest) -> Result<Reservation>;
}

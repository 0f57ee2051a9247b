//! Rental pricing
//!
//! Duration and total are derived from the pickup/drop-off dates every time
//! they are needed. Nothing here is cached.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::catalog::Car;
use crate::money::Money;

/// Date format used on the booking summary, e.g. `Jan 01, 2024`
pub const SUMMARY_DATE_FORMAT: &str = "%b %d, %Y";

/// Rental duration and price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuote {
    /// Whole days between pickup and drop-off
    pub days: i64,
    /// `daily_rate * days`
    pub total: Money,
}

/// Compute rental days and total price
///
/// Days are the truncated difference between the two dates. A drop-off
/// before pickup yields zero days rather than a negative total.
///
/// # Example
///
/// ```
/// use app_core::money::Money;
/// use app_core::pricing::compute_booking;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
/// let quote = compute_booking(Money::from_units(50), start, end);
/// assert_eq!(quote.days, 3);
/// assert_eq!(quote.total, Money::from_units(150));
/// ```
pub fn compute_booking(daily_rate: Money, start: NaiveDate, end: NaiveDate) -> BookingQuote {
    let days = end.signed_duration_since(start).num_days().max(0);
    BookingQuote {
        days,
        total: daily_rate * days,
    }
}

/// Default pickup/drop-off window starting on `today`
pub fn default_window(today: NaiveDate, rental_days: u32) -> (NaiveDate, NaiveDate) {
    let end = today
        .checked_add_days(Days::new(u64::from(rental_days)))
        .unwrap_or(NaiveDate::MAX);
    (today, end)
}

/// Format a date for the booking summary
pub fn format_date(date: NaiveDate) -> String {
    date.format(SUMMARY_DATE_FORMAT).to_string()
}

/// Text shown on the booking summary card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    /// "Brand Model"
    pub car_name: String,
    /// "Year: 2020 | Automatic | Rating: 4"
    pub details: String,
    /// Formatted pickup date
    pub pickup_date: String,
    /// Formatted drop-off date
    pub dropoff_date: String,
    /// "3 days"
    pub duration: String,
    /// Daily rate with currency
    pub daily_rate: String,
    /// Total with currency
    pub total: String,
}

impl BookingSummary {
    /// Build the summary for a car and date range
    pub fn new(car: &Car, pickup: NaiveDate, dropoff: NaiveDate, currency: &str) -> Self {
        let quote = compute_booking(car.daily_rate, pickup, dropoff);
        Self {
            car_name: car.display_name(),
            details: format!(
                "Year: {} | {} | Rating: {}",
                car.year, car.transmission, car.rating
            ),
            pickup_date: format_date(pickup),
            dropoff_date: format_date(dropoff),
            duration: format!("{} days", quote.days),
            daily_rate: car.daily_rate.display_with(currency),
            total: quote.total.display_with(currency),
        }
    }
}

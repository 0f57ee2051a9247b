//! Car catalog
//!
//! This module defines the car model, the catalog filter and the catalog
//! provider contract, plus the filter screen's selection state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::money::Money;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No car with this ID
    #[error("Car not found: {0}")]
    NotFound(String),

    /// Provider could not be reached
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Body type of a car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarType {
    /// Sport utility vehicle
    #[serde(rename = "SUV")]
    Suv,
    /// Sedan
    Sedan,
    /// Compact
    Compact,
    /// Luxury
    Luxury,
    /// Electric
    Electric,
}

impl CarType {
    /// All types in chip order
    pub fn all() -> [CarType; 5] {
        [
            CarType::Suv,
            CarType::Sedan,
            CarType::Compact,
            CarType::Luxury,
            CarType::Electric,
        ]
    }

    /// Chip label
    pub fn label(&self) -> &'static str {
        match self {
            CarType::Suv => "SUV",
            CarType::Sedan => "Sedan",
            CarType::Compact => "Compact",
            CarType::Luxury => "Luxury",
            CarType::Electric => "Electric",
        }
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Brands offered by the filter screen
pub const BRANDS: [&str; 8] = [
    "Mercedes",
    "BMW",
    "Audi",
    "Volkswagen",
    "Tesla",
    "Toyota",
    "Nissan",
    "Peugeot",
];

/// A rentable car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Catalog ID
    pub id: String,
    /// Manufacturer
    pub brand: String,
    /// Model name
    pub model: String,
    /// Model year
    pub year: u16,
    /// Price per rental day
    pub daily_rate: Money,
    /// "Automatic" / "Manual"
    pub transmission: String,
    /// Average review score out of 5
    pub rating: f32,
    /// Body type
    pub car_type: CarType,
}

impl Car {
    /// "Brand Model"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// Constraints applied to the catalog listing
///
/// `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarFilter {
    /// Body type
    pub car_type: Option<CarType>,
    /// Brand name
    pub brand: Option<String>,
    /// Highest daily rate, in whole units
    pub max_price: Option<i64>,
    /// Lowest rating
    pub min_rating: Option<f32>,
}

impl CarFilter {
    /// Whether a car satisfies every constraint
    pub fn matches(&self, car: &Car) -> bool {
        self.car_type.map_or(true, |t| car.car_type == t)
            && self
                .brand
                .as_deref()
                .map_or(true, |b| car.brand.eq_ignore_ascii_case(b))
            && self
                .max_price
                .map_or(true, |max| car.daily_rate <= Money::from_units(max))
            && self.min_rating.map_or(true, |min| car.rating >= min)
    }
}

/// Car catalog provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarCatalog: Send + Sync {
    /// List cars matching a filter
    async fn list_cars(&self, filter: &CarFilter) -> Result<Vec<Car>>;

    /// Fetch a single car
    async fn get_car(&self, id: &str) -> Result<Car>;
}

/// Catalog backed by a fixed list of cars
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    cars: Vec<Car>,
}

impl InMemoryCatalog {
    /// Create a catalog over the given cars
    pub fn new(cars: Vec<Car>) -> Self {
        Self { cars }
    }
}

#[async_trait]
impl CarCatalog for InMemoryCatalog {
    async fn list_cars(&self, filter: &CarFilter) -> Result<Vec<Car>> {
        let cars: Vec<Car> = self
            .cars
            .iter()
            .filter(|car| filter.matches(car))
            .cloned()
            .collect();
        tracing::debug!("Catalog filter matched {} of {} cars", cars.len(), self.cars.len());
        Ok(cars)
    }

    async fn get_car(&self, id: &str) -> Result<Car> {
        self.cars
            .iter()
            .find(|car| car.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

// =============================================================================
// Filter Screen Selection
// =============================================================================

/// Review options, best first: (label, minimum rating)
pub const REVIEW_OPTIONS: [(&str, f32); 5] = [
    ("5 Star", 4.5),
    ("4.0 - 4.5", 4.0),
    ("3.0 - 3.5", 3.5),
    ("2.5 - 3.0", 3.0),
    ("2.0 - 2.5", 2.5),
];

/// Lower end of the price slider
pub const MIN_FILTER_PRICE: i64 = 0;

/// Default slider position
pub const DEFAULT_PRICE_FRACTION: f32 = 0.3;

/// Filter screen selection state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    /// Selected type, `None` for "All"
    pub car_type: Option<CarType>,
    /// Selected brand, `None` for "None"
    pub brand: Option<String>,
    /// Slider position in `[0, 1]`
    pub price_fraction: f32,
    /// Index into [`REVIEW_OPTIONS`]
    pub review_index: usize,
    /// Upper end of the price slider
    pub max_filter_price: i64,
}

impl FilterSelection {
    /// Default selection for a slider ending at `max_filter_price`
    pub fn new(max_filter_price: i64) -> Self {
        Self {
            car_type: None,
            brand: None,
            price_fraction: DEFAULT_PRICE_FRACTION,
            review_index: 0,
            max_filter_price,
        }
    }

    /// Move the slider, clamped to `[0, 1]`
    pub fn set_price_fraction(&mut self, fraction: f32) {
        self.price_fraction = fraction.clamp(0.0, 1.0);
    }

    /// Price under the slider thumb
    pub fn current_price(&self) -> i64 {
        let span = (self.max_filter_price - MIN_FILTER_PRICE) as f32;
        MIN_FILTER_PRICE + (span * self.price_fraction).round() as i64
    }

    /// Minimum rating for the selected review option
    pub fn min_rating(&self) -> f32 {
        REVIEW_OPTIONS
            .get(self.review_index)
            .map(|(_, rating)| *rating)
            .unwrap_or(0.0)
    }

    /// Build the catalog filter
    pub fn to_filter(&self) -> CarFilter {
        let min_rating = self.min_rating();
        CarFilter {
            car_type: self.car_type,
            brand: self.brand.clone(),
            max_price: Some(self.current_price()),
            min_rating: (min_rating > 0.0).then_some(min_rating),
        }
    }

    /// Restore the default selection
    pub fn reset(&mut self) {
        *self = Self::new(self.max_filter_price);
    }

    /// Toast text for an applied filter, prices suffixed with `currency`
    pub fn summary(&self, currency: &str) -> String {
        let filter = self.to_filter();
        let mut summary = String::new();
        if let Some(car_type) = filter.car_type {
            summary.push_str(&format!("Type: {car_type} "));
        }
        if let Some(brand) = &filter.brand {
            summary.push_str(&format!("Brand: {brand} "));
        }
        if let Some(rating) = filter.min_rating {
            summary.push_str(&format!("Rating: {rating:.1}+ "));
        }
        let price = self.current_price();
        if price < self.max_filter_price {
            summary.push_str(&format!("Max Price: {price}{currency} "));
        }
        if summary.is_empty() {
            summary.push_str("All cars");
        }
        summary
    }
}

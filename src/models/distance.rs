//! Distance scalar tagged with a unit.

use std::cmp::Ordering;
use std::fmt;

use clap::ValueEnum;

/// Unit of a [`Distance`], with its factor relative to kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistanceUnit {
    #[value(name = "km")]
    Kilometers,
    Meters,
    Miles,
}

impl DistanceUnit {
    /// `value_in_unit = value_in_km * factor`
    pub fn factor(self) -> f64 {
        match self {
            DistanceUnit::Kilometers => 1.0,
            DistanceUnit::Meters => 1000.0,
            DistanceUnit::Miles => 0.621371,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Kilometers => write!(f, "km"),
            DistanceUnit::Meters => write!(f, "meters"),
            DistanceUnit::Miles => write!(f, "miles"),
        }
    }
}

/// A length in some unit.
///
/// Equality and ordering compare the length in meters, so
/// `Distance::new(1.0, Kilometers) == Distance::new(1000.0, Meters)`.
/// NaN falls back to `f64::total_cmp` so the ordering stays total and sorts
/// stay well defined.
#[derive(Debug, Clone, Copy)]
pub struct Distance {
    pub value: f64,
    pub unit: DistanceUnit,
}

impl Distance {
    pub fn new(value: f64, unit: DistanceUnit) -> Self {
        Self { value, unit }
    }

    pub fn kilometers(value: f64) -> Self {
        Self::new(value, DistanceUnit::Kilometers)
    }

    pub fn meters(value: f64) -> Self {
        Self::new(value, DistanceUnit::Meters)
    }

    /// The numeric value expressed in `unit`.
    pub fn value_in(&self, unit: DistanceUnit) -> f64 {
        if unit == self.unit {
            return self.value;
        }
        self.value / self.unit.factor() * unit.factor()
    }

    pub fn in_meters(&self) -> f64 {
        self.value_in(DistanceUnit::Meters)
    }

    /// Same length, expressed in `unit`.
    pub fn convert(self, unit: DistanceUnit) -> Self {
        Self::new(self.value_in(unit), unit)
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.in_meters(), other.in_meters());
        a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

//! Postal address and coordinate value types.

use std::fmt;
use std::str::FromStr;

use geo::Point;

use crate::error::ParseError;

/// Country used when a record doesn't name one.
pub const DEFAULT_COUNTRY: &str = "IL";

/// Placeholder street names that carry no real location. They are dropped
/// at construction because they only confuse the geocoder.
pub const GENERIC_STREETS: &[&str] = &["רחוב ראשי", "ראשי", "חדר דואר", "לב הישוב"];

/// Structured postal address.
///
/// Equality and hashing cover every field, which makes `Address` the
/// identity key for delivery points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    city: String,
    street: String,
    house: u32,
    country: String,
}

impl Address {
    /// Build an address in [`DEFAULT_COUNTRY`].
    pub fn new(city: &str, street: &str, house: u32) -> Result<Self, ParseError> {
        Self::with_country(city, street, house, DEFAULT_COUNTRY)
    }

    pub fn with_country(
        city: &str,
        street: &str,
        house: u32,
        country: &str,
    ) -> Result<Self, ParseError> {
        if house == 0 {
            return Err(ParseError::InvalidHouse(house.to_string()));
        }

        Ok(Self {
            city: city.trim().to_string(),
            street: normalize_street(street),
            house,
            country: country.to_string(),
        })
    }

    /// Build an address from an unparsed house number.
    pub fn parse(city: &str, street: &str, house: &str) -> Result<Self, ParseError> {
        Self::new(city, street, parse_house(house)?)
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Street name, empty when the source had none or a generic placeholder.
    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn house(&self) -> u32 {
        self.house
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

fn normalize_street(street: &str) -> String {
    let street = street.trim();
    if GENERIC_STREETS.contains(&street) {
        String::new()
    } else {
        street.to_string()
    }
}

/// Coerce a raw house value into a positive integer. Accepts integral
/// floats such as `"12.0"`.
pub fn parse_house(raw: &str) -> Result<u32, ParseError> {
    let trimmed = raw.trim();
    let invalid = || ParseError::InvalidHouse(raw.to_string());

    let house = match trimmed.parse::<u32>() {
        Ok(house) => house,
        Err(_) => {
            let float: f64 = trimmed.parse().map_err(|_| invalid())?;
            if float.fract() != 0.0 || float < 1.0 || float > f64::from(u32::MAX) {
                return Err(invalid());
            }
            float as u32
        }
    };

    if house == 0 {
        return Err(invalid());
    }
    Ok(house)
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl Geolocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Convert to a `geo` point (x = longitude, y = latitude)
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }
}

impl fmt::Display for Geolocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl FromStr for Geolocation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidGeolocation(s.to_string());

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [latitude, longitude] = parts.as_slice() else {
            return Err(invalid());
        };

        let latitude: f64 = latitude.parse().map_err(|_| invalid())?;
        let longitude: f64 = longitude.parse().map_err(|_| invalid())?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(invalid());
        }

        Ok(Self::new(latitude, longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_street_collapses_to_empty() {
        for street in GENERIC_STREETS {
            let address = Address::new("חיפה", street, 3).unwrap();
            assert_eq!(address.street(), "");
        }

        let padded = Address::new("חיפה", "  ראשי ", 3).unwrap();
        assert_eq!(padded.street(), "");
    }

    #[test]
    fn test_address_trims_and_defaults_country() {
        let address = Address::new(" תל אביב ", " הרצל ", 10).unwrap();
        assert_eq!(address.city(), "תל אביב");
        assert_eq!(address.street(), "הרצל");
        assert_eq!(address.country(), "IL");
    }

    #[test]
    fn test_address_equality_is_structural() {
        let a = Address::new("Haifa", "Herzl", 1).unwrap();
        let b = Address::new("Haifa ", "Herzl", 1).unwrap();
        let c = Address::new("Haifa", "Herzl", 2).unwrap();
        let d = Address::with_country("Haifa", "Herzl", 1, "US").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_parse_house() {
        assert_eq!(parse_house("12"), Ok(12));
        assert_eq!(parse_house(" 7 "), Ok(7));
        assert_eq!(parse_house("12.0"), Ok(12));
        assert!(parse_house("").is_err());
        assert!(parse_house("12a").is_err());
        assert!(parse_house("0").is_err());
        assert!(parse_house("-3").is_err());
        assert!(parse_house("1.5").is_err());
    }

    #[test]
    fn test_address_accepts_blank_city() {
        let address = Address::new("  ", "Herzl", 1).unwrap();
        assert_eq!(address.city(), "");
        assert_eq!(address.street(), "Herzl");
    }

    #[test]
    fn test_geolocation_round_trip() {
        let samples = [
            Geolocation::new(32.0, 34.0),
            Geolocation::new(32.0853, 34.781768),
            Geolocation::new(-33.8688197, 151.2092955),
            Geolocation::new(0.0, -0.000001),
        ];
        for g in samples {
            let parsed: Geolocation = g.to_string().parse().unwrap();
            assert_eq!(parsed, g);
        }
    }

    #[test]
    fn test_geolocation_parse_trims() {
        let g: Geolocation = " 32.5 ,34.25 ".parse().unwrap();
        assert_eq!(g, Geolocation::new(32.5, 34.25));
    }

    #[test]
    fn test_geolocation_parse_rejects_malformed() {
        for bad in ["", "32.0", "32.0, 34.0, 1.0", "north, 34.0", "32.0,", "NaN, 1"] {
            assert!(bad.parse::<Geolocation>().is_err(), "{bad:?} should fail");
        }
    }
}

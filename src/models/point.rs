//! Delivery point entity and its on-disk record.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::location::{parse_house, Address, Geolocation};
use crate::error::ParseError;

/// House number as it appears in a data file. JSON sources carry numbers,
/// CSV and some JSON exports carry strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HouseValue {
    Number(i64),
    Float(f64),
    Text(String),
}

impl HouseValue {
    fn to_house(&self) -> Result<u32, ParseError> {
        match self {
            HouseValue::Number(n) => u32::try_from(*n)
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ParseError::InvalidHouse(n.to_string())),
            HouseValue::Float(f) => parse_house(&f.to_string()),
            HouseValue::Text(s) => parse_house(s),
        }
    }
}

impl fmt::Display for HouseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseValue::Number(n) => write!(f, "{n}"),
            HouseValue::Float(x) => write!(f, "{x}"),
            HouseValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One row of a data or cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub city: String,
    #[serde(default)]
    pub street: Option<String>,
    pub house: HouseValue,
    #[serde(default)]
    pub addressdesc: String,
    #[serde(default)]
    pub branchname: String,
    /// `"<lat>, <lon>"`; absent until the point has been geocoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<String>,
}

/// A postal address with metadata and, once resolved, its coordinates.
///
/// Identity is the address alone: two points with the same address are the
/// same point no matter what description, branch or geolocation they carry.
#[derive(Debug, Clone)]
pub struct DeliveryPoint {
    address: Address,
    pub description: String,
    pub branch_name: String,
    pub geolocation: Option<Geolocation>,
}

impl DeliveryPoint {
    pub fn new(address: Address, description: &str, branch_name: &str) -> Self {
        Self {
            address,
            description: description.to_string(),
            branch_name: branch_name.to_string(),
            geolocation: None,
        }
    }

    pub fn with_geolocation(mut self, geolocation: Geolocation) -> Self {
        self.geolocation = Some(geolocation);
        self
    }

    /// Validate a raw record. A blank geolocation field means unresolved.
    pub fn from_record(record: &PointRecord) -> Result<Self, ParseError> {
        let geolocation = match record.geolocation.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<Geolocation>()?),
            _ => None,
        };

        let address = Address::new(
            &record.city,
            record.street.as_deref().unwrap_or(""),
            record.house.to_house()?,
        )?;

        Ok(Self {
            address,
            description: record.addressdesc.clone(),
            branch_name: record.branchname.clone(),
            geolocation,
        })
    }

    pub fn to_record(&self) -> PointRecord {
        PointRecord {
            city: self.address.city().to_string(),
            street: Some(self.address.street().to_string()),
            house: HouseValue::Number(i64::from(self.address.house())),
            addressdesc: self.description.clone(),
            branchname: self.branch_name.clone(),
            geolocation: self.geolocation.map(|g| g.to_string()),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn city(&self) -> &str {
        self.address.city()
    }

    pub fn street(&self) -> &str {
        self.address.street()
    }

    pub fn house(&self) -> u32 {
        self.address.house()
    }

    pub fn is_resolved(&self) -> bool {
        self.geolocation.is_some()
    }
}

impl PartialEq for DeliveryPoint {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for DeliveryPoint {}

impl Hash for DeliveryPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Display for DeliveryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // house is always positive, so street decides between the two forms
        if self.street().is_empty() {
            write!(f, "{}", self.city())
        } else {
            write!(f, "{}, {}, {}", self.city(), self.street(), self.house())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn record(city: &str, street: Option<&str>, house: &str) -> PointRecord {
        PointRecord {
            city: city.to_string(),
            street: street.map(String::from),
            house: HouseValue::Text(house.to_string()),
            addressdesc: "ליד הסופר".to_string(),
            branchname: "סניף מרכזי".to_string(),
            geolocation: None,
        }
    }

    #[test]
    fn test_identity_ignores_metadata() {
        let a = record("Haifa", Some("Herzl"), "5");
        let mut b = record("Haifa", Some("Herzl"), "5");
        b.addressdesc = "other".to_string();
        b.branchname = "other branch".to_string();
        b.geolocation = Some("32.8, 35.0".to_string());

        let a = DeliveryPoint::from_record(&a).unwrap();
        let b = DeliveryPoint::from_record(&b).unwrap();
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_different_house_is_different_point() {
        let a = DeliveryPoint::from_record(&record("Haifa", Some("Herzl"), "5")).unwrap();
        let b = DeliveryPoint::from_record(&record("Haifa", Some("Herzl"), "6")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_forms() {
        let full = DeliveryPoint::from_record(&record("Haifa", Some("Herzl"), "5")).unwrap();
        assert_eq!(full.to_string(), "Haifa, Herzl, 5");

        let generic = DeliveryPoint::from_record(&record("Haifa", Some("ראשי"), "5")).unwrap();
        assert_eq!(generic.street(), "");
        assert_eq!(generic.to_string(), "Haifa");

        let missing = DeliveryPoint::from_record(&record("Haifa", None, "5")).unwrap();
        assert_eq!(missing.to_string(), "Haifa");
    }

    #[test]
    fn test_blank_geolocation_is_unresolved() {
        let mut r = record("Haifa", Some("Herzl"), "5");
        r.geolocation = Some("  ".to_string());
        let point = DeliveryPoint::from_record(&r).unwrap();
        assert!(point.geolocation.is_none());

        r.geolocation = None;
        let point = DeliveryPoint::from_record(&r).unwrap();
        assert!(!point.is_resolved());
    }

    #[test]
    fn test_malformed_fields_fail() {
        let bad_house = record("Haifa", Some("Herzl"), "five");
        assert_eq!(
            DeliveryPoint::from_record(&bad_house),
            Err(ParseError::InvalidHouse("five".to_string()))
        );

        let mut bad_geo = record("Haifa", Some("Herzl"), "5");
        bad_geo.geolocation = Some("32.8".to_string());
        assert!(matches!(
            DeliveryPoint::from_record(&bad_geo),
            Err(ParseError::InvalidGeolocation(_))
        ));
    }

    #[test]
    fn test_house_value_variants() {
        let mut r = record("Haifa", None, "1");
        r.house = HouseValue::Number(17);
        assert_eq!(DeliveryPoint::from_record(&r).unwrap().house(), 17);

        r.house = HouseValue::Float(3.0);
        assert_eq!(DeliveryPoint::from_record(&r).unwrap().house(), 3);

        r.house = HouseValue::Number(-1);
        assert!(DeliveryPoint::from_record(&r).is_err());
    }

    #[test]
    fn test_record_round_trip_keeps_geolocation() {
        let point = DeliveryPoint::from_record(&record("Haifa", Some("Herzl"), "5"))
            .unwrap()
            .with_geolocation(Geolocation::new(32.8, 35.0));

        let record = point.to_record();
        assert_eq!(record.geolocation.as_deref(), Some("32.8, 35"));
        assert_eq!(record.house, HouseValue::Number(5));

        let back = DeliveryPoint::from_record(&record).unwrap();
        assert_eq!(back, point);
        assert_eq!(back.geolocation, point.geolocation);
        assert_eq!(back.description, point.description);
    }

    #[test]
    fn test_json_record_accepts_numeric_house() {
        let json = r#"{"city": "Haifa", "street": null, "house": 12,
                       "addressdesc": "", "branchname": "Main"}"#;
        let record: PointRecord = serde_json::from_str(json).unwrap();
        let point = DeliveryPoint::from_record(&record).unwrap();
        assert_eq!(point.house(), 12);
        assert!(point.geolocation.is_none());
    }
}

//! Value types shared by the allocation engine.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display name used when an allocation references a location that is not in
/// the lookup table.
pub const UNKNOWN_LOCATION_NAME: &str = "Unknown Location";

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// A validated location identifier.
///
/// Location IDs are opaque, non-empty strings. Uniqueness is not required:
/// two allocations may point at the same location and are treated as
/// separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationId(String);

impl LocationId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty {
                field: "location ID",
            });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocationId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocationId> for String {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LocationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One location's share of a datapoint value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// The location receiving the value.
    pub location_id: LocationId,

    /// Value attributed to the location. May be fractional.
    ///
    /// Range checks against the parent total happen during validation,
    /// not here.
    pub allocated_value: f64,
}

impl Allocation {
    pub const fn new(location_id: LocationId, allocated_value: f64) -> Self {
        Self {
            location_id,
            allocated_value,
        }
    }
}

/// A named place impact can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

impl Location {
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An allocation joined with its location name and share of the set total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub location_id: LocationId,

    /// Resolved display name, or [`UNKNOWN_LOCATION_NAME`].
    pub location_name: String,

    pub allocated_value: f64,

    /// Share of the allocation set total, in percent (0–100 for
    /// non-negative sets).
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_id_rejects_empty() {
        assert!(LocationId::new("").is_err());
        assert!(LocationId::new("nairobi").is_ok());
    }

    #[test]
    fn location_id_error_names_field() {
        let err = LocationId::new("").unwrap_err();
        assert_eq!(err.to_string(), "location ID cannot be empty");
    }

    #[test]
    fn location_id_serde_roundtrip() {
        let id = LocationId::new("loc-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"loc-123\"");
        let parsed: LocationId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn location_id_serde_rejects_empty() {
        let result: Result<LocationId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn location_id_as_ref() {
        let id = LocationId::new("lagos").unwrap();
        let s: &str = id.as_ref();
        assert_eq!(s, "lagos");
    }

    #[test]
    fn allocation_deserializes_from_form_shape() {
        let allocation: Allocation =
            serde_json::from_str(r#"{"location_id":"A","allocated_value":12.5}"#).unwrap();
        assert_eq!(allocation.location_id.as_str(), "A");
        assert!((allocation.allocated_value - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn allocation_deserializes_integer_values() {
        let allocation: Allocation =
            serde_json::from_str(r#"{"location_id":"A","allocated_value":120}"#).unwrap();
        assert!((allocation.allocated_value - 120.0).abs() < f64::EPSILON);
    }
}

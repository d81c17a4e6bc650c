//! Core domain logic for impact allocation.
//!
//! This crate contains the fundamental types and logic for:
//! - Allocation: validating and summarizing how a datapoint value is split
//!   across locations
//! - Locale: rendering numbers with thousands separators for messages

mod allocation;
pub mod locale;
pub mod types;

pub use allocation::{
    AllocationEngine, AllocationError, AllocationErrorKind, AllocationValidation, ConfigError,
    EngineConfig, calculate_allocation_summary, distribute_evenly, format_allocation_summary,
    total_allocated, validate_allocations,
};
pub use locale::{Locale, UnknownLocale, format_fixed};
pub use types::{
    Allocation, AllocationSummary, Location, LocationId, UNKNOWN_LOCATION_NAME, ValidationError,
};

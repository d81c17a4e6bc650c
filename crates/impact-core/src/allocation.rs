//! Datapoint allocation engine.
//!
//! Validates and summarizes how a single datapoint value (e.g. "120 wells
//! built") is split across locations.
//!
//! # Validation order
//!
//! Rules are checked in priority order and the first failure wins:
//!
//! 1. The allocated values sum to the datapoint value.
//! 2. No allocated value is negative.
//! 3. No allocated value exceeds the datapoint value.
//!
//! Rule 3 can only fire for a negative datapoint value once rules 1 and 2
//! pass. It is kept for callers that model deficits as negative totals.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::locale::{Locale, format_fixed};
use crate::types::{Allocation, AllocationSummary, Location, LocationId, UNKNOWN_LOCATION_NAME};

/// Configuration for the allocation engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Locale used to render numbers in messages and summaries.
    pub locale: Locale,

    /// Maximum absolute difference accepted between the allocated sum and the
    /// datapoint value. Default: 0.0 (exact floating-point equality).
    sum_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            sum_tolerance: 0.0,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Accepts sums within `tolerance` of the datapoint value.
    ///
    /// Splits produced by [`distribute_evenly`] can miss the exact total by a
    /// rounding error; a small tolerance lets those sets validate.
    pub fn with_sum_tolerance(mut self, tolerance: f64) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance { value: tolerance });
        }
        self.sum_tolerance = tolerance;
        Ok(self)
    }

    pub const fn sum_tolerance(&self) -> f64 {
        self.sum_tolerance
    }
}

/// Errors building an [`EngineConfig`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sum tolerance must be a finite, non-negative number, got {value}")]
    InvalidTolerance { value: f64 },
}

/// Machine-readable category of a failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationErrorKind {
    SumMismatch,
    NegativeValue,
    ExceedsTotal,
}

impl AllocationErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SumMismatch => "sum_mismatch",
            Self::NegativeValue => "negative_value",
            Self::ExceedsTotal => "exceeds_total",
        }
    }
}

impl fmt::Display for AllocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an allocation set was rejected.
///
/// Each variant keeps the locale its numbers are rendered with, so the
/// `Display` output matches what the caller configured.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocationError {
    #[error(
        "Total allocated ({}) must equal the datapoint value ({})",
        render(.locale, .allocated),
        render(.locale, .expected)
    )]
    SumMismatch {
        allocated: f64,
        expected: f64,
        locale: Locale,
    },

    #[error(
        "Allocation for location {location_id} cannot be negative ({})",
        render(.locale, .value)
    )]
    NegativeValue {
        location_id: LocationId,
        value: f64,
        locale: Locale,
    },

    #[error(
        "Allocation for location {location_id} ({}) exceeds the datapoint value ({})",
        render(.locale, .value),
        render(.locale, .total)
    )]
    ExceedsTotal {
        location_id: LocationId,
        value: f64,
        total: f64,
        locale: Locale,
    },
}

impl AllocationError {
    pub const fn kind(&self) -> AllocationErrorKind {
        match self {
            Self::SumMismatch { .. } => AllocationErrorKind::SumMismatch,
            Self::NegativeValue { .. } => AllocationErrorKind::NegativeValue,
            Self::ExceedsTotal { .. } => AllocationErrorKind::ExceedsTotal,
        }
    }
}

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "thiserror passes variant fields by reference"
)]
fn render(locale: &Locale, value: &f64) -> String {
    locale.format_number(*value)
}

/// Outcome of [`validate_allocations`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AllocationValidation {
    /// The first rule that failed, if any.
    pub error: Option<AllocationError>,
}

impl AllocationValidation {
    const fn valid() -> Self {
        Self { error: None }
    }

    const fn invalid(error: AllocationError) -> Self {
        Self { error: Some(error) }
    }

    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn kind(&self) -> Option<AllocationErrorKind> {
        self.error.as_ref().map(AllocationError::kind)
    }

    /// Human-readable error text, if validation failed.
    pub fn message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Allocation operations bound to an [`EngineConfig`].
///
/// Stateless: every method reads only its arguments and the config, and
/// returns fresh values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationEngine {
    config: EngineConfig,
}

impl AllocationEngine {
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks that `allocations` form a committable split of `total_value`.
    ///
    /// Never panics. An empty set sums to zero.
    pub fn validate(&self, total_value: f64, allocations: &[Allocation]) -> AllocationValidation {
        let locale = self.config.locale;
        let allocated = total_allocated(allocations);

        let verdict = if !self.sums_match(allocated, total_value) {
            AllocationValidation::invalid(AllocationError::SumMismatch {
                allocated,
                expected: total_value,
                locale,
            })
        } else if let Some(negative) = allocations.iter().find(|a| a.allocated_value < 0.0) {
            AllocationValidation::invalid(AllocationError::NegativeValue {
                location_id: negative.location_id.clone(),
                value: negative.allocated_value,
                locale,
            })
        } else if let Some(over) = allocations
            .iter()
            .find(|a| a.allocated_value > total_value)
        {
            AllocationValidation::invalid(AllocationError::ExceedsTotal {
                location_id: over.location_id.clone(),
                value: over.allocated_value,
                total: total_value,
                locale,
            })
        } else {
            AllocationValidation::valid()
        };

        tracing::debug!(
            total_value,
            allocated,
            count = allocations.len(),
            kind = ?verdict.kind(),
            "validated allocations"
        );
        verdict
    }

    #[expect(
        clippy::float_cmp,
        reason = "exact equality is the default contract for allocated sums"
    )]
    fn sums_match(&self, allocated: f64, expected: f64) -> bool {
        let tolerance = self.config.sum_tolerance;
        if tolerance == 0.0 {
            allocated == expected
        } else {
            (allocated - expected).abs() <= tolerance
        }
    }

    /// Joins each allocation with its location name and percentage share.
    ///
    /// Percentages are relative to the sum of `allocations` itself. When that
    /// sum is zero every percentage is zero.
    pub fn summarize(
        &self,
        allocations: &[Allocation],
        locations: &[Location],
    ) -> Vec<AllocationSummary> {
        let total = total_allocated(allocations);

        let summaries: Vec<AllocationSummary> = allocations
            .iter()
            .map(|allocation| {
                let location_name = locations
                    .iter()
                    .find(|location| location.id == allocation.location_id)
                    .map_or_else(
                        || {
                            tracing::warn!(
                                location_id = %allocation.location_id,
                                "allocation references unknown location"
                            );
                            UNKNOWN_LOCATION_NAME.to_string()
                        },
                        |location| location.name.clone(),
                    );

                let percentage = if total == 0.0 {
                    0.0
                } else {
                    (allocation.allocated_value / total) * 100.0
                };

                AllocationSummary {
                    location_id: allocation.location_id.clone(),
                    location_name,
                    allocated_value: allocation.allocated_value,
                    percentage,
                }
            })
            .collect();

        tracing::trace!(count = summaries.len(), total, "summarized allocations");
        summaries
    }

    /// Splits `total_value` into equal shares, one per entry of `location_ids`.
    ///
    /// Duplicated IDs each get their own share. Remainders are not
    /// redistributed, so the shares may not sum back to `total_value` exactly.
    pub fn distribute_evenly(
        &self,
        total_value: f64,
        location_ids: &[LocationId],
    ) -> Vec<Allocation> {
        if location_ids.is_empty() {
            return Vec::new();
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "location counts stay far below 2^52"
        )]
        let even_value = total_value / location_ids.len() as f64;

        tracing::trace!(
            total_value,
            slots = location_ids.len(),
            even_value,
            "distributed evenly"
        );

        location_ids
            .iter()
            .map(|id| Allocation::new(id.clone(), even_value))
            .collect()
    }

    /// Renders summaries as `"Name: value (pct%)"` segments joined by `", "`.
    pub fn format_summary(&self, summary: &[AllocationSummary]) -> String {
        summary
            .iter()
            .map(|entry| {
                format!(
                    "{}: {} ({}%)",
                    entry.location_name,
                    self.config.locale.format_number(entry.allocated_value),
                    format_fixed(entry.percentage, 1)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sum of all allocated values, folded left to right from zero.
///
/// This is the denominator [`AllocationEngine::summarize`] uses for
/// percentages and the sum validation compares against the datapoint value.
pub fn total_allocated(allocations: &[Allocation]) -> f64 {
    allocations
        .iter()
        .fold(0.0, |acc, allocation| acc + allocation.allocated_value)
}

/// Validates `allocations` against `total_value` with the default config.
pub fn validate_allocations(total_value: f64, allocations: &[Allocation]) -> AllocationValidation {
    AllocationEngine::default().validate(total_value, allocations)
}

/// Summarizes `allocations` against `locations` with the default config.
pub fn calculate_allocation_summary(
    allocations: &[Allocation],
    locations: &[Location],
) -> Vec<AllocationSummary> {
    AllocationEngine::default().summarize(allocations, locations)
}

/// Splits `total_value` evenly across `location_ids`.
pub fn distribute_evenly(total_value: f64, location_ids: &[LocationId]) -> Vec<Allocation> {
    AllocationEngine::default().distribute_evenly(total_value, location_ids)
}

/// Formats summaries with the default (en-US) locale.
pub fn format_allocation_summary(summary: &[AllocationSummary]) -> String {
    AllocationEngine::default().format_summary(summary)
}

//! Validate command for checking an allocation set against its datapoint value.

use std::io::Write;

use anyhow::{Context, Result};
use impact_core::{AllocationEngine, AllocationErrorKind, AllocationValidation};
use serde::Serialize;

use crate::input::{AllocationInput, ensure_finite};

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonValidation {
    pub is_valid: bool,
    pub error_kind: Option<AllocationErrorKind>,
    pub error: Option<String>,
}

impl From<&AllocationValidation> for JsonValidation {
    fn from(validation: &AllocationValidation) -> Self {
        Self {
            is_valid: validation.is_valid(),
            error_kind: validation.kind(),
            error: validation.message(),
        }
    }
}

/// Format a validation result for human-readable output.
pub fn format_validation(validation: &AllocationValidation) -> String {
    match &validation.error {
        None => "valid\n".to_string(),
        Some(error) => format!("invalid [{}]: {error}\n", error.kind()),
    }
}

/// Runs the validate command.
///
/// `total` overrides the document's `total_value`. Returns whether the
/// allocation set is valid.
pub fn run<W: Write>(
    writer: &mut W,
    engine: &AllocationEngine,
    total: Option<f64>,
    input: &AllocationInput,
    json: bool,
) -> Result<bool> {
    let total_value = total
        .or(input.total_value)
        .context("missing datapoint value: pass --total or set total_value in the input")?;
    ensure_finite(total_value, "total")?;

    let validation = engine.validate(total_value, &input.allocations);

    if json {
        let output = serde_json::to_string_pretty(&JsonValidation::from(&validation))?;
        writeln!(writer, "{output}")?;
    } else {
        write!(writer, "{}", format_validation(&validation))?;
    }

    Ok(validation.is_valid())
}

#[cfg(test)]
mod tests {
    use super::*;

    use impact_core::{EngineConfig, Locale};
    use insta::assert_snapshot;

    use crate::input::parse_allocation;

    fn input(total: Option<f64>, pairs: &[&str]) -> AllocationInput {
        AllocationInput {
            total_value: total,
            allocations: pairs.iter().map(|p| parse_allocation(p).unwrap()).collect(),
            locations: Vec::new(),
        }
    }

    fn run_to_string(
        engine: &AllocationEngine,
        total: Option<f64>,
        input: &AllocationInput,
        json: bool,
    ) -> (bool, String) {
        let mut output = Vec::new();
        let valid = run(&mut output, engine, total, input, json).unwrap();
        (valid, String::from_utf8(output).unwrap())
    }

    #[test]
    fn valid_set_prints_valid() {
        let engine = AllocationEngine::default();
        let (valid, output) =
            run_to_string(&engine, Some(100.0), &input(None, &["A=30", "B=70"]), false);
        assert!(valid);
        assert_eq!(output, "valid\n");
    }

    #[test]
    fn mismatch_prints_kind_and_message() {
        let engine = AllocationEngine::default();
        let (valid, output) =
            run_to_string(&engine, Some(100.0), &input(None, &["A=40", "B=50"]), false);
        assert!(!valid);
        assert_snapshot!(output, @"invalid [sum_mismatch]: Total allocated (90) must equal the datapoint value (100)");
    }

    #[test]
    fn negative_value_json_output() {
        let engine = AllocationEngine::default();
        let (valid, output) =
            run_to_string(&engine, Some(100.0), &input(None, &["A=120", "B=-20"]), true);
        assert!(!valid);
        assert_snapshot!(output, @r#"
        {
          "is_valid": false,
          "error_kind": "negative_value",
          "error": "Allocation for location B cannot be negative (-20)"
        }
        "#);
    }

    #[test]
    fn valid_json_output_has_null_error() {
        let engine = AllocationEngine::default();
        let (_, output) = run_to_string(&engine, None, &input(Some(10.0), &["A=10"]), true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["is_valid"], true);
        assert!(value["error_kind"].is_null());
        assert!(value["error"].is_null());
    }

    #[test]
    fn explicit_total_overrides_document_total() {
        let engine = AllocationEngine::default();
        let (valid, _) =
            run_to_string(&engine, Some(10.0), &input(Some(99.0), &["A=10"]), false);
        assert!(valid);
    }

    #[test]
    fn missing_total_is_an_error() {
        let engine = AllocationEngine::default();
        let mut output = Vec::new();
        let err = run(&mut output, &engine, None, &input(None, &["A=1"]), false).unwrap_err();
        assert!(err.to_string().contains("missing datapoint value"), "{err}");
    }

    #[test]
    fn non_finite_total_is_an_error() {
        let engine = AllocationEngine::default();
        for total in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut output = Vec::new();
            let err =
                run(&mut output, &engine, Some(total), &input(None, &["A=1"]), false).unwrap_err();
            assert!(err.to_string().contains("must be a finite number"), "{err}");
            assert!(output.is_empty());
        }
    }

    #[test]
    fn messages_use_engine_locale() {
        let engine = AllocationEngine::new(EngineConfig::default().with_locale(Locale::DeDe));
        let (_, output) =
            run_to_string(&engine, Some(2_000.0), &input(None, &["A=1500.25"]), false);
        assert_snapshot!(output, @"invalid [sum_mismatch]: Total allocated (1.500,25) must equal the datapoint value (2.000)");
    }
}

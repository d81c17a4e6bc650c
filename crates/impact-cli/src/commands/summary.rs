//! Summary command for showing each location's share of an allocation set.

use std::fmt::Write;

use anyhow::Result;
use impact_core::{AllocationEngine, AllocationSummary, format_fixed, total_allocated};
use serde::Serialize;

use crate::input::AllocationInput;

// ========== Human-Readable Output ==========

/// Format summaries as a table followed by the one-line summary.
pub fn format_summary(engine: &AllocationEngine, summary: &[AllocationSummary]) -> String {
    let mut output = String::new();

    writeln!(output, "ALLOCATION SUMMARY").unwrap();
    writeln!(output).unwrap();

    if summary.is_empty() {
        writeln!(output, "No allocations.").unwrap();
        return output;
    }

    let locale = engine.config().locale;

    writeln!(
        output,
        "{:<12}  {:<22}  {:>12}  {:>6}",
        "Location", "Name", "Value", "Share"
    )
    .unwrap();
    writeln!(
        output,
        "────────────  ──────────────────────  ────────────  ──────"
    )
    .unwrap();

    for entry in summary {
        // Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8
        let name = if entry.location_name.chars().count() > 22 {
            format!("{}...", entry.location_name.chars().take(19).collect::<String>())
        } else {
            entry.location_name.clone()
        };
        let share = format!("{}%", format_fixed(entry.percentage, 1));

        writeln!(
            output,
            "{:<12}  {:<22}  {:>12}  {:>6}",
            entry.location_id.as_str(),
            name,
            locale.format_number(entry.allocated_value),
            share
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "{}", engine.format_summary(summary)).unwrap();

    output
}

// ========== JSON Output ==========

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub allocations: &'a [AllocationSummary],
    pub total_allocated: f64,
    pub formatted: String,
}

/// Format summaries as JSON.
///
/// `total_allocated` is the same sum the percentages were computed against.
pub fn format_summary_json(
    engine: &AllocationEngine,
    summary: &[AllocationSummary],
    total_allocated: f64,
) -> Result<String> {
    let json = JsonSummary {
        allocations: summary,
        total_allocated,
        formatted: engine.format_summary(summary),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Runs the summary command.
pub fn run<W: std::io::Write>(
    writer: &mut W,
    engine: &AllocationEngine,
    input: &AllocationInput,
    json: bool,
) -> Result<()> {
    let summary = engine.summarize(&input.allocations, &input.locations);

    if json {
        let total = total_allocated(&input.allocations);
        writeln!(writer, "{}", format_summary_json(engine, &summary, total)?)?;
    } else {
        write!(writer, "{}", format_summary(engine, &summary))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::input::{parse_allocation, parse_location};

    fn input(allocations: &[&str], locations: &[&str]) -> AllocationInput {
        AllocationInput {
            total_value: None,
            allocations: allocations
                .iter()
                .map(|p| parse_allocation(p).unwrap())
                .collect(),
            locations: locations.iter().map(|p| parse_location(p).unwrap()).collect(),
        }
    }

    fn run_to_string(input: &AllocationInput, json: bool) -> String {
        let engine = AllocationEngine::default();
        let mut output = Vec::new();
        run(&mut output, &engine, input, json).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn table_lists_each_allocation() {
        let output = run_to_string(
            &input(
                &["nbo=30", "los=1470", "zz=0"],
                &["nbo=Nairobi", "los=Lagos"],
            ),
            false,
        );
        assert_snapshot!(output, @r"
        ALLOCATION SUMMARY

        Location      Name                           Value   Share
        ────────────  ──────────────────────  ────────────  ──────
        nbo           Nairobi                           30    2.0%
        los           Lagos                          1,470   98.0%
        zz            Unknown Location                   0    0.0%

        Nairobi: 30 (2.0%), Lagos: 1,470 (98.0%), Unknown Location: 0 (0.0%)
        ");
    }

    #[test]
    fn empty_input_prints_placeholder() {
        let output = run_to_string(&input(&[], &[]), false);
        assert_snapshot!(output, @r"
        ALLOCATION SUMMARY

        No allocations.
        ");
    }

    #[test]
    fn long_names_are_truncated() {
        let output = run_to_string(
            &input(&["A=1"], &["A=Kakamega County Water Point 7"]),
            false,
        );
        assert!(output.contains("Kakamega County Wate..."), "{output}");
        assert!(output.contains("Kakamega County Water Point 7: 1 (100.0%)"));
    }

    #[test]
    fn shares_round_half_tenths_up() {
        let output = run_to_string(&input(&["A=12.25", "B=87.75"], &[]), false);
        assert!(output.contains("12.3%"), "{output}");
        assert!(output.contains("87.8%"), "{output}");
        assert!(!output.contains("12.2%"), "{output}");
    }

    #[test]
    fn json_total_matches_engine_sum() {
        let parsed = input(&["A=0.1", "B=0.2", "C=0.3"], &[]);
        let output = run_to_string(&parsed, true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value["total_allocated"],
            serde_json::json!(total_allocated(&parsed.allocations))
        );
    }

    #[test]
    fn json_output_includes_formatted_line() {
        let output = run_to_string(
            &input(&["A=30", "B=70"], &["A=Nairobi", "B=Lagos"]),
            true,
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["allocations"][0]["location_name"], "Nairobi");
        assert_eq!(value["allocations"][1]["location_id"], "B");
        assert_eq!(value["total_allocated"], 100.0);
        assert_eq!(value["formatted"], "Nairobi: 30 (30.0%), Lagos: 70 (70.0%)");
    }
}

//! Benchmark reporting
//!
//! Gantree: L7_Benchmark → Reporter
//!
//! Markdown, JSON, CSV and text output for suite results.

use crate::suite::{CaseResult, SuiteStatistics};
use std::fmt::Write;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown table
    Markdown,
    /// JSON
    Json,
    /// CSV
    Csv,
    /// Plain text summary
    Text,
}

/// Benchmark reporter
/// Gantree: Reporter // 결과 리포팅
pub struct Reporter;

impl Reporter {
    /// Generate report in specified format
    pub fn report(results: &[CaseResult], format: ReportFormat) -> String {
        match format {
            ReportFormat::Markdown => Self::to_markdown(results),
            ReportFormat::Json => Self::to_json(results),
            ReportFormat::Csv => Self::to_csv(results),
            ReportFormat::Text => Self::to_text(results),
        }
    }

    /// Markdown summary plus per-case table
    pub fn to_markdown(results: &[CaseResult]) -> String {
        let stats = SuiteStatistics::from_results(results);
        let mut output = String::new();

        let _ = writeln!(output, "# QFC Optimizer Benchmark Results\n");
        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "- **Cases**: {}", stats.count);
        let _ = writeln!(
            output,
            "- **Targeted collisions**: {} → {} ({:.1}% removed)",
            stats.targeted_before,
            stats.targeted_after,
            stats.reduction_rate() * 100.0
        );
        let _ = writeln!(output, "- **Flips adopted**: {}", stats.total_flips);
        let _ = writeln!(output, "- **Unsound cases**: {}\n", stats.unsound_cases);

        let _ = writeln!(output, "## Detailed Results\n");
        let _ = writeln!(
            output,
            "| Name | Qubits | Edges | Before | After | Targeted | Flips | Sound | Time(ms) |"
        );
        let _ = writeln!(
            output,
            "|------|--------|-------|--------|-------|----------|-------|-------|----------|"
        );
        for r in results {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} → {} | {} | {} | {} |",
                r.name,
                r.num_qubits,
                r.num_edges,
                r.initial_counts.total(),
                r.final_counts.total(),
                r.targeted_before(),
                r.targeted_after(),
                r.flips_accepted,
                if r.is_sound() { "✓" } else { "✗" },
                r.time_ms
            );
        }
        output
    }

    /// Statistics and results as pretty JSON
    pub fn to_json(results: &[CaseResult]) -> String {
        let report = serde_json::json!({
            "statistics": SuiteStatistics::from_results(results),
            "results": results,
        });
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    /// One row per case, counts in category order
    pub fn to_csv(results: &[CaseResult]) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "name,qubits,edges,before,after,t1,t2,t3,t4,t5,t6,t7,flips,sound,time_ms"
        );
        for r in results {
            let after: Vec<String> = r
                .final_counts
                .as_array()
                .iter()
                .map(|c| c.to_string())
                .collect();
            let _ = writeln!(
                output,
                "{},{},{},{},{},{},{},{},{}",
                r.name,
                r.num_qubits,
                r.num_edges,
                r.initial_counts.total(),
                r.final_counts.total(),
                after.join(","),
                r.flips_accepted,
                r.is_sound(),
                r.time_ms
            );
        }
        output
    }

    /// Short text summary
    pub fn to_text(results: &[CaseResult]) -> String {
        let stats = SuiteStatistics::from_results(results);
        let mut output = String::new();
        let _ = writeln!(output, "QFC Benchmark: {} cases", stats.count);
        for r in results {
            let _ = writeln!(
                output,
                "  {}: {} -> {}",
                r.name, r.initial_counts, r.final_counts
            );
        }
        let _ = write!(
            output,
            "Targeted: {} -> {}, unsound: {}",
            stats.targeted_before, stats.targeted_after, stats.unsound_cases
        );
        output
    }
}

// ============================================================================
// Tests
// ============================================================================

use crate::report::report_model::SimulationReport;
use crate::scenario::scenario_model::Expectation;

/// Format a simulation report for the terminal.
///
/// ```text
/// === Simulation: scenarios/happy.yaml ===
///
/// ✓ PASS  text testimonial (12 steps, 3 checks) -> complete
/// ✗ FAIL  video capture (8 steps, 2 checks) -> recording
///     [FAIL] Step 6: step (saw recording)
///     [LEAK] 1 capture sessions
///
/// === Results: 1 passed, 1 failed (2 total) ===
/// ```
pub fn format_console_report(report: &SimulationReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Simulation: {} ===\n\n", report.title));

    for result in &report.results {
        let marker = if result.passed {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };

        out.push_str(&format!(
            "{}  {} ({} steps, {} checks) -> {}\n",
            marker,
            result.scenario_name,
            result.steps_run,
            result.expectation_results.len(),
            result.final_step
        ));

        if !result.rejected_steps.is_empty() {
            out.push_str(&format!("    refused steps: {:?}\n", result.rejected_steps));
        }

        for failed in result.failed_expectations() {
            out.push_str(&format!(
                "    [FAIL] Step {}: {} (saw {})\n",
                failed.step_index,
                expectation_name(&failed.expectation),
                failed.actual.as_deref().unwrap_or("?")
            ));
        }

        for leak in &result.leaks {
            out.push_str(&format!("    [LEAK] {}\n", leak));
        }
    }

    out.push_str(&format!(
        "\n=== Results: {} passed, {} failed ({} total)",
        report.passed, report.failed, report.total
    ));

    if let Some(ms) = report.duration_ms {
        out.push_str(&format!(" in {:.1}s", ms as f64 / 1000.0));
    }

    out.push_str(" ===\n");
    out
}

fn expectation_name(expectation: &Expectation) -> &'static str {
    match expectation {
        Expectation::Step { .. } => "step",
        Expectation::ErrorPresent { .. } => "error_present",
        Expectation::NoErrors => "no_errors",
        Expectation::SubmitErrorShown => "submit_error_shown",
        Expectation::Submissions { .. } => "submissions",
        Expectation::DisplayAllowed { .. } => "display_allowed",
        Expectation::TriggerPending { .. } => "trigger_pending",
        Expectation::PanelSide { .. } => "panel_side",
        Expectation::IncentiveEligible { .. } => "incentive_eligible",
        Expectation::RewardShown { .. } => "reward_shown",
        Expectation::Question { .. } => "question",
    }
}

mod common;

use common::fixtures::*;
use widget_engine::{
    report::{console::format_console_report, report_model::SimulationReport},
    scenario::{
        runner::{load_scenarios, parse_scenario, ScenarioRunner, SubmitTarget},
        scenario_model::{Expectation, Scenario, ScenarioStep},
    },
    settings::settings_model::{BusinessEvent, TestimonialFormat},
    trace::logger::TraceLogger,
    widget::{error::WidgetError, submit::RecordingSubmitter, widget_model::WidgetStep},
};

const HAPPY_PATH: &str = r#"
name: text testimonial
steps:
  - action: open
  - action: tick
  - action: rate
    rating: 5
  - action: select_format
    format: text
  - action: continue
  - action: text
    text: "Great product and service experience"
  - action: field
    id: name
    value: Ada Lovelace
  - action: field
    id: email
    value: ada@example.com
  - action: continue
  - action: expect
    expectations:
      - type: step
        expected: review
      - type: no_errors
  - action: submit
  - action: expect
    expectations:
      - type: step
        expected: complete
      - type: submissions
        expected: 1
"#;

fn run(scenario: &Scenario) -> widget_engine::scenario::scenario_model::ScenarioResult {
    ScenarioRunner::run(scenario, &settings(), SubmitTarget::default(), TraceLogger::disabled())
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parses_unit_and_struct_actions() {
    let scenario = parse_scenario("happy.yaml", HAPPY_PATH).unwrap();

    assert_eq!(scenario.name, "text testimonial");
    assert_eq!(scenario.steps.len(), 12);
    assert_eq!(scenario.steps[0], ScenarioStep::Open);
    assert_eq!(
        scenario.steps[3],
        ScenarioStep::SelectFormat {
            format: TestimonialFormat::Text
        }
    );
    assert_eq!(scenario.steps[9].name(), "expect");
    assert!(scenario.settings.is_none());
    assert_eq!(scenario.page.path, "/");
}

#[test]
fn parses_page_fixture_and_expectations() {
    let yaml = r#"
name: scroll gate
page:
  path: /pricing
  scrollY: 100
  documentHeight: 3000
  viewportHeight: 1000
  captureAvailable: false
settings:
  displayRules:
    minScrollDepth: 50
steps:
  - action: business_event
    event: purchase_completed
  - action: expect
    expectations:
      - type: display_allowed
        expected: false
      - type: panel_side
        expected: below
      - type: error_present
        field: email
"#;

    let scenario = parse_scenario("gate.yaml", yaml).unwrap();

    assert_eq!(scenario.page.path, "/pricing");
    assert_eq!(scenario.page.scroll_y, 100.0);
    assert!(!scenario.page.capture_available);
    assert_eq!(scenario.page.viewport_width, 1280.0);

    let settings = scenario.settings.as_ref().unwrap();
    assert_eq!(settings.display_rules.min_scroll_depth, 50.0);

    assert_eq!(
        scenario.steps[0],
        ScenarioStep::BusinessEvent {
            event: BusinessEvent::PurchaseCompleted
        }
    );
    match &scenario.steps[1] {
        ScenarioStep::Expect { expectations } => {
            assert_eq!(expectations.len(), 3);
            assert_eq!(expectations[0], Expectation::DisplayAllowed { expected: false });
            assert_eq!(
                expectations[2],
                Expectation::ErrorPresent {
                    field: "email".into()
                }
            );
        }
        other => panic!("expected an expect step, got {:?}", other),
    }
}

#[test]
fn unknown_action_is_a_parse_error_naming_the_file() {
    let yaml = "name: bad\nsteps:\n  - action: teleport\n";
    let err = parse_scenario("bad.yaml", yaml).unwrap_err();

    assert!(matches!(err, WidgetError::ScenarioParse { .. }));
    assert!(err.to_string().contains("bad.yaml"));
}

#[test]
fn missing_steps_is_a_parse_error() {
    assert!(parse_scenario("empty.yaml", "name: nothing\n").is_err());
}

// ============================================================================
// Running
// ============================================================================

#[test]
fn happy_path_passes_without_leaks() {
    let scenario = parse_scenario("happy.yaml", HAPPY_PATH).unwrap();
    let result = run(&scenario);

    assert!(result.passed, "{:?}", result);
    assert_eq!(result.final_step, WidgetStep::Complete);
    assert_eq!(result.submissions, 1);
    assert_eq!(result.steps_run, 12);
    assert_eq!(result.expectation_results.len(), 4);
    assert!(result.rejected_steps.is_empty());
    assert!(result.leaks.is_empty());
}

#[test]
fn failed_submission_then_retry() {
    let retry = "  - action: fail_next_submit
    reason: offline
  - action: submit
  - action: expect
    expectations:
      - type: submit_error_shown
      - type: step
        expected: review
  - action: submit
";
    let yaml = HAPPY_PATH.replace("  - action: submit\n", retry);
    let scenario = parse_scenario("retry.yaml", &yaml).unwrap();
    let recorder = RecordingSubmitter::new();

    let result = ScenarioRunner::run(
        &scenario,
        &settings(),
        SubmitTarget::Recording(recorder.clone()),
        TraceLogger::disabled(),
    );

    assert!(result.passed, "{:?}", result.failed_expectations().collect::<Vec<_>>());
    assert_eq!(result.final_step, WidgetStep::Complete);
    assert_eq!(result.submissions, 1);
    assert_eq!(recorder.submissions().len(), 1);
}

#[test]
fn failing_expectation_is_reported_with_what_was_seen() {
    let yaml = r#"
name: skipped text
steps:
  - action: open
  - action: tick
  - action: select_format
    format: text
  - action: continue
  - action: continue
  - action: expect
    expectations:
      - type: error_present
        field: text
      - type: step
        expected: review
"#;
    let scenario = parse_scenario("skipped.yaml", yaml).unwrap();
    let result = run(&scenario);

    assert!(!result.passed);
    assert_eq!(result.rejected_steps, vec![4]);

    let failed: Vec<_> = result.failed_expectations().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].step_index, 5);
    assert_eq!(failed[0].actual.as_deref(), Some("forms"));
}

#[test]
fn pending_trigger_opens_once_scrolled_far_enough() {
    let yaml = r#"
name: scroll trigger
page:
  path: /blog/post
  documentHeight: 2000
  viewportHeight: 1000
settings:
  displayRules:
    minScrollDepth: 50
  triggers:
    - businessEvent: page_visit
      enabled: true
      delay: "3"
      delayUnit: seconds
steps:
  - action: wait
    ms: 3000
  - action: expect
    expectations:
      - type: display_allowed
        expected: false
      - type: trigger_pending
        expected: true
      - type: step
        expected: closed
  - action: scroll
    scroll_y: 600
  - action: expect
    expectations:
      - type: trigger_pending
        expected: false
      - type: step
        expected: opening
  - action: close
"#;
    let scenario = parse_scenario("trigger.yaml", yaml).unwrap();
    let result = run(&scenario);

    assert!(result.passed, "{:?}", result);
    assert_eq!(result.final_step, WidgetStep::Closed);
}

#[test]
fn media_left_in_review_is_released_on_drop() {
    let yaml = r#"
name: abandoned video
steps:
  - action: open
  - action: tick
  - action: select_format
    format: video
  - action: continue
  - action: field
    id: name
    value: Ada
  - action: field
    id: email
    value: ada@example.com
  - action: continue
  - action: capture
    mime_type: video/webm
    size_bytes: 2048
  - action: expect
    expectations:
      - type: step
        expected: review
"#;
    let scenario = parse_scenario("video.yaml", yaml).unwrap();
    let result = run(&scenario);

    assert!(result.passed, "{:?}", result);
    assert!(result.leaks.is_empty());
    assert_eq!(result.final_step, WidgetStep::Review);
}

#[test]
fn oversized_capture_is_refused_without_allocating_it() {
    let yaml = r#"
name: huge clip
settings:
  formats:
    - type: video
      enabled: true
      maxSize: 1000
steps:
  - action: open
  - action: tick
  - action: select_format
    format: video
  - action: continue
  - action: field
    id: name
    value: Ada
  - action: field
    id: email
    value: ada@example.com
  - action: continue
  - action: capture
    mime_type: video/webm
    size_bytes: 8000000000
  - action: expect
    expectations:
      - type: step
        expected: recording
      - type: error_present
        field: media
"#;
    let scenario = parse_scenario("huge.yaml", yaml).unwrap();
    let result = run(&scenario);

    assert!(result.passed, "{:?}", result);
    assert_eq!(result.rejected_steps, vec![7]);
    assert!(result.leaks.is_empty());
}

#[test]
fn scenario_settings_replace_the_configured_ones() {
    let yaml = r#"
name: excluded
page:
  path: /admin/users
settings:
  displayRules:
    excludedPages: ["/admin/*"]
steps:
  - action: expect
    expectations:
      - type: display_allowed
        expected: false
"#;
    let scenario = parse_scenario("excluded.yaml", yaml).unwrap();
    assert!(run(&scenario).passed);

    let without_settings = Scenario {
        settings: None,
        ..scenario
    };
    assert!(!run(&without_settings).passed);
}

#[test]
fn fail_next_submit_is_refused_for_webhooks() {
    let scenario = Scenario {
        name: "webhook".into(),
        page: page("/"),
        settings: None,
        options: Default::default(),
        steps: vec![ScenarioStep::FailNextSubmit {
            reason: "offline".into(),
        }],
    };

    let result = ScenarioRunner::run(
        &scenario,
        &settings(),
        SubmitTarget::Webhook("http://127.0.0.1:9/testimonials".into()),
        TraceLogger::disabled(),
    );

    assert_eq!(result.rejected_steps, vec![0]);
    assert!(result.passed);
}

#[test]
fn runs_are_traced_when_asked() {
    let scenario = parse_scenario("happy.yaml", HAPPY_PATH).unwrap();
    let path = std::env::temp_dir().join(format!("widget-engine-trace-{}.jsonl", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let tracer = TraceLogger::new(path.to_str().unwrap());
    let result = ScenarioRunner::run(&scenario, &settings(), SubmitTarget::default(), tracer);
    assert!(result.passed);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert!(lines.len() >= 10);
    assert!(!content.contains("ada@example.com"));
    assert!(!content.contains("Great product"));

    let _ = std::fs::remove_file(&path);
}

// ============================================================================
// Loading and reporting
// ============================================================================

#[test]
fn loads_a_directory_sorted_by_name_and_skips_other_files() {
    let dir = std::env::temp_dir().join(format!("widget-engine-scenarios-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    std::fs::write(dir.join("b.yaml"), "name: zulu\nsteps: []\n").unwrap();
    std::fs::write(dir.join("a.yml"), "name: alpha\nsteps:\n  - action: open\n").unwrap();
    std::fs::write(dir.join("notes.txt"), "not a scenario").unwrap();

    let scenarios = load_scenarios(dir.to_str().unwrap()).unwrap();
    let names: Vec<_> = scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zulu"]);

    let single = load_scenarios(dir.join("a.yml").to_str().unwrap()).unwrap();
    assert_eq!(single.len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_scenario_path_is_a_read_error() {
    let err = load_scenarios("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, WidgetError::ConfigRead { .. }));
}

#[test]
fn report_counts_and_console_output() {
    let happy = run(&parse_scenario("happy.yaml", HAPPY_PATH).unwrap());
    let broken = run(&parse_scenario(
        "broken.yaml",
        "name: broken\nsteps:\n  - action: open\n  - action: expect\n    expectations:\n      - type: step\n        expected: complete\n",
    )
    .unwrap());

    let report = SimulationReport::from_results("scenarios/", vec![happy, broken]).with_duration(1500);
    assert_eq!(report.total, 2);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert!(!report.all_passed());

    let text = format_console_report(&report);
    assert!(text.starts_with("=== Simulation: scenarios/ ==="));
    assert!(text.contains("\u{2713} PASS  text testimonial (12 steps, 4 checks) -> complete"));
    assert!(text.contains("\u{2717} FAIL  broken (2 steps, 1 checks) -> opening"));
    assert!(text.contains("[FAIL] Step 1: step (saw opening)"));
    assert!(text.contains("=== Results: 1 passed, 1 failed (2 total) in 1.5s ==="));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["failed"], 1);
    assert_eq!(json["results"][0]["final_step"], "complete");
}

#[test]
fn empty_report_passes() {
    let report = SimulationReport::from_results("none", vec![]);
    assert!(report.all_passed());
    assert!(format_console_report(&report).ends_with("=== Results: 0 passed, 0 failed (0 total) ===\n"));
}

use crate::cli::config::{AppConfig, parse_numbers};
use crate::display::conditions::DisplayConditionEvaluator;
use crate::display::display_model::{DeviceClass, PageState, ScrollMetrics};
use crate::layout::position::{AnchorRect, Viewport, WidgetSize, place};
use crate::report::console::format_console_report;
use crate::report::report_model::SimulationReport;
use crate::scenario::runner::{ScenarioRunner, SubmitTarget, load_scenarios};
use crate::style::resolver::resolve_for;
use crate::trace::logger::TraceLogger;
use crate::widget::error::WidgetError;

// ============================================================================
// check subcommand
// ============================================================================

/// Print the display verdict for a page and return whether it is allowed.
pub fn cmd_check(
    config: &AppConfig,
    path: &str,
    scroll: ScrollMetrics,
    user_agent: &str,
    verbose: u8,
) -> bool {
    let device = DeviceClass::from_user_agent(user_agent);
    let page = PageState::new(path, scroll, device);
    let verdict = DisplayConditionEvaluator::new(&config.settings.effective_display_rules()).verdict(&page);

    if verbose > 0 {
        eprintln!(
            "Checking {} at {:.1}% scroll on {:?}",
            page.path, page.scroll_percent, page.device
        );
    }

    println!("excluded: {}", verdict.excluded);
    println!("scroll:   {}", if verdict.scroll_ok { "ok" } else { "below minimum" });
    println!("device:   {}", if verdict.device_ok { "ok" } else { "disabled" });
    println!("allowed:  {}", verdict.allowed());
    verdict.allowed()
}

// ============================================================================
// style subcommand
// ============================================================================

pub fn cmd_style(config: &AppConfig, prefers_dark: bool) -> Result<(), WidgetError> {
    let style = resolve_for(
        &config.settings.customization,
        &config.settings.brand.colors,
        prefers_dark,
    );
    let json = serde_json::to_string_pretty(&style).map_err(|source| WidgetError::Serialize {
        context: "style".into(),
        source,
    })?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// place subcommand
// ============================================================================

pub fn cmd_place(anchor: &str, viewport: &str, device: &str) -> Result<(), Box<dyn std::error::Error>> {
    let a = parse_numbers(anchor, 4).ok_or("--anchor expects top,left,width,height")?;
    let v = parse_numbers(viewport, 2).ok_or("--viewport expects width,height")?;

    let anchor = AnchorRect::new(a[0], a[1], a[2], a[3]);
    let viewport = Viewport::new(v[0], v[1]);
    let size = WidgetSize::for_device(DeviceClass::from(device.to_string()));

    let placement = place(&anchor, &viewport, &size);
    let json = serde_json::to_string_pretty(&placement).map_err(|source| WidgetError::Serialize {
        context: "placement".into(),
        source,
    })?;
    println!("{}", json);
    Ok(())
}

// ============================================================================
// simulate subcommand
// ============================================================================

/// Run scenario scripts and return whether all passed.
pub fn cmd_simulate(
    config: &AppConfig,
    scenario_path: &str,
    format: &str,
    webhook: Option<&str>,
    verbose: u8,
) -> Result<bool, WidgetError> {
    let scenarios = load_scenarios(scenario_path)?;

    if scenarios.is_empty() {
        eprintln!("No scenarios found at: {}", scenario_path);
        return Ok(true);
    }

    if verbose > 0 {
        eprintln!("Running {} scenarios...", scenarios.len());
    }

    let start = std::time::Instant::now();
    let mut results = Vec::new();
    for scenario in &scenarios {
        if verbose > 0 {
            eprintln!("  Running: {}", scenario.name);
        }
        let target = match webhook {
            Some(url) => SubmitTarget::Webhook(url.to_string()),
            None => SubmitTarget::default(),
        };
        let tracer = match &config.trace {
            Some(path) => TraceLogger::new(path),
            None => TraceLogger::disabled(),
        };
        results.push(ScenarioRunner::run(scenario, &config.settings, target, tracer));
    }

    let report = SimulationReport::from_results(scenario_path, results)
        .with_duration(start.elapsed().as_millis());
    let all_passed = report.all_passed();

    let output = match format {
        "json" => serde_json::to_string_pretty(&report).map_err(|source| WidgetError::Serialize {
            context: "simulation report".into(),
            source,
        })?,
        _ => format_console_report(&report),
    };
    print!("{}", output);
    if format == "json" {
        println!();
    }

    Ok(all_passed)
}

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use crate::{
    scenario::{
        host::ScriptedHost,
        scenario_model::{Expectation, ExpectationResult, Scenario, ScenarioResult, ScenarioStep},
    },
    settings::settings_model::WidgetSettings,
    trace::logger::TraceLogger,
    widget::{
        error::WidgetError,
        host::HostEvent,
        submit::{RecordingSubmitter, Submitter, WebhookSubmitter},
        widget::FeedbackWidget,
        widget_model::{MediaBlob, TestimonialSubmission, WidgetEvent},
    },
};

/// Where finished testimonials go during a run.
pub enum SubmitTarget {
    /// Keep them in memory
    Recording(RecordingSubmitter),

    /// POST them to a live endpoint
    Webhook(String),
}

impl Default for SubmitTarget {
    fn default() -> Self {
        SubmitTarget::Recording(RecordingSubmitter::new())
    }
}

/// Tracks progress and results of a running scenario.
#[derive(Debug, Default)]
struct ScenarioContext {
    current_step: usize,
    expectation_results: Vec<ExpectationResult>,
    rejected_steps: Vec<usize>,
}

impl ScenarioContext {
    fn record(&mut self, expectation: &Expectation, passed: bool, actual: String) {
        self.expectation_results.push(ExpectationResult {
            step_index: self.current_step,
            expectation: expectation.clone(),
            passed,
            actual: if passed { None } else { Some(actual) },
        });
    }

    fn all_passed(&self) -> bool {
        self.expectation_results.iter().all(|r| r.passed)
    }
}

/// Drives a `FeedbackWidget` on a `ScriptedHost` through a scenario.
pub struct ScenarioRunner;

impl ScenarioRunner {
    /// Run a scenario. `settings` is used unless the scenario carries its own.
    ///
    /// The widget is dropped at the end of the run and the host is checked
    /// for listeners, timers, capture sessions or object URLs left behind.
    pub fn run(
        scenario: &Scenario,
        settings: &WidgetSettings,
        target: SubmitTarget,
        tracer: TraceLogger,
    ) -> ScenarioResult {
        let settings = scenario.settings.as_ref().unwrap_or(settings);
        let host = ScriptedHost::new(scenario.page.clone());

        let recorder = match &target {
            SubmitTarget::Recording(r) => Some(r.clone()),
            SubmitTarget::Webhook(_) => None,
        };
        let delivered = Rc::new(Cell::new(0usize));
        let submitter = counting(target, delivered.clone());

        let mut ctx = ScenarioContext::default();
        let final_step;
        {
            let mut widget = FeedbackWidget::new(settings, host.clone(), submitter, scenario.options)
                .with_tracer(tracer);
            widget.mount();

            for (i, step) in scenario.steps.iter().enumerate() {
                ctx.current_step = i;
                let applied = Self::execute_step(step, &mut widget, &host, recorder.as_ref(), &delivered, &mut ctx);
                if !applied {
                    ctx.rejected_steps.push(i);
                }
            }
            final_step = widget.step();
        }

        let leaks = host.ledger().leaks();
        ScenarioResult {
            scenario_name: scenario.name.clone(),
            passed: ctx.all_passed() && leaks.is_empty(),
            steps_run: scenario.steps.len(),
            final_step,
            submissions: delivered.get(),
            rejected_steps: ctx.rejected_steps,
            expectation_results: ctx.expectation_results,
            leaks,
        }
    }

    /// Execute a single step. Returns `false` when the widget refused it.
    fn execute_step(
        step: &ScenarioStep,
        widget: &mut FeedbackWidget<ScriptedHost>,
        host: &ScriptedHost,
        recorder: Option<&RecordingSubmitter>,
        delivered: &Rc<Cell<usize>>,
        ctx: &mut ScenarioContext,
    ) -> bool {
        match step {
            ScenarioStep::Open => widget.open(),
            ScenarioStep::Tick => widget.dispatch(WidgetEvent::AnimationTick),
            ScenarioStep::SelectFormat { format } => widget.dispatch(WidgetEvent::SelectFormat(*format)),
            ScenarioStep::Rate { rating } => widget.dispatch(WidgetEvent::SetRating(*rating)),
            ScenarioStep::Text { text } => widget.dispatch(WidgetEvent::SetText(text.clone())),
            ScenarioStep::Field { id, value } => widget.dispatch(WidgetEvent::SetField {
                id: id.clone(),
                value: value.clone(),
            }),
            ScenarioStep::Consent { given } => widget.dispatch(WidgetEvent::SetConsent(*given)),
            ScenarioStep::NextQuestion => widget.dispatch(WidgetEvent::NextQuestion),
            ScenarioStep::PreviousQuestion => widget.dispatch(WidgetEvent::PreviousQuestion),
            ScenarioStep::Continue => widget.dispatch(WidgetEvent::Continue),

            ScenarioStep::Capture { mime_type, size_bytes } => {
                widget.media_captured(MediaBlob::declared(mime_type, *size_bytes))
            }

            ScenarioStep::Back => widget.dispatch(WidgetEvent::Back),
            ScenarioStep::Submit => widget.dispatch(WidgetEvent::Submit),
            ScenarioStep::Close => widget.close(),
            ScenarioStep::Reset => widget.dispatch(WidgetEvent::Reset),

            ScenarioStep::Scroll { scroll_y } => {
                host.set_scroll_y(*scroll_y);
                for id in host.listeners_for(HostEvent::Scroll) {
                    widget.handle_listener(id);
                }
                true
            }

            ScenarioStep::Resize { width, height } => {
                host.set_viewport(*width, *height);
                for id in host.listeners_for(HostEvent::Resize) {
                    widget.handle_listener(id);
                }
                true
            }

            ScenarioStep::Wait { ms } => {
                for timer in host.advance(*ms) {
                    widget.handle_timer(timer);
                }
                true
            }

            ScenarioStep::BusinessEvent { event } => {
                widget.notify_business_event(event);
                true
            }

            ScenarioStep::FailNextSubmit { reason } => match recorder {
                Some(r) => {
                    r.fail_next(reason);
                    true
                }
                None => {
                    eprintln!("Warning: fail_next_submit ignored when submitting to a webhook");
                    false
                }
            },

            ScenarioStep::Expect { expectations } => {
                for expectation in expectations {
                    let (passed, actual) = Self::evaluate(expectation, widget, delivered.get());
                    ctx.record(expectation, passed, actual);
                }
                true
            }
        }
    }

    /// Evaluate one expectation. Returns whether it held and what was seen.
    fn evaluate(
        expectation: &Expectation,
        widget: &FeedbackWidget<ScriptedHost>,
        delivered: usize,
    ) -> (bool, String) {
        let state = widget.state();
        match expectation {
            Expectation::Step { expected } => (state.step == *expected, state.step.to_string()),

            Expectation::ErrorPresent { field } => (
                state.errors.contains_key(field),
                format!("errors: {:?}", state.errors.keys().collect::<Vec<_>>()),
            ),

            Expectation::NoErrors => (
                state.errors.is_empty(),
                format!("errors: {:?}", state.errors),
            ),

            Expectation::SubmitErrorShown => (
                state.submit_error.is_some(),
                "no submit error".to_string(),
            ),

            Expectation::Submissions { expected } => (delivered == *expected, delivered.to_string()),

            Expectation::DisplayAllowed { expected } => {
                let actual = widget.display_allowed();
                (actual == *expected, format!("{:?}", widget.display_verdict()))
            }

            Expectation::TriggerPending { expected } => {
                let actual = widget.is_trigger_pending();
                (actual == *expected, actual.to_string())
            }

            Expectation::PanelSide { expected } => match widget.placement() {
                Some(p) => (p.side == *expected, format!("{:?}", p.side)),
                None => (false, "not placed".to_string()),
            },

            Expectation::IncentiveEligible { expected } => match widget.incentive_status() {
                Some(e) => (e.eligible == *expected, format!("{:?}", e.reasons)),
                None => (!*expected, "incentives disabled".to_string()),
            },

            Expectation::RewardShown { expected } => {
                let shown = widget.reward_offer().is_some();
                (shown == *expected, shown.to_string())
            }

            Expectation::Question { expected } => match widget.active_question() {
                Some(q) => (q == *expected, q),
                None => (false, "no question".to_string()),
            },
        }
    }
}

/// Wrap the target so successful deliveries are counted.
fn counting(target: SubmitTarget, delivered: Rc<Cell<usize>>) -> Box<dyn Submitter> {
    let mut inner: Box<dyn Submitter> = match target {
        SubmitTarget::Recording(r) => Box::new(r),
        SubmitTarget::Webhook(endpoint) => Box::new(WebhookSubmitter::new(&endpoint)),
    };

    Box::new(move |submission: &TestimonialSubmission| -> Result<(), WidgetError> {
        inner.submit(submission)?;
        delivered.set(delivered.get() + 1);
        Ok(())
    })
}

// ============================================================================
// Loading
// ============================================================================

/// Parse one scenario script.
pub fn parse_scenario(path: &str, content: &str) -> Result<Scenario, WidgetError> {
    serde_yaml::from_str(content).map_err(|source| WidgetError::ScenarioParse {
        path: path.to_string(),
        source,
    })
}

/// Load scenarios from a single YAML file or a directory of YAML files,
/// sorted by name.
pub fn load_scenarios(path: &str) -> Result<Vec<Scenario>, WidgetError> {
    let read_err = |p: &Path, source: std::io::Error| WidgetError::ConfigRead {
        path: p.display().to_string(),
        source,
    };

    let root = Path::new(path);
    let metadata = std::fs::metadata(root).map_err(|e| read_err(root, e))?;
    if !metadata.is_dir() {
        let content = std::fs::read_to_string(root).map_err(|e| read_err(root, e))?;
        return Ok(vec![parse_scenario(path, &content)?]);
    }

    let mut scenarios = Vec::new();
    for entry in std::fs::read_dir(root).map_err(|e| read_err(root, e))? {
        let p = entry.map_err(|e| read_err(root, e))?.path();
        if p.extension().is_some_and(|e| e == "yaml" || e == "yml") {
            let content = std::fs::read_to_string(&p).map_err(|e| read_err(&p, e))?;
            scenarios.push(parse_scenario(&p.display().to_string(), &content)?);
        }
    }
    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scenarios)
}

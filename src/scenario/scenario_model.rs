use serde::{Deserialize, Serialize};

use crate::{
    layout::position::PanelSide,
    scenario::host::PageFixture,
    settings::settings_model::{BusinessEvent, TestimonialFormat, WidgetSettings},
    widget::{widget::WidgetOptions, widget_model::WidgetStep},
};

/// A scripted visit: a page, optional settings, and what the visitor does.
/// Deserialized from YAML by `simulate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Human-readable name for this scenario
    pub name: String,

    #[serde(default)]
    pub page: PageFixture,

    /// Replaces the settings from the config file when present
    #[serde(default)]
    pub settings: Option<WidgetSettings>,

    #[serde(default)]
    pub options: WidgetOptions,

    /// Ordered visitor and page actions
    pub steps: Vec<ScenarioStep>,
}

/// One action in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Click the trigger button
    Open,

    /// Let the opening animation finish
    Tick,

    SelectFormat {
        format: TestimonialFormat,
    },

    Rate {
        rating: u8,
    },

    Text {
        text: String,
    },

    Field {
        id: String,
        value: String,
    },

    Consent {
        given: bool,
    },

    NextQuestion,
    PreviousQuestion,
    Continue,

    /// The recorder yields a clip of the given size
    Capture {
        mime_type: String,
        size_bytes: u64,
    },

    Back,
    Submit,
    Close,
    Reset,

    /// Scroll the page; scroll listeners fire
    Scroll {
        scroll_y: f64,
    },

    /// Resize the window; resize listeners fire
    Resize {
        width: f64,
        height: f64,
    },

    /// Advance the clock; due trigger timers fire
    Wait {
        ms: u64,
    },

    BusinessEvent {
        event: BusinessEvent,
    },

    /// The next submission attempt fails with `reason`
    FailNextSubmit {
        reason: String,
    },

    Expect {
        expectations: Vec<Expectation>,
    },
}

impl ScenarioStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioStep::Open => "open",
            ScenarioStep::Tick => "tick",
            ScenarioStep::SelectFormat { .. } => "select_format",
            ScenarioStep::Rate { .. } => "rate",
            ScenarioStep::Text { .. } => "text",
            ScenarioStep::Field { .. } => "field",
            ScenarioStep::Consent { .. } => "consent",
            ScenarioStep::NextQuestion => "next_question",
            ScenarioStep::PreviousQuestion => "previous_question",
            ScenarioStep::Continue => "continue",
            ScenarioStep::Capture { .. } => "capture",
            ScenarioStep::Back => "back",
            ScenarioStep::Submit => "submit",
            ScenarioStep::Close => "close",
            ScenarioStep::Reset => "reset",
            ScenarioStep::Scroll { .. } => "scroll",
            ScenarioStep::Resize { .. } => "resize",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::BusinessEvent { .. } => "business_event",
            ScenarioStep::FailNextSubmit { .. } => "fail_next_submit",
            ScenarioStep::Expect { .. } => "expect",
        }
    }
}

/// A check against the widget at some point in the scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    Step { expected: WidgetStep },

    /// A validation error is shown for `field`
    ErrorPresent { field: String },

    NoErrors,

    /// The submit-failure banner is shown
    SubmitErrorShown,

    /// Number of submissions that reached the submitter successfully
    Submissions { expected: usize },

    DisplayAllowed { expected: bool },

    TriggerPending { expected: bool },

    PanelSide { expected: PanelSide },

    IncentiveEligible { expected: bool },

    /// A reward code is revealed
    RewardShown { expected: bool },

    /// Text of the question currently shown
    Question { expected: String },
}

/// Result of evaluating one expectation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    /// Step the expectation belongs to (0-indexed)
    pub step_index: usize,

    pub expectation: Expectation,
    pub passed: bool,

    /// Observed value, for failed expectations
    pub actual: Option<String>,
}

/// Result of running one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,

    /// All expectations held and nothing leaked
    pub passed: bool,

    pub steps_run: usize,
    pub final_step: WidgetStep,
    pub submissions: usize,

    /// Indexes of steps the widget refused
    pub rejected_steps: Vec<usize>,

    pub expectation_results: Vec<ExpectationResult>,

    /// Host resources still held after the widget was dropped
    pub leaks: Vec<String>,
}

impl ScenarioResult {
    pub fn failed_expectations(&self) -> impl Iterator<Item = &ExpectationResult> {
        self.expectation_results.iter().filter(|r| !r.passed)
    }
}

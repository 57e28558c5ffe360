use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::style::style_model::{StylePreset, Theme};

pub const DEFAULT_PRIMARY_COLOR: &str = "#4361EE";
pub const DEFAULT_SECONDARY_COLOR: &str = "#3A0CA3";

// ============================================================================
// Testimonial formats
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialFormat {
    Text,
    Video,
    Audio,
    Image,
}

impl TestimonialFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestimonialFormat::Text => "text",
            TestimonialFormat::Video => "video",
            TestimonialFormat::Audio => "audio",
            TestimonialFormat::Image => "image",
        }
    }

    /// Formats other than text go through the recording step.
    pub fn needs_media(&self) -> bool {
        !matches!(self, TestimonialFormat::Text)
    }
}

impl fmt::Display for TestimonialFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable testimonial format as configured in the settings store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOption {
    #[serde(rename = "type")]
    pub format: TestimonialFormat,

    pub enabled: bool,

    /// Maximum captured media size in bytes
    #[serde(default)]
    pub max_size: Option<u64>,

    /// Maximum recording duration in seconds
    #[serde(default)]
    pub max_duration: Option<u32>,

    #[serde(default)]
    pub allow_uploads: bool,
}

// ============================================================================
// Widget customization
// ============================================================================

/// Corner of the host page the dormant trigger button is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl From<String> for WidgetPosition {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bottom-left" => WidgetPosition::BottomLeft,
            "top-right" => WidgetPosition::TopRight,
            "top-left" => WidgetPosition::TopLeft,
            _ => WidgetPosition::BottomRight,
        }
    }
}

impl From<WidgetPosition> for String {
    fn from(value: WidgetPosition) -> Self {
        match value {
            WidgetPosition::BottomRight => "bottom-right",
            WidgetPosition::BottomLeft => "bottom-left",
            WidgetPosition::TopRight => "top-right",
            WidgetPosition::TopLeft => "top-left",
        }
        .to_string()
    }
}

/// Presentation and collection options for one widget instance.
///
/// Owned by the settings store; the engine only ever reads a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetCustomization {
    pub style_preset: StylePreset,
    pub theme: Theme,
    pub position: WidgetPosition,

    pub widget_title: Option<String>,
    pub widget_description: Option<String>,
    pub thank_you_message: Option<String>,

    /// Attributes collected from the visitor (field ids such as `jobTitle`)
    pub fields: Vec<String>,
    pub required_fields: Vec<String>,

    pub require_consent: bool,
    pub consent_text: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub show_data_protection: bool,
    pub data_protection_text: Option<String>,

    pub questions: Vec<String>,

    pub mobile_enabled: bool,
    pub tablet_enabled: bool,
}

impl Default for WidgetCustomization {
    fn default() -> Self {
        Self {
            style_preset: StylePreset::default(),
            theme: Theme::default(),
            position: WidgetPosition::default(),
            widget_title: None,
            widget_description: None,
            thank_you_message: None,
            fields: default_fields(),
            required_fields: default_required_fields(),
            require_consent: false,
            consent_text: None,
            privacy_policy_url: None,
            show_data_protection: false,
            data_protection_text: None,
            questions: default_questions(),
            mobile_enabled: true,
            tablet_enabled: true,
        }
    }
}

impl WidgetCustomization {
    /// Questions shown in the text step, falling back to the stock prompts.
    pub fn questions(&self) -> Vec<String> {
        if self.questions.is_empty() {
            default_questions()
        } else {
            self.questions.clone()
        }
    }

    pub fn collected_fields(&self) -> Vec<String> {
        if self.fields.is_empty() {
            default_fields()
        } else {
            self.fields.clone()
        }
    }
}

fn default_fields() -> Vec<String> {
    vec!["name".into(), "email".into(), "company".into()]
}

fn default_required_fields() -> Vec<String> {
    vec!["name".into(), "email".into()]
}

fn default_questions() -> Vec<String> {
    vec![
        "What did you like most about our product/service?".into(),
        "How has it helped you or your business?".into(),
    ]
}

// ============================================================================
// Display rules and triggers
// ============================================================================

/// Gating conditions deciding whether the widget may appear at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayRules {
    /// Glob patterns (`*` only) matched against the full path
    pub excluded_pages: Vec<String>,

    /// When non-empty, the path must match one of these as well
    pub included_pages: Vec<String>,

    /// Minimum scroll percentage (0-100)
    pub min_scroll_depth: f64,

    pub mobile_enabled: bool,
    pub tablet_enabled: bool,
}

impl Default for DisplayRules {
    fn default() -> Self {
        Self {
            excluded_pages: Vec::new(),
            included_pages: Vec::new(),
            min_scroll_depth: 0.0,
            mobile_enabled: true,
            tablet_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BusinessEvent {
    PageVisit,
    PurchaseCompleted,
    ServiceCompleted,
    SupportInteraction,
    Other(String),
}

impl From<String> for BusinessEvent {
    fn from(value: String) -> Self {
        match value.as_str() {
            "page_visit" => BusinessEvent::PageVisit,
            "purchase_completed" => BusinessEvent::PurchaseCompleted,
            "service_completed" => BusinessEvent::ServiceCompleted,
            "support_interaction" => BusinessEvent::SupportInteraction,
            _ => BusinessEvent::Other(value),
        }
    }
}

impl From<BusinessEvent> for String {
    fn from(value: BusinessEvent) -> Self {
        match value {
            BusinessEvent::PageVisit => "page_visit".into(),
            BusinessEvent::PurchaseCompleted => "purchase_completed".into(),
            BusinessEvent::ServiceCompleted => "service_completed".into(),
            BusinessEvent::SupportInteraction => "support_interaction".into(),
            BusinessEvent::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DelayUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl DelayUnit {
    pub fn millis(&self) -> u64 {
        match self {
            DelayUnit::Seconds => 1_000,
            DelayUnit::Minutes => 60_000,
            DelayUnit::Hours => 3_600_000,
            DelayUnit::Days => 86_400_000,
        }
    }
}

impl From<String> for DelayUnit {
    fn from(value: String) -> Self {
        match value.as_str() {
            "seconds" => DelayUnit::Seconds,
            "minutes" => DelayUnit::Minutes,
            "hours" => DelayUnit::Hours,
            // Anything else counts in days, as the settings store always has.
            _ => DelayUnit::Days,
        }
    }
}

impl From<DelayUnit> for String {
    fn from(value: DelayUnit) -> Self {
        match value {
            DelayUnit::Seconds => "seconds",
            DelayUnit::Minutes => "minutes",
            DelayUnit::Hours => "hours",
            DelayUnit::Days => "days",
        }
        .to_string()
    }
}

/// A rule that auto-opens the dormant widget after a delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTriggerOption {
    #[serde(default)]
    pub id: Option<String>,

    pub business_event: BusinessEvent,

    pub enabled: bool,

    /// Numeric string, as stored by the settings editor
    pub delay: String,

    #[serde(default)]
    pub delay_unit: DelayUnit,
}

impl EnhancedTriggerOption {
    /// Delay in milliseconds, or `None` when the stored delay is not a number.
    pub fn delay_ms(&self) -> Option<u64> {
        let amount: u64 = self.delay.trim().parse().ok()?;
        amount.checked_mul(self.delay_unit.millis())
    }
}

// ============================================================================
// Incentives
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncentiveType {
    Discount,
    Credit,
    Feature,
    Gift,
    #[default]
    Other,
}

impl From<String> for IncentiveType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "discount" => IncentiveType::Discount,
            "credit" => IncentiveType::Credit,
            "feature" => IncentiveType::Feature,
            "gift" => IncentiveType::Gift,
            _ => IncentiveType::Other,
        }
    }
}

impl From<IncentiveType> for String {
    fn from(value: IncentiveType) -> Self {
        match value {
            IncentiveType::Discount => "discount",
            IncentiveType::Credit => "credit",
            IncentiveType::Feature => "feature",
            IncentiveType::Gift => "gift",
            IncentiveType::Other => "other",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MinimumQualification {
    pub minimum_rating: Option<u8>,
    pub minimum_length: Option<usize>,
    pub testimonial_type: Option<Vec<TestimonialFormat>>,
}

/// Optional reward offered for qualifying testimonials.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncentiveConfig {
    pub enabled: bool,

    #[serde(rename = "type")]
    pub kind: IncentiveType,

    /// Human-readable reward description
    pub value: String,

    pub code: Option<String>,
    pub expiry_days: Option<u32>,
    pub minimum_qualification: Option<MinimumQualification>,
}

// ============================================================================
// Brand
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_COLOR.into(),
            secondary: DEFAULT_SECONDARY_COLOR.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandData {
    pub name: String,
    pub logo: Option<String>,
    pub colors: BrandColors,
}

// ============================================================================
// Settings snapshot
// ============================================================================

/// Everything one widget instance reads from the settings and brand stores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetSettings {
    pub customization: WidgetCustomization,
    pub display_rules: DisplayRules,
    pub triggers: Vec<EnhancedTriggerOption>,
    pub incentives: Option<IncentiveConfig>,
    pub formats: Vec<FormatOption>,
    pub brand: BrandData,

    /// Known visitor attributes used to prefill the form (`name`, `email`, ...)
    pub customer_data: HashMap<String, String>,
}

impl WidgetSettings {
    /// Whether `format` may be chosen. An empty format list allows every format.
    pub fn format_enabled(&self, format: TestimonialFormat) -> bool {
        if self.formats.is_empty() {
            return true;
        }
        self.formats
            .iter()
            .any(|f| f.format == format && f.enabled)
    }

    pub fn format_option(&self, format: TestimonialFormat) -> Option<&FormatOption> {
        self.formats.iter().find(|f| f.format == format)
    }

    /// Display rules with the customization's device switches applied: a
    /// device class is shown only when both stores enable it.
    pub fn effective_display_rules(&self) -> DisplayRules {
        DisplayRules {
            mobile_enabled: self.display_rules.mobile_enabled && self.customization.mobile_enabled,
            tablet_enabled: self.display_rules.tablet_enabled && self.customization.tablet_enabled,
            ..self.display_rules.clone()
        }
    }
}

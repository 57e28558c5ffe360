use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{form::validator::ErrorMap, settings::settings_model::TestimonialFormat};

pub const MAX_RATING: u8 = 5;

pub const SUBMIT_FAILED_MESSAGE: &str =
    "We couldn't send your testimonial. Please try again.";

// ============================================================================
// Steps
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetStep {
    Closed,
    Opening,
    Open,
    Forms,
    Recording,
    Review,
    Complete,
}

impl fmt::Display for WidgetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WidgetStep::Closed => "closed",
            WidgetStep::Opening => "opening",
            WidgetStep::Open => "open",
            WidgetStep::Forms => "forms",
            WidgetStep::Recording => "recording",
            WidgetStep::Review => "review",
            WidgetStep::Complete => "complete",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Media
// ============================================================================

/// Raw capture output handed over by a recorder or image picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    pub mime_type: String,
    pub bytes: Vec<u8>,

    /// Size reported by a recorder that keeps the payload elsewhere
    pub declared_size: Option<u64>,
}

impl MediaBlob {
    pub fn new(mime_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            bytes,
            declared_size: None,
        }
    }

    /// A blob known only by type and size, with no payload in memory.
    pub fn declared(mime_type: &str, size_bytes: u64) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            bytes: Vec::new(),
            declared_size: Some(size_bytes),
        }
    }

    pub fn size(&self) -> u64 {
        self.declared_size.unwrap_or(self.bytes.len() as u64)
    }
}

/// Captured media attached to a draft, addressed by a temporary object URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRef {
    pub url: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

// ============================================================================
// Draft and submission
// ============================================================================

/// Uncommitted testimonial data accumulated across steps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestimonialDraft {
    pub format: Option<TestimonialFormat>,

    /// 0 means "not rated"
    pub rating: u8,

    pub text: String,
    pub media: Option<MediaRef>,
    pub user_fields: HashMap<String, String>,
    pub consent_given: bool,
}

impl TestimonialDraft {
    pub fn prefilled(customer_data: &HashMap<String, String>) -> Self {
        Self {
            user_fields: customer_data.clone(),
            ..Self::default()
        }
    }

    /// Format used for routing; an unset format means text.
    pub fn effective_format(&self) -> TestimonialFormat {
        self.format.unwrap_or(TestimonialFormat::Text)
    }
}

/// A finished testimonial handed to the host's submit function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialSubmission {
    /// SHA-1 over the submitted content, for deduplicating retries
    pub id: String,

    #[serde(rename = "type")]
    pub testimonial_type: TestimonialFormat,

    pub rating: u8,
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRef>,

    pub fields: BTreeMap<String, String>,
    pub consent_given: bool,
    pub incentive_eligible: bool,
}

impl TestimonialSubmission {
    pub fn from_draft(draft: &TestimonialDraft, incentive_eligible: bool) -> Self {
        let fields: BTreeMap<String, String> = draft
            .user_fields
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let testimonial_type = draft.effective_format();
        let mut submission = Self {
            id: String::new(),
            testimonial_type,
            rating: draft.rating,
            text: draft.text.trim().to_string(),
            media: draft.media.clone().filter(|_| testimonial_type.needs_media()),
            fields,
            consent_given: draft.consent_given,
            incentive_eligible,
        };
        submission.id = submission.fingerprint();
        submission
    }

    pub fn field(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(|v| v.as_str())
    }

    fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let mut hasher = Sha1::new();
        hasher.update(self.testimonial_type.as_str().as_bytes());
        hasher.update([self.rating]);
        hasher.update(self.text.as_bytes());
        if let Some(media) = &self.media {
            hasher.update(media.mime_type.as_bytes());
            hasher.update(media.size_bytes.to_le_bytes());
        }
        for (key, value) in &self.fields {
            hasher.update(key.as_bytes());
            hasher.update([0]);
            hasher.update(value.as_bytes());
            hasher.update([0]);
        }
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// Events, effects, state
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Trigger fired or visitor clicked the dormant button
    Open,
    AnimationTick,
    SelectFormat(TestimonialFormat),
    SetRating(u8),
    SetText(String),
    SetField { id: String, value: String },
    SetConsent(bool),
    NextQuestion,
    PreviousQuestion,
    Continue,
    MediaCaptured(MediaRef),
    Back,
    Submit,
    SubmitSucceeded,
    SubmitFailed(String),
    /// X button or overlay dismiss
    Close,
    Reset,
}

/// Side effects the driver performs after a transition, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CaptureAnchor,
    AttachViewportListeners,
    ReleaseViewportListeners,
    StartCapture(TestimonialFormat),
    StopCapture,
    RevokeMedia(String),
    InvokeSubmit(TestimonialSubmission),
    NotifyClose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    pub step: WidgetStep,
    pub draft: Option<TestimonialDraft>,
    pub errors: ErrorMap,
    pub is_submitting: bool,

    /// Retryable banner shown on the review step after a failed submit
    pub submit_error: Option<String>,

    pub active_question: usize,
}

impl WidgetState {
    pub fn closed() -> Self {
        Self {
            step: WidgetStep::Closed,
            draft: None,
            errors: ErrorMap::new(),
            is_submitting: false,
            submit_error: None,
            active_question: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.step != WidgetStep::Closed
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::closed()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: WidgetState,
    pub effects: Vec<Effect>,

    /// Why the event was not applied, if it was not
    pub rejection: Option<String>,
}

/// Caption for a star rating.
pub fn rating_description(rating: u8) -> &'static str {
    match rating {
        1 => "Very Dissatisfied",
        2 => "Dissatisfied",
        3 => "Neutral",
        4 => "Satisfied",
        5 => "Very Satisfied",
        _ => "",
    }
}

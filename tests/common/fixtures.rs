#![allow(dead_code)]

use widget_engine::{
    scenario::host::{PageFixture, ScriptedHost},
    settings::settings_model::{
        BusinessEvent, DelayUnit, EnhancedTriggerOption, FormatOption, IncentiveConfig,
        IncentiveType, MinimumQualification, TestimonialFormat, WidgetSettings,
    },
    widget::{
        submit::RecordingSubmitter,
        widget::{FeedbackWidget, WidgetOptions},
        widget_model::WidgetEvent,
    },
};

pub const IPHONE_UA: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
pub const IPAD_UA: &str =
    "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
pub const ANDROID_PHONE_UA: &str =
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36";
pub const ANDROID_TABLET_UA: &str =
    "Mozilla/5.0 (Linux; Android 14; SM-X710) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
pub const DESKTOP_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

pub const HAPPY_TEXT: &str = "Great product and service experience";

pub fn settings() -> WidgetSettings {
    WidgetSettings::default()
}

pub fn consent_settings() -> WidgetSettings {
    let mut settings = settings();
    settings.customization.require_consent = true;
    settings
}

pub fn trigger(event: BusinessEvent, delay: &str, unit: DelayUnit) -> EnhancedTriggerOption {
    EnhancedTriggerOption {
        id: None,
        business_event: event,
        enabled: true,
        delay: delay.to_string(),
        delay_unit: unit,
    }
}

pub fn format_option(format: TestimonialFormat, enabled: bool, max_size: Option<u64>) -> FormatOption {
    FormatOption {
        format,
        enabled,
        max_size,
        max_duration: None,
        allow_uploads: false,
    }
}

pub fn incentive(minimum_rating: u8, minimum_length: usize) -> IncentiveConfig {
    IncentiveConfig {
        enabled: true,
        kind: IncentiveType::Discount,
        value: "15% off your next order".into(),
        code: Some("THANKS15".into()),
        expiry_days: Some(30),
        minimum_qualification: Some(MinimumQualification {
            minimum_rating: Some(minimum_rating),
            minimum_length: Some(minimum_length),
            testimonial_type: None,
        }),
    }
}

pub fn page(path: &str) -> PageFixture {
    PageFixture {
        path: path.to_string(),
        ..PageFixture::default()
    }
}

/// A page 2000px tall in a 1000px viewport.
pub fn tall_page(path: &str, scroll_y: f64) -> PageFixture {
    PageFixture {
        path: path.to_string(),
        scroll_y,
        document_height: 2000.0,
        viewport_height: 1000.0,
        ..PageFixture::default()
    }
}

pub struct Harness {
    pub widget: FeedbackWidget<ScriptedHost>,
    pub host: ScriptedHost,
    pub submitter: RecordingSubmitter,
}

pub fn harness(settings: &WidgetSettings, page: PageFixture) -> Harness {
    harness_with(settings, page, WidgetOptions::default())
}

/// A mounted widget on a scripted host with a recording submitter.
pub fn harness_with(settings: &WidgetSettings, page: PageFixture, options: WidgetOptions) -> Harness {
    let host = ScriptedHost::new(page);
    let submitter = RecordingSubmitter::new();
    let mut widget = FeedbackWidget::new(settings, host.clone(), Box::new(submitter.clone()), options);
    widget.mount();
    Harness {
        widget,
        host,
        submitter,
    }
}

/// Open the widget and let the animation finish.
pub fn open(widget: &mut FeedbackWidget<ScriptedHost>) {
    assert!(widget.open());
    assert!(widget.dispatch(WidgetEvent::AnimationTick));
}

/// Drive a text testimonial all the way to the review step.
pub fn text_to_review(widget: &mut FeedbackWidget<ScriptedHost>) {
    open(widget);
    assert!(widget.dispatch(WidgetEvent::SetRating(5)));
    assert!(widget.dispatch(WidgetEvent::SelectFormat(TestimonialFormat::Text)));
    assert!(widget.dispatch(WidgetEvent::Continue));
    assert!(widget.dispatch(WidgetEvent::SetText(HAPPY_TEXT.into())));
    fill_contact(widget);
    assert!(widget.dispatch(WidgetEvent::Continue));
}

pub fn fill_contact(widget: &mut FeedbackWidget<ScriptedHost>) {
    assert!(widget.dispatch(WidgetEvent::SetField {
        id: "name".into(),
        value: "Ada Lovelace".into(),
    }));
    assert!(widget.dispatch(WidgetEvent::SetField {
        id: "email".into(),
        value: "ada@example.com".into(),
    }));
}

/// Drive a video testimonial to the recording step.
pub fn video_to_recording(widget: &mut FeedbackWidget<ScriptedHost>) {
    open(widget);
    assert!(widget.dispatch(WidgetEvent::SelectFormat(TestimonialFormat::Video)));
    assert!(widget.dispatch(WidgetEvent::Continue));
    fill_contact(widget);
    assert!(widget.dispatch(WidgetEvent::Continue));
}

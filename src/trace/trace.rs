use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::widget::widget_model::{Effect, WidgetEvent, WidgetStep};

/// One reducer transition, written as a JSON line.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub seq: u64,

    pub from_step: String,
    pub event: String,
    pub to_step: Option<String>,

    pub effects: Vec<String>,
    pub rejection: Option<String>,
}

impl TraceEvent {
    pub fn now(seq: u64, step: WidgetStep, event: &WidgetEvent) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            seq,
            from_step: step.to_string(),
            event: describe_event(event),
            to_step: None,
            effects: vec![],
            rejection: None,
        }
    }

    pub fn with_next_step(mut self, step: WidgetStep) -> Self {
        self.to_step = Some(step.to_string());
        self
    }

    pub fn with_effects(mut self, effects: &[Effect]) -> Self {
        self.effects = effects.iter().map(describe_effect).collect();
        self
    }

    pub fn with_rejection(mut self, reason: impl ToString) -> Self {
        self.rejection = Some(reason.to_string());
        self
    }
}

// Free text and media URLs stay out of the trace.
fn describe_event(event: &WidgetEvent) -> String {
    match event {
        WidgetEvent::SetText(text) => format!("SetText({} chars)", text.chars().count()),
        WidgetEvent::SetField { id, .. } => format!("SetField({})", id),
        WidgetEvent::MediaCaptured(media) => {
            format!("MediaCaptured({}, {} bytes)", media.mime_type, media.size_bytes)
        }
        other => format!("{:?}", other),
    }
}

fn describe_effect(effect: &Effect) -> String {
    match effect {
        Effect::RevokeMedia(_) => "RevokeMedia".into(),
        Effect::InvokeSubmit(submission) => format!("InvokeSubmit({})", submission.id),
        other => format!("{:?}", other),
    }
}

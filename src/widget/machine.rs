use crate::{
    form::{
        fields::{FieldSpec, field_specs},
        validator::{ErrorMap, validate},
    },
    incentive::eligibility::is_eligible,
    settings::settings_model::WidgetSettings,
    widget::widget_model::{
        Effect, MAX_RATING, MediaRef, SUBMIT_FAILED_MESSAGE, TestimonialDraft,
        TestimonialSubmission, Transition, WidgetEvent, WidgetState, WidgetStep,
    },
};

pub const CONSENT_REQUIRED_MESSAGE: &str = "You must give consent to continue";
pub const TEXT_REQUIRED_MESSAGE: &str = "Please share a few words about your experience";
pub const CHOICE_REQUIRED_MESSAGE: &str = "Choose a format or a rating to continue";

/// The widget's step logic as a pure reducer.
///
/// `reduce` never mutates its input and never performs I/O: anything that
/// touches the host page comes back as an `Effect` for the driver to run.
/// Every step legality rule lives here.
#[derive(Debug, Clone)]
pub struct WidgetMachine {
    settings: WidgetSettings,
    fields: Vec<FieldSpec>,
    question_count: usize,
}

impl WidgetMachine {
    pub fn new(settings: &WidgetSettings) -> Self {
        Self {
            settings: settings.clone(),
            fields: field_specs(&settings.customization.collected_fields()),
            question_count: settings.customization.questions().len(),
        }
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn initial_state(&self) -> WidgetState {
        WidgetState::closed()
    }

    pub fn reduce(&self, state: &WidgetState, event: WidgetEvent) -> Transition {
        let mut next = state.clone();
        let step = state.step;

        match event {
            WidgetEvent::Open => {
                if step != WidgetStep::Closed {
                    return reject(state, "already open");
                }
                next.step = WidgetStep::Opening;
                next.draft = Some(TestimonialDraft::prefilled(&self.settings.customer_data));
                accept(next, vec![Effect::CaptureAnchor, Effect::AttachViewportListeners])
            }

            WidgetEvent::AnimationTick => {
                if step != WidgetStep::Opening {
                    return reject(state, "not opening");
                }
                next.step = WidgetStep::Open;
                accept(next, vec![])
            }

            WidgetEvent::SelectFormat(format) => {
                if step != WidgetStep::Open {
                    return reject(state, "format can only be chosen on the open step");
                }
                if !self.settings.format_enabled(format) {
                    next.errors.insert(
                        "format".into(),
                        format!("{} testimonials are not available", format),
                    );
                    return Transition {
                        state: next,
                        effects: vec![],
                        rejection: Some(format!("format {} disabled", format)),
                    };
                }
                next.errors.remove("format");
                let draft = draft_mut(&mut next);
                let previous = draft.format.replace(format);

                // Media recorded for another format does not carry over.
                let mut effects = vec![];
                if previous != Some(format) {
                    if let Some(media) = draft.media.take() {
                        effects.push(Effect::RevokeMedia(media.url));
                    }
                }
                accept(next, effects)
            }

            WidgetEvent::SetRating(rating) => {
                if step != WidgetStep::Open {
                    return reject(state, "rating can only be set on the open step");
                }
                if rating > MAX_RATING {
                    return reject(state, "rating out of range");
                }
                next.errors.remove("format");
                draft_mut(&mut next).rating = rating;
                accept(next, vec![])
            }

            WidgetEvent::SetText(text) => {
                if step != WidgetStep::Forms {
                    return reject(state, "text can only be edited on the forms step");
                }
                next.errors.remove("text");
                draft_mut(&mut next).text = text;
                accept(next, vec![])
            }

            WidgetEvent::SetField { id, value } => {
                if !matches!(
                    step,
                    WidgetStep::Forms | WidgetStep::Recording | WidgetStep::Review
                ) {
                    return reject(state, "fields are not editable in this step");
                }
                next.errors.remove(&id);
                draft_mut(&mut next).user_fields.insert(id, value);
                accept(next, vec![])
            }

            WidgetEvent::SetConsent(given) => {
                if !matches!(
                    step,
                    WidgetStep::Forms | WidgetStep::Recording | WidgetStep::Review
                ) {
                    return reject(state, "consent is not editable in this step");
                }
                next.errors.remove("consent");
                draft_mut(&mut next).consent_given = given;
                accept(next, vec![])
            }

            WidgetEvent::NextQuestion => {
                if step != WidgetStep::Forms {
                    return reject(state, "questions are only shown on the forms step");
                }
                let last = self.question_count.saturating_sub(1);
                next.active_question = (state.active_question + 1).min(last);
                accept(next, vec![])
            }

            WidgetEvent::PreviousQuestion => {
                if step != WidgetStep::Forms {
                    return reject(state, "questions are only shown on the forms step");
                }
                next.active_question = state.active_question.saturating_sub(1);
                accept(next, vec![])
            }

            WidgetEvent::Continue => self.on_continue(state, next),

            WidgetEvent::MediaCaptured(media) => self.on_media(state, next, media),

            WidgetEvent::Back => self.on_back(state, next),

            WidgetEvent::Submit => self.on_submit(state, next),

            WidgetEvent::SubmitSucceeded => {
                if step != WidgetStep::Review || !state.is_submitting {
                    return reject(state, "no submission in flight");
                }
                next.is_submitting = false;
                next.submit_error = None;
                next.step = WidgetStep::Complete;
                accept(next, vec![])
            }

            WidgetEvent::SubmitFailed(reason) => {
                if step != WidgetStep::Review || !state.is_submitting {
                    return reject(state, "no submission in flight");
                }
                next.is_submitting = false;
                next.submit_error = Some(SUBMIT_FAILED_MESSAGE.into());
                Transition {
                    state: next,
                    effects: vec![],
                    rejection: Some(format!("submit failed: {}", reason)),
                }
            }

            WidgetEvent::Close => {
                if step == WidgetStep::Closed {
                    return reject(state, "already closed");
                }
                close(state)
            }

            WidgetEvent::Reset => {
                if step == WidgetStep::Closed {
                    return accept(WidgetState::closed(), vec![]);
                }
                close(state)
            }
        }
    }

    fn on_continue(&self, state: &WidgetState, mut next: WidgetState) -> Transition {
        let draft = current_draft(state);

        match state.step {
            WidgetStep::Open => {
                if draft.format.is_none() && draft.rating == 0 {
                    next.errors
                        .insert("format".into(), CHOICE_REQUIRED_MESSAGE.into());
                    return Transition {
                        state: next,
                        effects: vec![],
                        rejection: Some("nothing chosen".into()),
                    };
                }
                let d = draft_mut(&mut next);
                d.format = Some(d.effective_format());
                next.step = WidgetStep::Forms;
                accept(next, vec![])
            }

            WidgetStep::Forms => {
                let format = draft.effective_format();
                if format.needs_media() {
                    next.step = WidgetStep::Recording;
                    return accept(next, vec![Effect::StartCapture(format)]);
                }
                if draft.text.trim().is_empty() {
                    next.errors.insert("text".into(), TEXT_REQUIRED_MESSAGE.into());
                    return Transition {
                        state: next,
                        effects: vec![],
                        rejection: Some("text missing".into()),
                    };
                }
                next.step = WidgetStep::Review;
                accept(next, vec![])
            }

            WidgetStep::Recording => {
                if draft.media.is_none() {
                    return reject(state, "no media captured");
                }
                next.step = WidgetStep::Review;
                accept(next, vec![Effect::StopCapture])
            }

            _ => reject(state, "nothing to continue to"),
        }
    }

    fn on_media(&self, state: &WidgetState, mut next: WidgetState, media: MediaRef) -> Transition {
        if state.step != WidgetStep::Recording {
            return Transition {
                state: state.clone(),
                effects: vec![Effect::RevokeMedia(media.url)],
                rejection: Some("media arrived outside the recording step".into()),
            };
        }

        let format = current_draft(state).effective_format();
        let max_size = self
            .settings
            .format_option(format)
            .and_then(|option| option.max_size);

        if let Some(max) = max_size {
            if media.size_bytes > max {
                next.errors.insert(
                    "media".into(),
                    format!("File is too large (maximum {} bytes)", max),
                );
                return Transition {
                    state: next,
                    effects: vec![Effect::RevokeMedia(media.url)],
                    rejection: Some("media too large".into()),
                };
            }
        }

        let mut effects = vec![Effect::StopCapture];
        let d = draft_mut(&mut next);
        if let Some(previous) = d.media.replace(media) {
            effects.push(Effect::RevokeMedia(previous.url));
        }
        next.errors.remove("media");
        next.step = WidgetStep::Review;
        accept(next, effects)
    }

    fn on_back(&self, state: &WidgetState, mut next: WidgetState) -> Transition {
        match state.step {
            WidgetStep::Forms => {
                next.step = WidgetStep::Open;
                accept(next, vec![])
            }
            WidgetStep::Recording => {
                next.step = WidgetStep::Forms;
                accept(next, vec![Effect::StopCapture])
            }
            WidgetStep::Review => {
                if state.is_submitting {
                    return reject(state, "submission in flight");
                }
                let format = current_draft(state).effective_format();
                if format.needs_media() {
                    next.step = WidgetStep::Recording;
                    accept(next, vec![Effect::StartCapture(format)])
                } else {
                    next.step = WidgetStep::Forms;
                    accept(next, vec![])
                }
            }
            _ => reject(state, "no previous step"),
        }
    }

    fn on_submit(&self, state: &WidgetState, mut next: WidgetState) -> Transition {
        if state.step != WidgetStep::Review {
            return reject(state, "submit is only available on the review step");
        }
        if state.is_submitting {
            return reject(state, "submission already in flight");
        }

        let draft = current_draft(state);
        let errors = self.validate_draft(&draft);
        if !errors.is_empty() {
            next.errors = errors;
            return Transition {
                state: next,
                effects: vec![],
                rejection: Some("validation failed".into()),
            };
        }

        let eligible = self
            .settings
            .incentives
            .as_ref()
            .map(|config| is_eligible(config, &draft).eligible)
            .unwrap_or(false);

        let submission = TestimonialSubmission::from_draft(&draft, eligible);
        next.errors.clear();
        next.submit_error = None;
        next.is_submitting = true;
        accept(next, vec![Effect::InvokeSubmit(submission)])
    }

    /// Field and consent errors blocking the final submit.
    pub fn validate_draft(&self, draft: &TestimonialDraft) -> ErrorMap {
        let customization = &self.settings.customization;
        let mut errors = validate(
            &self.fields,
            &draft.user_fields,
            &customization.required_fields,
        );

        if customization.require_consent && !draft.consent_given {
            errors.insert("consent".into(), CONSENT_REQUIRED_MESSAGE.into());
        }
        errors
    }
}

fn accept(state: WidgetState, effects: Vec<Effect>) -> Transition {
    Transition {
        state,
        effects,
        rejection: None,
    }
}

fn reject(state: &WidgetState, reason: &str) -> Transition {
    Transition {
        state: state.clone(),
        effects: vec![],
        rejection: Some(reason.to_string()),
    }
}

/// Leave any open step for `closed`, releasing everything the flow holds.
fn close(state: &WidgetState) -> Transition {
    let mut effects = Vec::new();
    if state.step == WidgetStep::Recording {
        effects.push(Effect::StopCapture);
    }
    if let Some(media) = state.draft.as_ref().and_then(|d| d.media.as_ref()) {
        effects.push(Effect::RevokeMedia(media.url.clone()));
    }
    effects.push(Effect::ReleaseViewportListeners);
    effects.push(Effect::NotifyClose);

    accept(WidgetState::closed(), effects)
}

fn current_draft(state: &WidgetState) -> TestimonialDraft {
    state.draft.clone().unwrap_or_default()
}

fn draft_mut(state: &mut WidgetState) -> &mut TestimonialDraft {
    state.draft.get_or_insert_with(TestimonialDraft::default)
}

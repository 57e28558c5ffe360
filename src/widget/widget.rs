use serde::{Deserialize, Serialize};

use crate::{
    display::{
        conditions::DisplayConditionEvaluator, display_model::DisplayVerdict,
        trigger::TriggerScheduler,
    },
    form::fields::FieldSpec,
    incentive::eligibility::{Eligibility, RewardOffer, is_eligible, reward_offer},
    layout::position::{AnchorRect, WidgetPlacement, WidgetSize, anchor_for_corner, place},
    settings::settings_model::{BusinessEvent, WidgetSettings},
    style::{resolver::resolve_for, style_model::StyleConfig},
    trace::{logger::TraceLogger, trace::TraceEvent},
    widget::{
        host::{CaptureId, HostEvent, ListenerId, TimerId, WidgetHost},
        machine::WidgetMachine,
        submit::Submitter,
        widget_model::{
            Effect, MediaBlob, MediaRef, WidgetEvent, WidgetState, WidgetStep,
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetOptions {
    /// Authoring preview: display rules bypassed, no triggers, no geometry
    pub preview_mode: bool,

    /// Open as soon as the widget is mounted
    pub default_open: bool,
}

/// One embedded widget instance.
///
/// Runs the reducer and owns every host resource the flow acquires:
/// window listeners, trigger timers, the active capture session and media
/// object URLs. Each of them is released on every path back to `closed`
/// and again on `unmount`/drop.
pub struct FeedbackWidget<H: WidgetHost> {
    host: H,
    machine: WidgetMachine,
    state: WidgetState,
    submitter: Box<dyn Submitter>,
    options: WidgetOptions,

    evaluator: DisplayConditionEvaluator,
    scheduler: TriggerScheduler,
    display_allowed: bool,
    pending_trigger: bool,

    style: StyleConfig,
    anchor: Option<AnchorRect>,
    placement: Option<WidgetPlacement>,

    page_listeners: Vec<ListenerId>,
    viewport_listeners: Vec<ListenerId>,
    capture: Option<CaptureId>,

    tracer: TraceLogger,
    on_close: Option<Box<dyn FnMut()>>,
    mounted: bool,
    seq: u64,
}

impl<H: WidgetHost> FeedbackWidget<H> {
    pub fn new(
        settings: &WidgetSettings,
        host: H,
        submitter: Box<dyn Submitter>,
        options: WidgetOptions,
    ) -> Self {
        let style = resolve_for(
            &settings.customization,
            &settings.brand.colors,
            host.prefers_dark_scheme(),
        );
        let machine = WidgetMachine::new(settings);
        let state = machine.initial_state();

        Self {
            host,
            machine,
            state,
            submitter,
            options,
            evaluator: build_evaluator(settings, options),
            scheduler: TriggerScheduler::new(&settings.triggers),
            display_allowed: options.preview_mode,
            pending_trigger: false,
            style,
            anchor: None,
            placement: None,
            page_listeners: Vec::new(),
            viewport_listeners: Vec::new(),
            capture: None,
            tracer: TraceLogger::disabled(),
            on_close: None,
            mounted: false,
            seq: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// Callback run on every path back to `closed`.
    pub fn on_close(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Attach page listeners, evaluate display rules and arm triggers.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        if !self.options.preview_mode {
            self.page_listeners.push(self.host.subscribe(HostEvent::Scroll));
            self.page_listeners.push(self.host.subscribe(HostEvent::Resize));
            self.display_allowed = self.evaluator.evaluate(&self.host.page_state());
            self.scheduler.arm_on_mount(&mut self.host);
        }

        if self.options.default_open {
            self.dispatch(WidgetEvent::Open);
        }
    }

    /// Release everything the instance holds. Safe to call more than once.
    ///
    /// An open panel is closed first, so `on_close` runs for teardown too.
    pub fn unmount(&mut self) {
        if self.state.is_open() {
            self.dispatch(WidgetEvent::Close);
        }
        self.scheduler.disarm_all(&mut self.host);
        for id in self.page_listeners.drain(..) {
            self.host.unsubscribe(id);
        }
        self.release_flow_resources();
        self.state = self.machine.initial_state();
        self.pending_trigger = false;
        self.mounted = false;
    }

    /// Swap in a new settings snapshot. Style, rules and triggers are
    /// rebuilt; the current step and draft are kept.
    pub fn update_settings(&mut self, settings: &WidgetSettings) {
        self.machine = WidgetMachine::new(settings);
        self.style = resolve_for(
            &settings.customization,
            &settings.brand.colors,
            self.host.prefers_dark_scheme(),
        );
        self.evaluator = build_evaluator(settings, self.options);

        self.scheduler.disarm_all(&mut self.host);
        self.scheduler = TriggerScheduler::new(&settings.triggers);
        if self.mounted && !self.options.preview_mode {
            self.display_allowed = self.evaluator.evaluate(&self.host.page_state());
            self.scheduler.arm_on_mount(&mut self.host);
        }
        self.refresh_geometry();
    }

    // ------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------

    /// Feed one event through the reducer and run its effects.
    /// Returns `false` when the event was not applied.
    pub fn dispatch(&mut self, event: WidgetEvent) -> bool {
        let from = self.state.step;
        let mut trace = TraceEvent::now(self.seq, from, &event);
        self.seq += 1;

        let transition = self.machine.reduce(&self.state, event);
        trace = trace
            .with_next_step(transition.state.step)
            .with_effects(&transition.effects);
        let accepted = transition.rejection.is_none();
        if let Some(reason) = &transition.rejection {
            trace = trace.with_rejection(reason);
        }
        self.tracer.log(&trace);

        self.state = transition.state;
        for effect in transition.effects {
            self.apply(effect);
        }
        accepted
    }

    /// Visitor clicked the dormant trigger button.
    pub fn open(&mut self) -> bool {
        self.dispatch(WidgetEvent::Open)
    }

    /// Visitor dismissed the panel.
    pub fn close(&mut self) -> bool {
        self.dispatch(WidgetEvent::Close)
    }

    /// A window listener fired. The host is expected to debounce.
    ///
    /// Page listeners re-check the display rules; viewport listeners
    /// re-place the open panel. Callbacks for listeners already released
    /// are ignored.
    pub fn handle_listener(&mut self, listener: ListenerId) {
        if !self.mounted {
            return;
        }

        if self.page_listeners.contains(&listener) {
            self.display_allowed = self.evaluator.evaluate(&self.host.page_state());
            if self.display_allowed && self.pending_trigger && self.state.step == WidgetStep::Closed {
                self.pending_trigger = false;
                self.dispatch(WidgetEvent::Open);
            }
        } else if self.viewport_listeners.contains(&listener) {
            self.refresh_geometry();
        }
    }

    /// Timer callback for a trigger delay.
    pub fn handle_timer(&mut self, timer: TimerId) {
        if !self.mounted || self.scheduler.fire(timer).is_none() {
            return;
        }
        if self.state.step != WidgetStep::Closed {
            return;
        }

        self.display_allowed = self.evaluator.evaluate(&self.host.page_state());
        if self.display_allowed {
            self.dispatch(WidgetEvent::Open);
        } else {
            self.pending_trigger = true;
        }
    }

    /// The host observed a business event; arm the triggers waiting on it.
    pub fn notify_business_event(&mut self, event: &BusinessEvent) -> usize {
        if !self.mounted || self.options.preview_mode {
            return 0;
        }
        self.scheduler.arm_for(event, &mut self.host)
    }

    /// A capture component yielded its media.
    pub fn media_captured(&mut self, blob: MediaBlob) -> bool {
        if self.state.step != WidgetStep::Recording {
            eprintln!("Warning: media arrived while {}, discarding", self.state.step);
            return false;
        }

        let url = self.host.create_object_url(&blob);
        self.dispatch(WidgetEvent::MediaCaptured(MediaRef {
            url,
            mime_type: blob.mime_type.clone(),
            size_bytes: blob.size(),
        }))
    }

    // ------------------------------------------------------------------
    // Effects
    // ------------------------------------------------------------------

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CaptureAnchor => self.refresh_geometry(),

            Effect::AttachViewportListeners => {
                if !self.options.preview_mode && self.viewport_listeners.is_empty() {
                    self.viewport_listeners.push(self.host.subscribe(HostEvent::Resize));
                    self.viewport_listeners.push(self.host.subscribe(HostEvent::Scroll));
                }
            }

            Effect::ReleaseViewportListeners => {
                for id in self.viewport_listeners.drain(..) {
                    self.host.unsubscribe(id);
                }
                self.anchor = None;
                self.placement = None;
            }

            Effect::StartCapture(format) => {
                if self.capture.is_none() {
                    self.capture = self.host.start_capture(format);
                    if self.capture.is_none() {
                        eprintln!("Warning: no capture device available for {}", format);
                    }
                }
            }

            Effect::StopCapture => {
                if let Some(id) = self.capture.take() {
                    self.host.stop_capture(id);
                }
            }

            Effect::RevokeMedia(url) => self.host.revoke_object_url(&url),

            Effect::InvokeSubmit(submission) => {
                let event = match self.submitter.submit(&submission) {
                    Ok(()) => WidgetEvent::SubmitSucceeded,
                    Err(e) => WidgetEvent::SubmitFailed(e.to_string()),
                };
                self.dispatch(event);
            }

            Effect::NotifyClose => {
                if let Some(callback) = self.on_close.as_mut() {
                    callback();
                }
            }
        }
    }

    /// Re-measure the anchor and re-place the panel. Does nothing while the
    /// widget is closed or in preview, so late callbacks never touch a
    /// closed instance.
    fn refresh_geometry(&mut self) {
        if self.state.step == WidgetStep::Closed || self.options.preview_mode {
            return;
        }

        let viewport = self.host.viewport();
        let corner = self.machine.settings().customization.position;
        let anchor = self
            .host
            .anchor_rect()
            .unwrap_or_else(|| anchor_for_corner(corner, &viewport));
        let size = WidgetSize::for_device(self.host.page_state().device);

        self.anchor = Some(anchor);
        self.placement = Some(place(&anchor, &viewport, &size));
    }

    /// Release the per-flow resources without going through the reducer.
    fn release_flow_resources(&mut self) {
        if let Some(id) = self.capture.take() {
            self.host.stop_capture(id);
        }
        if let Some(media) = self.state.draft.as_ref().and_then(|d| d.media.clone()) {
            self.host.revoke_object_url(&media.url);
        }
        for id in self.viewport_listeners.drain(..) {
            self.host.unsubscribe(id);
        }
        self.anchor = None;
        self.placement = None;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn step(&self) -> WidgetStep {
        self.state.step
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn anchor(&self) -> Option<AnchorRect> {
        self.anchor
    }

    pub fn placement(&self) -> Option<WidgetPlacement> {
        self.placement
    }

    pub fn display_allowed(&self) -> bool {
        self.display_allowed
    }

    pub fn display_verdict(&self) -> DisplayVerdict {
        self.evaluator.verdict(&self.host.page_state())
    }

    pub fn is_trigger_pending(&self) -> bool {
        self.pending_trigger
    }

    pub fn armed_triggers(&self) -> usize {
        self.scheduler.armed_count()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        self.machine.fields()
    }

    /// Question currently shown on the forms step.
    pub fn active_question(&self) -> Option<String> {
        self.machine
            .settings()
            .customization
            .questions()
            .get(self.state.active_question)
            .cloned()
    }

    /// Incentive status for the current draft, so unmet requirements can be
    /// explained before the visitor submits.
    pub fn incentive_status(&self) -> Option<Eligibility> {
        let config = self.machine.settings().incentives.as_ref()?;
        if !config.enabled {
            return None;
        }
        let draft = self.state.draft.as_ref()?;
        Some(is_eligible(config, draft))
    }

    /// The reward to reveal on the completion step.
    pub fn reward_offer(&self) -> Option<RewardOffer> {
        if self.state.step != WidgetStep::Complete {
            return None;
        }
        let config = self.machine.settings().incentives.as_ref()?;
        if !config.enabled {
            return None;
        }
        reward_offer(config, self.state.draft.as_ref()?)
    }

    pub fn tracer(&self) -> &TraceLogger {
        &self.tracer
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: WidgetHost> Drop for FeedbackWidget<H> {
    fn drop(&mut self) {
        // Best-effort cleanup
        self.unmount();
    }
}

fn build_evaluator(settings: &WidgetSettings, options: WidgetOptions) -> DisplayConditionEvaluator {
    let rules = settings.effective_display_rules();
    if options.preview_mode {
        DisplayConditionEvaluator::preview(&rules)
    } else {
        DisplayConditionEvaluator::new(&rules)
    }
}

use crate::{
    display::display_model::PageState,
    layout::position::{AnchorRect, Viewport},
    settings::settings_model::TestimonialFormat,
    widget::widget_model::MediaBlob,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureId(pub u64);

/// Window events the widget subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    Resize,
    Scroll,
}

/// Capabilities the embedding page provides to the widget.
///
/// Everything the widget knows about the page, its timers and capture
/// devices comes through here, so the engine runs without a real DOM.
/// Every id handed out must eventually be handed back through the matching
/// release call.
pub trait WidgetHost {
    /// Current path, scroll depth and device class.
    fn page_state(&self) -> PageState;

    fn viewport(&self) -> Viewport;

    /// Bounds of the trigger control, if it can be measured.
    fn anchor_rect(&self) -> Option<AnchorRect>;

    /// Host OS colour-scheme preference, sampled once per style resolution.
    fn prefers_dark_scheme(&self) -> bool;

    fn subscribe(&mut self, event: HostEvent) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId);

    fn set_timer(&mut self, delay_ms: u64) -> TimerId;
    fn clear_timer(&mut self, id: TimerId);

    /// Start a recording session. `None` when no capture device is available.
    fn start_capture(&mut self, format: TestimonialFormat) -> Option<CaptureId>;
    fn stop_capture(&mut self, id: CaptureId);

    fn create_object_url(&mut self, blob: &MediaBlob) -> String;
    fn revoke_object_url(&mut self, url: &str);
}

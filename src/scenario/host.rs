use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    display::display_model::{DeviceClass, PageState, ScrollMetrics},
    layout::position::{AnchorRect, Viewport},
    settings::settings_model::TestimonialFormat,
    widget::{
        host::{CaptureId, HostEvent, ListenerId, TimerId, WidgetHost},
        widget_model::MediaBlob,
    },
};

/// Static description of the simulated page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageFixture {
    pub path: String,
    pub scroll_y: f64,
    pub document_height: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,

    /// Classified with the same heuristics a browser host would use
    pub user_agent: String,

    pub prefers_dark: bool,
    pub anchor: Option<AnchorRect>,

    /// `false` simulates a visitor without camera/microphone
    pub capture_available: bool,
}

impl Default for PageFixture {
    fn default() -> Self {
        Self {
            path: "/".into(),
            scroll_y: 0.0,
            document_height: 1000.0,
            viewport_width: 1280.0,
            viewport_height: 1000.0,
            user_agent: String::new(),
            prefers_dark: false,
            anchor: None,
            capture_available: true,
        }
    }
}

impl PageFixture {
    pub fn device(&self) -> DeviceClass {
        DeviceClass::from_user_agent(&self.user_agent)
    }
}

/// Everything the host has handed out and not yet had back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostLedger {
    pub listeners: BTreeMap<u64, HostEvent>,

    /// Timer id -> deadline in virtual milliseconds
    pub timers: BTreeMap<u64, u64>,

    pub captures: BTreeSet<u64>,
    pub object_urls: BTreeSet<String>,

    pub captures_started: usize,
    pub revoked_urls: Vec<String>,
}

impl HostLedger {
    /// Descriptions of resources still held.
    pub fn leaks(&self) -> Vec<String> {
        let mut leaks = Vec::new();
        if !self.listeners.is_empty() {
            leaks.push(format!("{} window listeners", self.listeners.len()));
        }
        if !self.timers.is_empty() {
            leaks.push(format!("{} timers", self.timers.len()));
        }
        if !self.captures.is_empty() {
            leaks.push(format!("{} capture sessions", self.captures.len()));
        }
        if !self.object_urls.is_empty() {
            leaks.push(format!("{} object URLs", self.object_urls.len()));
        }
        leaks
    }
}

#[derive(Debug, Default)]
struct HostInner {
    page: PageFixture,
    ledger: HostLedger,
    now_ms: u64,
    next_id: u64,
}

/// In-memory `WidgetHost` with a virtual clock.
///
/// Clones share state, so a test can keep a handle after moving the host
/// into a widget and still inspect what was acquired and released.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHost {
    inner: Rc<RefCell<HostInner>>,
}

impl ScriptedHost {
    pub fn new(page: PageFixture) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HostInner {
                page,
                ..HostInner::default()
            })),
        }
    }

    pub fn page(&self) -> PageFixture {
        self.inner.borrow().page.clone()
    }

    pub fn set_scroll_y(&self, scroll_y: f64) {
        self.inner.borrow_mut().page.scroll_y = scroll_y;
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        let mut inner = self.inner.borrow_mut();
        inner.page.viewport_width = width;
        inner.page.viewport_height = height;
    }

    pub fn set_anchor(&self, anchor: Option<AnchorRect>) {
        self.inner.borrow_mut().page.anchor = anchor;
    }

    pub fn set_path(&self, path: &str) {
        self.inner.borrow_mut().page.path = path.to_string();
    }

    pub fn ledger(&self) -> HostLedger {
        self.inner.borrow().ledger.clone()
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().now_ms
    }

    /// Listener ids currently subscribed to `event`, oldest first.
    pub fn listeners_for(&self, event: HostEvent) -> Vec<ListenerId> {
        self.inner
            .borrow()
            .ledger
            .listeners
            .iter()
            .filter(|(_, kind)| **kind == event)
            .map(|(id, _)| ListenerId(*id))
            .collect()
    }

    /// Move the clock forward and return the timers that came due, in
    /// deadline order. Due timers are removed as if the host had run them.
    pub fn advance(&self, ms: u64) -> Vec<TimerId> {
        let mut inner = self.inner.borrow_mut();
        inner.now_ms += ms;
        let now = inner.now_ms;

        let mut due: Vec<(u64, u64)> = inner
            .ledger
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();

        for (_, id) in &due {
            inner.ledger.timers.remove(id);
        }
        due.into_iter().map(|(_, id)| TimerId(id)).collect()
    }

    fn next_id(&self) -> u64 {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.next_id
    }
}

impl WidgetHost for ScriptedHost {
    fn page_state(&self) -> PageState {
        let inner = self.inner.borrow();
        let page = &inner.page;
        PageState::new(
            &page.path,
            ScrollMetrics {
                scroll_y: page.scroll_y,
                document_height: page.document_height,
                viewport_height: page.viewport_height,
            },
            page.device(),
        )
    }

    fn viewport(&self) -> Viewport {
        let inner = self.inner.borrow();
        Viewport::new(inner.page.viewport_width, inner.page.viewport_height)
    }

    fn anchor_rect(&self) -> Option<AnchorRect> {
        self.inner.borrow().page.anchor
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.inner.borrow().page.prefers_dark
    }

    fn subscribe(&mut self, event: HostEvent) -> ListenerId {
        let id = self.next_id();
        self.inner.borrow_mut().ledger.listeners.insert(id, event);
        ListenerId(id)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.inner.borrow_mut().ledger.listeners.remove(&id.0);
    }

    fn set_timer(&mut self, delay_ms: u64) -> TimerId {
        let id = self.next_id();
        let mut inner = self.inner.borrow_mut();
        let deadline = inner.now_ms.saturating_add(delay_ms);
        inner.ledger.timers.insert(id, deadline);
        TimerId(id)
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.inner.borrow_mut().ledger.timers.remove(&id.0);
    }

    fn start_capture(&mut self, _format: TestimonialFormat) -> Option<CaptureId> {
        if !self.inner.borrow().page.capture_available {
            return None;
        }
        let id = self.next_id();
        let mut inner = self.inner.borrow_mut();
        inner.ledger.captures.insert(id);
        inner.ledger.captures_started += 1;
        Some(CaptureId(id))
    }

    fn stop_capture(&mut self, id: CaptureId) {
        self.inner.borrow_mut().ledger.captures.remove(&id.0);
    }

    fn create_object_url(&mut self, blob: &MediaBlob) -> String {
        let id = self.next_id();
        let url = format!("blob:scripted/{}-{}", id, blob.mime_type.replace('/', "-"));
        self.inner.borrow_mut().ledger.object_urls.insert(url.clone());
        url
    }

    fn revoke_object_url(&mut self, url: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.ledger.object_urls.remove(url);
        inner.ledger.revoked_urls.push(url.to_string());
    }
}

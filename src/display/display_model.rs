use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Classify a user-agent string.
    ///
    /// iPads and Android devices without a "Mobile" token are tablets;
    /// iPhones, iPods and Android phones are mobile; everything else is
    /// desktop.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        let android = ua.contains("android");

        if ua.contains("ipad") || (android && !ua.contains("mobile")) {
            DeviceClass::Tablet
        } else if ua.contains("iphone") || ua.contains("ipod") || android {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

impl From<String> for DeviceClass {
    fn from(value: String) -> Self {
        match value.as_str() {
            "mobile" => DeviceClass::Mobile,
            "tablet" => DeviceClass::Tablet,
            _ => DeviceClass::Desktop,
        }
    }
}

/// Raw scroll measurements from the host page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Percentage of the scrollable range already scrolled (0-100).
    ///
    /// A page that fits in the viewport has nothing to scroll and counts as
    /// fully scrolled.
    pub fn percent(&self) -> f64 {
        let range = self.document_height - self.viewport_height;
        if !(range > 0.0) {
            return 100.0;
        }
        (self.scroll_y / range * 100.0).clamp(0.0, 100.0)
    }
}

/// Snapshot of the host page signals the display rules look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub path: String,

    /// Scroll depth as a percentage (0-100)
    pub scroll_percent: f64,

    pub device: DeviceClass,
}

impl PageState {
    pub fn new(path: &str, scroll: ScrollMetrics, device: DeviceClass) -> Self {
        Self {
            path: path.to_string(),
            scroll_percent: scroll.percent(),
            device,
        }
    }
}

/// Breakdown of a display decision, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayVerdict {
    pub excluded: bool,
    pub scroll_ok: bool,
    pub device_ok: bool,
}

impl DisplayVerdict {
    pub fn allowed(&self) -> bool {
        self.scroll_ok && self.device_ok && !self.excluded
    }
}

use serde::{Deserialize, Serialize};

use crate::{display::display_model::DeviceClass, settings::settings_model::WidgetPosition};

/// Minimum distance between the panel and the left/right viewport edges.
pub const EDGE_MARGIN: f64 = 20.0;

/// Gap between the trigger control and the panel.
pub const ANCHOR_GAP: f64 = 16.0;

/// Height the panel is assumed to need when deciding above/below.
pub const DEFAULT_WIDGET_HEIGHT: f64 = 500.0;

/// Dormant trigger button diameter.
pub const TRIGGER_BUTTON_SIZE: f64 = 56.0;

const CORNER_OFFSET: f64 = 24.0;
const TOP_CORNER_OFFSET: f64 = 96.0;

// ============================================================================
// Geometry
// ============================================================================

/// Trigger control bounds in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl AnchorRect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self { top, left, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetSize {
    pub width: f64,
    pub height: f64,
}

impl WidgetSize {
    /// Panel size used for each device class.
    pub fn for_device(device: DeviceClass) -> Self {
        let width = match device {
            DeviceClass::Mobile => 360.0,
            DeviceClass::Tablet => 400.0,
            DeviceClass::Desktop => 450.0,
        };
        Self {
            width,
            height: DEFAULT_WIDGET_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelSide {
    Below,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformOrigin {
    #[serde(rename = "top center")]
    TopCenter,
    #[serde(rename = "bottom center")]
    BottomCenter,
}

impl TransformOrigin {
    pub fn as_css(&self) -> &'static str {
        match self {
            TransformOrigin::TopCenter => "top center",
            TransformOrigin::BottomCenter => "bottom center",
        }
    }
}

/// Where the open panel goes, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetPlacement {
    pub top: f64,
    pub left: f64,

    /// Panel width after shrinking to fit between the edge margins
    pub width: f64,

    pub side: PanelSide,
    pub transform_origin: TransformOrigin,
}

// ============================================================================
// Placement
// ============================================================================

/// Place the panel relative to its trigger control.
///
/// Below the anchor when it fits, above otherwise. Horizontally centred on
/// the anchor, then clamped so the panel keeps `EDGE_MARGIN` from both
/// viewport edges. A panel wider than the viewport allows is narrowed.
pub fn place(anchor: &AnchorRect, viewport: &Viewport, size: &WidgetSize) -> WidgetPlacement {
    let fits_below = anchor.bottom() + size.height + ANCHOR_GAP < viewport.height;

    let (top, side, transform_origin) = if fits_below {
        (
            anchor.bottom() + ANCHOR_GAP,
            PanelSide::Below,
            TransformOrigin::TopCenter,
        )
    } else {
        (
            (anchor.top - ANCHOR_GAP - size.height).max(0.0),
            PanelSide::Above,
            TransformOrigin::BottomCenter,
        )
    };

    let usable = (viewport.width - 2.0 * EDGE_MARGIN).max(0.0);
    let width = size.width.max(0.0).min(usable);

    let max_left = viewport.width - EDGE_MARGIN - width;
    let centered = anchor.center_x() - width / 2.0;
    let left = centered.min(max_left).max(EDGE_MARGIN);

    WidgetPlacement {
        top,
        left,
        width,
        side,
        transform_origin,
    }
}

/// Geometry of the default round trigger button pinned to `corner`.
///
/// Used when the host cannot measure the real trigger control.
pub fn anchor_for_corner(corner: WidgetPosition, viewport: &Viewport) -> AnchorRect {
    let size = TRIGGER_BUTTON_SIZE;
    let right_left = viewport.width - CORNER_OFFSET - size;
    let bottom_top = viewport.height - CORNER_OFFSET - size;

    let (top, left) = match corner {
        WidgetPosition::BottomRight => (bottom_top, right_left),
        WidgetPosition::BottomLeft => (bottom_top, CORNER_OFFSET),
        WidgetPosition::TopRight => (TOP_CORNER_OFFSET, right_left),
        WidgetPosition::TopLeft => (TOP_CORNER_OFFSET, CORNER_OFFSET),
    };

    AnchorRect::new(top, left, size, size)
}

/// Positioning classes for the dormant trigger button.
pub fn corner_classes(corner: WidgetPosition) -> &'static str {
    match corner {
        WidgetPosition::BottomRight => "bottom-6 right-6",
        WidgetPosition::BottomLeft => "bottom-6 left-6",
        WidgetPosition::TopRight => "top-24 right-6",
        WidgetPosition::TopLeft => "top-24 left-6",
    }
}

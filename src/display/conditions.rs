use regex::Regex;

use crate::{
    display::display_model::{DeviceClass, DisplayVerdict, PageState},
    settings::settings_model::DisplayRules,
};

// ============================================================================
// Page patterns
// ============================================================================

/// Compile a page glob into an anchored regex.
///
/// `*` is the only wildcard and matches any run of characters, including
/// `/`. Every other character is literal. Returns `None` (with a warning)
/// if the pattern cannot be compiled.
pub fn compile_page_pattern(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    match Regex::new(&format!("^{}$", body)) {
        Ok(re) => Some(re),
        Err(e) => {
            eprintln!("Warning: ignoring page pattern '{}': {}", pattern, e);
            None
        }
    }
}

pub fn path_matches(pattern: &str, path: &str) -> bool {
    compile_page_pattern(pattern)
        .map(|re| re.is_match(path))
        .unwrap_or(false)
}

// ============================================================================
// Evaluator
// ============================================================================

/// Decides whether the widget may be shown on the current page.
///
/// Patterns are compiled once per rules snapshot; call `evaluate` on every
/// (debounced) scroll or resize.
#[derive(Debug, Clone)]
pub struct DisplayConditionEvaluator {
    rules: DisplayRules,
    excluded: Vec<Regex>,
    included: Vec<Regex>,
    preview: bool,
}

impl DisplayConditionEvaluator {
    pub fn new(rules: &DisplayRules) -> Self {
        Self {
            rules: rules.clone(),
            excluded: rules
                .excluded_pages
                .iter()
                .filter_map(|p| compile_page_pattern(p))
                .collect(),
            included: rules
                .included_pages
                .iter()
                .filter_map(|p| compile_page_pattern(p))
                .collect(),
            preview: false,
        }
    }

    /// Evaluator for preview/authoring mode: always allows display.
    pub fn preview(rules: &DisplayRules) -> Self {
        Self {
            preview: true,
            ..Self::new(rules)
        }
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn verdict(&self, page: &PageState) -> DisplayVerdict {
        if self.preview {
            return DisplayVerdict {
                excluded: false,
                scroll_ok: true,
                device_ok: true,
            };
        }

        let excluded = self.excluded.iter().any(|re| re.is_match(&page.path))
            || (!self.included.is_empty()
                && !self.included.iter().any(|re| re.is_match(&page.path)));

        let min_depth = self.rules.min_scroll_depth;
        let min_depth = if min_depth.is_finite() { min_depth.clamp(0.0, 100.0) } else { 0.0 };
        let scroll_ok = page.scroll_percent >= min_depth;

        let device_ok = match page.device {
            DeviceClass::Mobile => self.rules.mobile_enabled,
            DeviceClass::Tablet => self.rules.tablet_enabled,
            DeviceClass::Desktop => true,
        };

        DisplayVerdict {
            excluded,
            scroll_ok,
            device_ok,
        }
    }

    pub fn evaluate(&self, page: &PageState) -> bool {
        self.verdict(page).allowed()
    }
}

/// One-shot evaluation without keeping the compiled patterns around.
pub fn evaluate(rules: &DisplayRules, page: &PageState) -> bool {
    DisplayConditionEvaluator::new(rules).evaluate(page)
}

use widget_engine::{
    display::{
        conditions::{DisplayConditionEvaluator, compile_page_pattern, evaluate, path_matches},
        display_model::{DeviceClass, PageState, ScrollMetrics},
    },
    settings::settings_model::{DisplayRules, WidgetSettings},
};

use crate::common::fixtures::{
    ANDROID_PHONE_UA, ANDROID_TABLET_UA, DESKTOP_UA, IPAD_UA, IPHONE_UA,
};

mod common;

// =========================================================================
// Helpers
// =========================================================================

fn rules() -> DisplayRules {
    DisplayRules::default()
}

fn page_at(path: &str, scroll_y: f64) -> PageState {
    PageState::new(
        path,
        ScrollMetrics {
            scroll_y,
            document_height: 2000.0,
            viewport_height: 1000.0,
        },
        DeviceClass::Desktop,
    )
}

fn on_device(device: DeviceClass) -> PageState {
    PageState {
        device,
        ..page_at("/", 0.0)
    }
}

// =========================================================================
// Scroll gate
// =========================================================================

#[test]
fn scroll_below_minimum_suppresses() {
    let rules = DisplayRules {
        min_scroll_depth: 50.0,
        ..rules()
    };
    assert!(!evaluate(&rules, &page_at("/", 400.0)));
}

#[test]
fn scroll_past_minimum_allows() {
    let rules = DisplayRules {
        min_scroll_depth: 50.0,
        ..rules()
    };
    assert!(evaluate(&rules, &page_at("/", 600.0)));
}

#[test]
fn scroll_exactly_at_minimum_allows() {
    let rules = DisplayRules {
        min_scroll_depth: 50.0,
        ..rules()
    };
    assert!(evaluate(&rules, &page_at("/", 500.0)));
}

#[test]
fn page_shorter_than_viewport_counts_as_fully_scrolled() {
    let metrics = ScrollMetrics {
        scroll_y: 0.0,
        document_height: 800.0,
        viewport_height: 1000.0,
    };
    assert_eq!(metrics.percent(), 100.0);

    let equal = ScrollMetrics {
        scroll_y: 0.0,
        document_height: 1000.0,
        viewport_height: 1000.0,
    };
    assert_eq!(equal.percent(), 100.0);
}

#[test]
fn overscroll_is_clamped() {
    let metrics = ScrollMetrics {
        scroll_y: 5000.0,
        document_height: 2000.0,
        viewport_height: 1000.0,
    };
    assert_eq!(metrics.percent(), 100.0);

    let negative = ScrollMetrics {
        scroll_y: -50.0,
        ..metrics
    };
    assert_eq!(negative.percent(), 0.0);
}

#[test]
fn out_of_range_minimum_is_clamped() {
    let rules = DisplayRules {
        min_scroll_depth: 250.0,
        ..rules()
    };
    assert!(evaluate(&rules, &page_at("/", 1000.0)));
}

#[test]
fn non_finite_minimum_means_no_scroll_requirement() {
    for min in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let rules = DisplayRules {
            min_scroll_depth: min,
            ..rules()
        };
        assert!(evaluate(&rules, &page_at("/", 0.0)), "min {}", min);
    }
}

// =========================================================================
// Page globs
// =========================================================================

#[test]
fn excluded_glob_suppresses_nested_path() {
    let rules = DisplayRules {
        excluded_pages: vec!["/checkout/*".into()],
        ..rules()
    };
    assert!(!evaluate(&rules, &page_at("/checkout/step2", 1000.0)));
}

#[test]
fn excluded_glob_with_trailing_slash_matches_bare_slash() {
    assert!(path_matches("/checkout/*", "/checkout/"));
}

#[test]
fn excluded_glob_does_not_match_path_without_trailing_segment() {
    let rules = DisplayRules {
        excluded_pages: vec!["/checkout/*".into()],
        ..rules()
    };
    assert!(!path_matches("/checkout/*", "/checkout"));
    assert!(evaluate(&rules, &page_at("/checkout", 1000.0)));
}

#[test]
fn glob_is_anchored_to_full_path() {
    assert!(!path_matches("/checkout/*", "/shop/checkout/step2"));
    assert!(!path_matches("/about", "/about/team"));
    assert!(path_matches("/about", "/about"));
}

#[test]
fn glob_treats_regex_metacharacters_literally() {
    assert!(path_matches("/docs/v1.0/*", "/docs/v1.0/intro"));
    assert!(!path_matches("/docs/v1.0/*", "/docs/v1x0/intro"));
    assert!(path_matches("/search?q=*", "/search?q=widgets"));
}

#[test]
fn star_matches_across_segments() {
    assert!(path_matches("/blog/*/comments", "/blog/2024/05/comments"));
    assert!(path_matches("*", "/anything/at/all"));
}

#[test]
fn compiled_pattern_is_anchored() {
    let re = compile_page_pattern("/a/*").expect("pattern compiles");
    assert_eq!(re.as_str(), "^/a/.*$");
}

#[test]
fn included_pages_restrict_display() {
    let rules = DisplayRules {
        included_pages: vec!["/pricing".into(), "/product/*".into()],
        ..rules()
    };
    assert!(evaluate(&rules, &page_at("/pricing", 1000.0)));
    assert!(evaluate(&rules, &page_at("/product/42", 1000.0)));
    assert!(!evaluate(&rules, &page_at("/blog", 1000.0)));
}

#[test]
fn exclusion_wins_over_inclusion() {
    let rules = DisplayRules {
        included_pages: vec!["/product/*".into()],
        excluded_pages: vec!["/product/secret".into()],
        ..rules()
    };
    assert!(!evaluate(&rules, &page_at("/product/secret", 1000.0)));
}

// =========================================================================
// Devices
// =========================================================================

#[test]
fn user_agents_are_classified() {
    assert_eq!(DeviceClass::from_user_agent(IPHONE_UA), DeviceClass::Mobile);
    assert_eq!(DeviceClass::from_user_agent(ANDROID_PHONE_UA), DeviceClass::Mobile);
    assert_eq!(DeviceClass::from_user_agent(IPAD_UA), DeviceClass::Tablet);
    assert_eq!(DeviceClass::from_user_agent(ANDROID_TABLET_UA), DeviceClass::Tablet);
    assert_eq!(DeviceClass::from_user_agent(DESKTOP_UA), DeviceClass::Desktop);
    assert_eq!(DeviceClass::from_user_agent(""), DeviceClass::Desktop);
}

#[test]
fn disabled_device_classes_suppress() {
    let rules = DisplayRules {
        mobile_enabled: false,
        tablet_enabled: true,
        ..DisplayRules::default()
    };
    assert!(!evaluate(&rules, &on_device(DeviceClass::Mobile)));
    assert!(evaluate(&rules, &on_device(DeviceClass::Tablet)));
    assert!(evaluate(&rules, &on_device(DeviceClass::Desktop)));
}

#[test]
fn default_rules_allow_every_device() {
    let rules = DisplayRules::default();
    assert!(evaluate(&rules, &on_device(DeviceClass::Desktop)));
    assert!(evaluate(&rules, &on_device(DeviceClass::Mobile)));
    assert!(evaluate(&rules, &on_device(DeviceClass::Tablet)));
}

#[test]
fn partial_rules_block_keeps_devices_enabled() {
    let settings: WidgetSettings =
        serde_yaml::from_str("displayRules:\n  minScrollDepth: 25\n").unwrap();
    assert!(settings.display_rules.mobile_enabled);
    assert!(settings.display_rules.tablet_enabled);
    assert_eq!(settings.display_rules.min_scroll_depth, 25.0);
}

#[test]
fn customization_device_switches_also_apply() {
    let mut settings = WidgetSettings::default();
    settings.customization.tablet_enabled = false;
    let rules = settings.effective_display_rules();

    assert!(evaluate(&rules, &on_device(DeviceClass::Mobile)));
    assert!(!evaluate(&rules, &on_device(DeviceClass::Tablet)));

    settings.display_rules.mobile_enabled = false;
    settings.customization.tablet_enabled = true;
    let rules = settings.effective_display_rules();
    assert!(!evaluate(&rules, &on_device(DeviceClass::Mobile)));
    assert!(evaluate(&rules, &on_device(DeviceClass::Tablet)));
}

// =========================================================================
// Verdict and preview
// =========================================================================

#[test]
fn verdict_reports_each_failing_condition() {
    let rules = DisplayRules {
        excluded_pages: vec!["/admin/*".into()],
        min_scroll_depth: 90.0,
        mobile_enabled: false,
        ..DisplayRules::default()
    };
    let page = PageState {
        device: DeviceClass::Mobile,
        ..page_at("/admin/users", 0.0)
    };

    let verdict = DisplayConditionEvaluator::new(&rules).verdict(&page);
    assert!(verdict.excluded);
    assert!(!verdict.scroll_ok);
    assert!(!verdict.device_ok);
    assert!(!verdict.allowed());
}

#[test]
fn preview_evaluator_always_allows() {
    let rules = DisplayRules {
        excluded_pages: vec!["*".into()],
        min_scroll_depth: 100.0,
        ..DisplayRules::default()
    };
    let evaluator = DisplayConditionEvaluator::preview(&rules);
    assert!(evaluator.is_preview());
    assert!(evaluator.evaluate(&PageState {
        device: DeviceClass::Mobile,
        ..page_at("/anything", 0.0)
    }));
}

use crate::{
    settings::settings_model::{
        BrandColors, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR, WidgetCustomization,
    },
    style::style_model::{StyleConfig, StylePreset, Theme},
};

pub const ACCENT_COLOR: &str = "#32CD32";

// ============================================================================
// Style resolution
// ============================================================================

/// Resolve the full token set for a preset, theme and pair of brand colours.
///
/// Pure and total: every preset and theme yields a complete `StyleConfig`.
/// `os_prefers_dark` is the host colour-scheme preference sampled once by the
/// caller; it only matters for `Theme::Auto`.
pub fn resolve(
    preset: StylePreset,
    theme: Theme,
    primary_color: &str,
    secondary_color: &str,
    os_prefers_dark: bool,
) -> StyleConfig {
    let primary = color_or(primary_color, DEFAULT_PRIMARY_COLOR);
    let secondary = color_or(secondary_color, DEFAULT_SECONDARY_COLOR);
    let dark = theme.is_dark(os_prefers_dark);

    let base = base_config(preset, dark, primary, secondary);

    match preset {
        StylePreset::Minimal => base,

        StylePreset::Rounded => StyleConfig {
            widget_classes: "border border-gray-400 rounded-2xl".into(),
            input_classes: "border border-gray-200 dark:border-gray-700 rounded-lg".into(),
            box_shadow: "shadow-xl".into(),
            card_radius: "rounded-2xl".into(),
            ..base
        },

        StylePreset::Glassmorphism => StyleConfig {
            widget_classes: "rounded-2xl border border-gray-800/60 backdrop-blur-xl".into(),
            button_classes: "rounded-full backdrop-blur-md".into(),
            input_classes: "border border-white/20 rounded-lg backdrop-blur-sm".into(),
            box_shadow: "shadow-2xl".into(),
            background_color: pick(dark, "bg-black/60", "bg-white/60"),
            surface_color: pick(dark, "bg-black/40", "bg-white/40"),
            elevated_surface_color: pick(dark, "bg-black/30", "bg-white/30"),
            border_color: "border-white/20".into(),
            input_background_color: pick(dark, "bg-black/20", "bg-white/20"),
            ..base
        },

        StylePreset::Neumorphic => StyleConfig {
            widget_classes: "rounded-3xl border border-gray-300".into(),
            input_classes: "rounded-xl shadow-inner".into(),
            box_shadow: "shadow-[0_10px_40px_-15px_rgba(0,0,0,0.2)]".into(),
            background_color: pick(dark, "bg-gray-800", "bg-gray-50"),
            surface_color: pick(dark, "bg-gray-850", "bg-gray-100"),
            elevated_surface_color: pick(dark, "bg-gray-900", "bg-white"),
            card_radius: "rounded-2xl".into(),
            input_radius: "rounded-xl".into(),
            ..base
        },

        // Gradient paints its own surface, so text is light in both themes.
        StylePreset::Gradient => StyleConfig {
            widget_classes: "rounded-2xl border border-gray-500".into(),
            input_classes: "border-0 rounded-lg".into(),
            box_shadow: "shadow-2xl".into(),
            background_color: format!(
                "bg-gradient-to-br from-[{primary}] via-[{primary}] to-[{secondary}]"
            ),
            surface_color: "bg-white/10".into(),
            elevated_surface_color: "bg-white/20".into(),
            text_color: "text-white".into(),
            muted_text_color: "text-white/80".into(),
            border_color: "border-white/10".into(),
            input_background_color: "bg-white/10".into(),
            ..base
        },
    }
}

/// Resolve straight from the settings snapshot.
pub fn resolve_for(
    customization: &WidgetCustomization,
    colors: &BrandColors,
    os_prefers_dark: bool,
) -> StyleConfig {
    resolve(
        customization.style_preset,
        customization.theme,
        &colors.primary,
        &colors.secondary,
        os_prefers_dark,
    )
}

fn base_config(preset: StylePreset, dark: bool, primary: &str, secondary: &str) -> StyleConfig {
    StyleConfig {
        style_preset: preset,
        is_dark_theme: dark,
        primary_color: primary.to_string(),
        secondary_color: secondary.to_string(),
        accent_color: ACCENT_COLOR.into(),
        text_color: pick(dark, "text-white", "text-gray-900"),
        muted_text_color: pick(dark, "text-gray-300", "text-gray-600"),
        border_color: pick(dark, "border-gray-700", "border-gray-200"),
        background_color: pick(dark, "bg-gray-900", "bg-white"),
        input_background_color: pick(dark, "bg-gray-800", "bg-gray-50"),
        surface_color: pick(dark, "bg-gray-800", "bg-white"),
        elevated_surface_color: pick(dark, "bg-gray-850", "bg-gray-50"),
        widget_classes: "border rounded-xl".into(),
        button_classes: "rounded-full".into(),
        input_classes: "border rounded-lg".into(),
        box_shadow: "shadow-lg".into(),
        card_radius: "rounded-xl".into(),
        button_radius: "rounded-full".into(),
        input_radius: "rounded-lg".into(),
    }
}

fn pick(dark: bool, dark_value: &str, light_value: &str) -> String {
    if dark { dark_value } else { light_value }.to_string()
}

/// Use `value` if it is a `#rgb`, `#rrggbb` or `#rrggbbaa` colour, else `fallback`.
fn color_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    let Some(hex) = value.strip_prefix('#') else {
        return fallback;
    };

    let valid = matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if valid { value } else { fallback }
}

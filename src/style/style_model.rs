use serde::{Deserialize, Serialize};

/// Named bundle of visual tokens. Unknown names resolve to `Minimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StylePreset {
    #[default]
    Minimal,
    Rounded,
    Gradient,
    Glassmorphism,
    Neumorphic,
}

impl StylePreset {
    pub const ALL: [StylePreset; 5] = [
        StylePreset::Minimal,
        StylePreset::Rounded,
        StylePreset::Gradient,
        StylePreset::Glassmorphism,
        StylePreset::Neumorphic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StylePreset::Minimal => "minimal",
            StylePreset::Rounded => "rounded",
            StylePreset::Gradient => "gradient",
            StylePreset::Glassmorphism => "glassmorphism",
            StylePreset::Neumorphic => "neumorphic",
        }
    }
}

impl From<&str> for StylePreset {
    fn from(value: &str) -> Self {
        match value {
            // "modern" is the name older settings used for the rounded look
            "rounded" | "modern" => StylePreset::Rounded,
            "gradient" => StylePreset::Gradient,
            "glassmorphism" => StylePreset::Glassmorphism,
            "neumorphic" => StylePreset::Neumorphic,
            _ => StylePreset::Minimal,
        }
    }
}

impl From<String> for StylePreset {
    fn from(value: String) -> Self {
        StylePreset::from(value.as_str())
    }
}

impl From<StylePreset> for String {
    fn from(value: StylePreset) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the host OS colour-scheme preference
    Auto,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::Auto];

    /// Dark when explicitly dark, or auto on a host that prefers dark.
    pub fn is_dark(&self, os_prefers_dark: bool) -> bool {
        match self {
            Theme::Dark => true,
            Theme::Auto => os_prefers_dark,
            Theme::Light => false,
        }
    }
}

impl From<String> for Theme {
    fn from(value: String) -> Self {
        match value.as_str() {
            "dark" => Theme::Dark,
            "auto" => Theme::Auto,
            _ => Theme::Light,
        }
    }
}

impl From<Theme> for String {
    fn from(value: Theme) -> Self {
        match value {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Auto => "auto",
        }
        .to_string()
    }
}

/// Fully resolved presentation tokens for one render.
///
/// Every field is always populated; a `StyleConfig` is rebuilt whenever the
/// customization or brand colours change and is never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub style_preset: StylePreset,
    pub is_dark_theme: bool,

    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,

    pub text_color: String,
    pub muted_text_color: String,
    pub border_color: String,
    pub background_color: String,
    pub input_background_color: String,
    pub surface_color: String,
    pub elevated_surface_color: String,

    pub widget_classes: String,
    pub button_classes: String,
    pub input_classes: String,

    pub box_shadow: String,
    pub card_radius: String,
    pub button_radius: String,
    pub input_radius: String,
}

impl StyleConfig {
    /// Names of any tokens left empty. Always empty for resolver output.
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        let tokens: [(&'static str, &str); 18] = [
            ("primaryColor", &self.primary_color),
            ("secondaryColor", &self.secondary_color),
            ("accentColor", &self.accent_color),
            ("textColor", &self.text_color),
            ("mutedTextColor", &self.muted_text_color),
            ("borderColor", &self.border_color),
            ("backgroundColor", &self.background_color),
            ("inputBackgroundColor", &self.input_background_color),
            ("surfaceColor", &self.surface_color),
            ("elevatedSurfaceColor", &self.elevated_surface_color),
            ("widgetClasses", &self.widget_classes),
            ("buttonClasses", &self.button_classes),
            ("inputClasses", &self.input_classes),
            ("boxShadow", &self.box_shadow),
            ("cardRadius", &self.card_radius),
            ("buttonRadius", &self.button_radius),
            ("inputRadius", &self.input_radius),
            ("stylePreset", self.style_preset.as_str()),
        ];

        tokens
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }
}

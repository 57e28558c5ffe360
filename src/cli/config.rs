use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::{settings::settings_model::WidgetSettings, widget::error::WidgetError};

pub const DEFAULT_CONFIG_PATH: &str = "widget-engine.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "widget-engine",
    version,
    about = "Testimonial widget engine: display rules, styling, placement and scripted runs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: widget-engine.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate the display rules for a page
    Check {
        /// Page path, e.g. /pricing
        #[arg(long)]
        path: String,

        #[arg(long, default_value_t = 0.0)]
        scroll_y: f64,

        #[arg(long, default_value_t = 1000.0)]
        document_height: f64,

        #[arg(long, default_value_t = 1000.0)]
        viewport_height: f64,

        /// Visitor user agent; desktop when omitted
        #[arg(long, default_value = "")]
        user_agent: String,
    },

    /// Print the resolved style tokens as JSON
    Style {
        /// Simulate an OS dark colour-scheme preference
        #[arg(long)]
        prefers_dark: bool,
    },

    /// Compute the panel placement for an anchor
    Place {
        /// Anchor bounds: top,left,width,height
        #[arg(long)]
        anchor: String,

        /// Viewport size: width,height
        #[arg(long)]
        viewport: String,

        /// mobile, tablet or desktop
        #[arg(long, default_value = "desktop")]
        device: String,
    },

    /// Run scenario scripts through a widget on a scripted page
    Simulate {
        /// Scenario YAML file or directory of YAML files
        #[arg(long)]
        scenario: String,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// POST submissions to this URL instead of recording them
        #[arg(long)]
        webhook: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `widget-engine.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Settings snapshot the widget runs with
    #[serde(default)]
    pub settings: WidgetSettings,

    /// Write a JSONL transition trace here
    #[serde(default)]
    pub trace: Option<String>,
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Read and parse a config file.
pub fn read_config(path: &str) -> Result<AppConfig, WidgetError> {
    let content = std::fs::read_to_string(path).map_err(|source| WidgetError::ConfigRead {
        path: path.to_string(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| WidgetError::ConfigParse {
        path: path.to_string(),
        source,
    })
}

/// Load config from a YAML file. Missing file means defaults; a malformed
/// file is reported and also falls back to defaults.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match read_config(config_path) {
        Ok(config) => config,
        Err(WidgetError::ConfigRead { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound && path.is_none() =>
        {
            AppConfig::default()
        }
        Err(e) => {
            eprintln!("Warning: {}; using default settings", e);
            AppConfig::default()
        }
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

/// Parse a comma-separated list of exactly `n` numbers.
pub fn parse_numbers(raw: &str, n: usize) -> Option<Vec<f64>> {
    let values: Vec<f64> = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if values.len() == n { Some(values) } else { None }
}

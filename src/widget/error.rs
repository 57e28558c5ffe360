use std::fmt;

#[derive(Debug)]
pub enum WidgetError {
    /// Config or scenario file could not be read
    ConfigRead { path: String, source: std::io::Error },

    /// Config file is not valid YAML for the settings model
    ConfigParse { path: String, source: serde_yaml::Error },

    /// Scenario script is not valid YAML
    ScenarioParse { path: String, source: serde_yaml::Error },

    /// Serializing a submission or report failed
    Serialize { context: String, source: serde_json::Error },

    /// HTTP request to the submission endpoint failed
    Http { endpoint: String, source: reqwest::Error },

    /// Submission endpoint answered with a non-success status
    SubmitRejected { status: u16, body: String },

    /// Host-supplied submit function refused the testimonial
    Submit(String),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::ConfigRead { path, source } => {
                write!(f, "Failed to read {}: {}", path, source)
            }
            WidgetError::ConfigParse { path, source } => {
                write!(f, "Invalid widget config {}: {}", path, source)
            }
            WidgetError::ScenarioParse { path, source } => {
                write!(f, "Invalid scenario {}: {}", path, source)
            }
            WidgetError::Serialize { context, source } => {
                write!(f, "JSON serialize error ({}): {}", context, source)
            }
            WidgetError::Http { endpoint, source } => {
                write!(f, "Request to {} failed: {}", endpoint, source)
            }
            WidgetError::SubmitRejected { status, body } => {
                write!(f, "Submission rejected with status {}: {}", status, body)
            }
            WidgetError::Submit(msg) => {
                write!(f, "Submission failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::ConfigRead { source, .. } => Some(source),
            WidgetError::ConfigParse { source, .. } => Some(source),
            WidgetError::ScenarioParse { source, .. } => Some(source),
            WidgetError::Serialize { source, .. } => Some(source),
            WidgetError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}

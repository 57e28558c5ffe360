pub mod cli;
pub mod display;
pub mod form;
pub mod incentive;
pub mod layout;
pub mod report;
pub mod scenario;
pub mod settings;
pub mod style;
pub mod trace;
pub mod widget;

pub use settings::settings_model::WidgetSettings;
pub use widget::{
    error::WidgetError,
    host::WidgetHost,
    submit::{Submitter, WebhookSubmitter},
    widget::{FeedbackWidget, WidgetOptions},
};

pub mod error;
pub mod host;
pub mod machine;
pub mod submit;
pub mod widget;
pub mod widget_model;

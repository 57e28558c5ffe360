pub mod resolver;
pub mod style_model;

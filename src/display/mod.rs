pub mod conditions;
pub mod display_model;
pub mod trigger;

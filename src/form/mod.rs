pub mod fields;
pub mod validator;

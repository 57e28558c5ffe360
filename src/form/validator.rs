use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::form::fields::{FieldKind, FieldSpec};

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// Field id -> message. Empty means valid.
pub type ErrorMap = BTreeMap<String, String>;

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

pub fn is_valid_email(value: &str) -> bool {
    match email_pattern() {
        Some(re) => re.is_match(value.trim()),
        None => value.contains('@'),
    }
}

/// Validate collected values against their field specs.
///
/// Only ids present in `fields` are checked; `required` entries naming other
/// fields are ignored. Each field yields at most one message: a missing
/// required value wins over a malformed email.
pub fn validate(
    fields: &[FieldSpec],
    values: &HashMap<String, String>,
    required: &[String],
) -> ErrorMap {
    let mut errors = ErrorMap::new();

    for field in fields {
        let value = values.get(&field.id).map(|v| v.trim()).unwrap_or("");

        if value.is_empty() {
            if required.iter().any(|r| r == &field.id) {
                errors.insert(field.id.clone(), format!("{} is required", field.label));
            }
            continue;
        }

        if field.kind == FieldKind::Email && !is_valid_email(value) {
            errors.insert(field.id.clone(), INVALID_EMAIL_MESSAGE.to_string());
        }
    }

    errors
}

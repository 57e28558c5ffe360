use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Date,
    Number,
    Url,
}

impl FieldKind {
    /// Input type used for a collected attribute id.
    pub fn infer(field_id: &str) -> Self {
        match field_id {
            "email" => FieldKind::Email,
            "purchaseDate" | "customerSince" => FieldKind::Date,
            "age" => FieldKind::Number,
            "website" | "socialMedia" => FieldKind::Url,
            _ => FieldKind::Text,
        }
    }

    pub fn input_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Date => "date",
            FieldKind::Number => "number",
            FieldKind::Url => "url",
        }
    }
}

/// One visitor attribute the form collects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(id: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
        }
    }

    /// Build a spec from a bare field id, inferring label and input type.
    pub fn from_id(id: &str) -> Self {
        Self::new(id, &field_label(id), FieldKind::infer(id))
    }
}

/// Specs for a list of configured field ids, in order.
pub fn field_specs(ids: &[String]) -> Vec<FieldSpec> {
    ids.iter().map(|id| FieldSpec::from_id(id)).collect()
}

/// Human label for a camelCase field id (`jobTitle` -> "Job Title").
pub fn field_label(id: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in id.chars() {
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

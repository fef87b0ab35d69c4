use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::NormalizeError;

pub type RawRecord = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Boolean,
    Float64,
}

impl FieldType {
    fn describe(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
            FieldType::Float64 => "float64",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: true }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Boolean(bool),
    Float64(f64),
}

impl FieldValue {
    /// Textual form used by literal comparisons in availability rules.
    /// Booleans render as `true`/`false`, matching how upstream feeds compare
    /// boolean columns against string literals.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            FieldValue::Float64(f) => Cow::Owned(f.to_string()),
        }
    }
}

/// A record whose fields have been checked against a bookmaker schema.
/// Fields outside the schema are discarded; optional fields that were
/// absent or null are simply not present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    index: usize,
    fields: HashMap<&'static str, FieldValue>,
}

impl Record {
    /// Position of the record in its snapshot.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        match self.fields.get(field) {
            Some(FieldValue::Float64(f)) => Some(*f),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn validate(
        &self,
        bookmaker: &str,
        index: usize,
        raw: &RawRecord,
    ) -> Result<Record, NormalizeError> {
        let mut record = Record {
            index,
            ..Record::default()
        };

        for spec in &self.fields {
            let value = raw.get(spec.name);

            let typed = match (spec.ty, value) {
                (_, None) | (_, Some(Value::Null)) if !spec.required => continue,
                (FieldType::Text, Some(Value::String(s))) => FieldValue::Text(s.clone()),
                (FieldType::Boolean, Some(Value::Bool(b))) => FieldValue::Boolean(*b),
                (FieldType::Float64, Some(Value::Number(n))) => match n.as_f64() {
                    Some(f) => FieldValue::Float64(f),
                    None => return Err(violation(bookmaker, index, spec, value)),
                },
                _ => return Err(violation(bookmaker, index, spec, value)),
            };

            record.fields.insert(spec.name, typed);
        }

        Ok(record)
    }
}

fn violation(
    bookmaker: &str,
    index: usize,
    spec: &FieldSpec,
    value: Option<&Value>,
) -> NormalizeError {
    let found = value.map(json_type_name).unwrap_or("missing");

    NormalizeError::SchemaViolation {
        bookmaker: bookmaker.to_string(),
        record: index,
        field: spec.name.to_string(),
        expected: spec.ty.describe(),
        found: found.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

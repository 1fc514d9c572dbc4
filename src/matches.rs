//! Parse result: an immutable mapping from identifier to value.

use std::collections::HashMap;

use crate::error::ArgError;
use crate::value::Value;

/// Values resolved by one successful parse.
///
/// Iteration follows registration order. Every registered element has an
/// entry, including flags and options that never matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Matches {
    order: Vec<String>,
    values: HashMap<String, Value>,
    leftover: Vec<String>,
}

impl Matches {
    pub(crate) fn new(entries: Vec<(String, Value)>, leftover: Vec<String>) -> Self {
        let order = entries.iter().map(|(id, _)| id.clone()).collect();
        let values = entries.into_iter().collect();
        Self {
            order,
            values,
            leftover,
        }
    }

    /// Value resolved for `id`.
    pub fn get(&self, id: &str) -> Result<&Value, ArgError> {
        self.values.get(id).ok_or_else(|| ArgError::NotFound { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn get_str(&self, id: &str) -> Result<&str, ArgError> {
        let value = self.get(id)?;
        value.as_str().ok_or_else(|| mismatch(id, value, "string"))
    }

    pub fn get_bool(&self, id: &str) -> Result<bool, ArgError> {
        let value = self.get(id)?;
        value.as_bool().ok_or_else(|| mismatch(id, value, "bool"))
    }

    pub fn get_int(&self, id: &str) -> Result<i64, ArgError> {
        let value = self.get(id)?;
        value.as_int().ok_or_else(|| mismatch(id, value, "int"))
    }

    pub fn get_float(&self, id: &str) -> Result<f64, ArgError> {
        let value = self.get(id)?;
        value.as_float().ok_or_else(|| mismatch(id, value, "float"))
    }

    pub fn get_list(&self, id: &str) -> Result<&[Value], ArgError> {
        let value = self.get(id)?;
        value.as_list().ok_or_else(|| mismatch(id, value, "list"))
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.values.get(id).map(|v| (id.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tokens no element claimed, in input order.
    pub fn leftover(&self) -> &[String] {
        &self.leftover
    }

    /// `{"values": {...}, "leftover": [...]}`.
    pub fn to_json(&self) -> serde_json::Value {
        let values: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_json()))
            .collect();
        serde_json::json!({
            "values": values,
            "leftover": self.leftover,
        })
    }
}

fn mismatch(id: &str, value: &Value, expected: &str) -> ArgError {
    ArgError::InvalidType {
        id: id.to_string(),
        raw: value.to_string(),
        target: expected.to_string(),
    }
}

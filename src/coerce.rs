//! Coercion of raw tokens into typed values.
//!
//! Coercion is pure: it is called once per resolved value after an element
//! has decided which tokens it owns, never while scanning.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ArgError;
use crate::value::Value;

/// Constructor for a caller-registered type. Receives the raw token.
pub type Constructor = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Built-in primitive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Str,
    /// Comma-separated list of strings.
    List,
    /// Structured value, parsed as JSON.
    Json,
    /// Always null, whatever the input.
    Null,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Json => "json",
            ValueKind::Null => "null",
        }
    }

    /// Look up a kind by name. Accepts a few common spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" | "boolean" => Some(ValueKind::Bool),
            "int" | "integer" => Some(ValueKind::Int),
            "float" | "double" => Some(ValueKind::Float),
            "string" | "str" => Some(ValueKind::Str),
            "list" | "array" => Some(ValueKind::List),
            "json" | "object" => Some(ValueKind::Json),
            "null" => Some(ValueKind::Null),
            _ => None,
        }
    }
}

/// What a raw token is converted into.
#[derive(Clone, Default)]
pub enum Target {
    /// Pass the raw string through.
    #[default]
    Raw,
    Kind(ValueKind),
    /// A type from the parser's [`TypeRegistry`]; resolved at registration.
    Named {
        name: String,
        ctor: Option<Constructor>,
    },
}

impl Target {
    /// Unresolved reference to a registered type.
    pub fn named(name: impl Into<String>) -> Self {
        Target::Named {
            name: name.into(),
            ctor: None,
        }
    }

    /// Parse a type name as written in a definition file.
    pub fn from_name(name: &str) -> Self {
        if name == "raw" {
            return Target::Raw;
        }
        match ValueKind::from_name(name) {
            Some(kind) => Target::Kind(kind),
            None => Target::named(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Target::Raw => "raw",
            Target::Kind(kind) => kind.name(),
            Target::Named { name, .. } => name,
        }
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Raw => write!(f, "Raw"),
            Target::Kind(kind) => write!(f, "Kind({:?})", kind),
            Target::Named { name, ctor } => f
                .debug_struct("Named")
                .field("name", name)
                .field("resolved", &ctor.is_some())
                .finish(),
        }
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Target::Raw, Target::Raw) => true,
            (Target::Kind(a), Target::Kind(b)) => a == b,
            (Target::Named { name: a, .. }, Target::Named { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// Named constructible types known to a parser.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Constructor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, ctor: F)
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.types.insert(name.into(), Arc::new(ctor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Bind a named target to its constructor.
    ///
    /// Unknown names fail with `InvalidType` on behalf of element `id`.
    pub fn resolve(&self, id: &str, target: Target) -> Result<Target, ArgError> {
        match target {
            Target::Named { name, .. } => match self.types.get(&name) {
                Some(ctor) => Ok(Target::Named {
                    ctor: Some(Arc::clone(ctor)),
                    name,
                }),
                None => Err(ArgError::InvalidType {
                    id: id.to_string(),
                    raw: String::new(),
                    target: name,
                }),
            },
            other => Ok(other),
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.types.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

/// Convert `raw` into `target` on behalf of element `id`.
pub fn coerce(id: &str, raw: &str, target: &Target) -> Result<Value, ArgError> {
    let invalid = || ArgError::InvalidType {
        id: id.to_string(),
        raw: raw.to_string(),
        target: target.name().to_string(),
    };

    match target {
        Target::Raw | Target::Kind(ValueKind::Str) => Ok(Value::Str(raw.to_string())),
        Target::Kind(ValueKind::Bool) => parse_bool(raw).map(Value::Bool).ok_or_else(invalid),
        Target::Kind(ValueKind::Int) => {
            raw.trim().parse::<i64>().map(Value::Int).map_err(|_| invalid())
        }
        Target::Kind(ValueKind::Float) => {
            raw.trim().parse::<f64>().map(Value::Float).map_err(|_| invalid())
        }
        Target::Kind(ValueKind::List) => Ok(Value::List(
            split_list(raw).into_iter().map(Value::Str).collect(),
        )),
        Target::Kind(ValueKind::Json) => serde_json::from_str::<serde_json::Value>(raw)
            .map(Value::from_json)
            .map_err(|_| invalid()),
        Target::Kind(ValueKind::Null) => Ok(Value::Null),
        Target::Named { ctor: Some(ctor), .. } => ctor(raw).map_err(|reason| {
            tracing::debug!(
                "Constructor for '{}' rejected '{}': {}",
                target.name(),
                raw,
                reason
            );
            invalid()
        }),
        Target::Named { ctor: None, .. } => Err(invalid()),
    }
}

/// Split a comma-separated value, trimming each piece. Empty input yields no pieces.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|piece| piece.trim().to_string()).collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

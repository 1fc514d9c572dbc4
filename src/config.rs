//! Element definitions loaded from a TOML file.
//!
//! ```toml
//! strict = true
//!
//! [[elements]]
//! kind = "option"
//! id = "jobs"
//! alias = "j"
//! type = "int"
//! default = 4
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coerce::Target;
use crate::element::{Argument, Cardinality, Configure, Element, Flag, OptionArg};
use crate::error::ArgError;
use crate::parser::Parser;
use crate::value::Value;

/// Errors that can occur when loading a definition file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read definition file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse definition file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Definition validation failed: {message}")]
    ValidationError { message: String },

    #[error(transparent)]
    Arg(#[from] ArgError),
}

/// Root of a definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Reject option-like tokens no element claims.
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub elements: Vec<ElementDef>,
}

/// Element variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Argument,
    Flag,
    Option,
}

/// Cardinality as written: an integer or `"unlimited"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardinalityDef {
    Count(usize),
    Keyword(String),
}

/// One element definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDef {
    pub kind: ElementKind,
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub cardinality: Option<CardinalityDef>,
    #[serde(default)]
    pub minimum: Option<usize>,
    /// Built-in kind name or a type registered on the parser.
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Scalar, or an array for a per-slot default.
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub help: Option<String>,
}

impl ParserConfig {
    /// Default location of the definition file.
    ///
    /// Uses `~/.config/argweave/definition.toml` on Unix/macOS,
    /// or the equivalent from `dirs::config_dir()`.
    pub fn definition_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("argweave").join("definition.toml")
    }

    /// Load from the default location; a missing file yields an empty definition.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::definition_path();
        if !path.exists() {
            tracing::debug!("No definition file at {}", path.display());
            return Ok(ParserConfig::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        tracing::debug!(
            "Loaded {} element definitions from {}",
            config.elements.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<string>"),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that do not need a parser:
    /// - positional arguments carry no alias or minimum
    /// - cardinality keywords are known
    pub fn validate(&self) -> Result<(), ConfigError> {
        for def in &self.elements {
            if def.kind == ElementKind::Argument
                && (def.alias.is_some() || !def.aliases.is_empty() || def.minimum.is_some())
            {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Positional argument '{}' cannot have aliases or a minimum",
                        def.id
                    ),
                });
            }
            def.cardinality()?;
        }
        Ok(())
    }

    /// Register every definition on `parser`, in file order.
    ///
    /// Named types must already be registered on `parser`.
    pub fn into_parser(self, parser: Parser) -> Result<Parser, ConfigError> {
        let strict = parser.is_strict() || self.strict;
        let mut parser = parser.strict(strict);
        for def in self.elements {
            parser.register(def.into_element()?)?;
        }
        Ok(parser)
    }
}

impl ElementDef {
    fn cardinality(&self) -> Result<Option<Cardinality>, ConfigError> {
        match &self.cardinality {
            None => Ok(None),
            Some(CardinalityDef::Count(0)) => Ok(Some(Cardinality::Zero)),
            Some(CardinalityDef::Count(n)) => Ok(Some(Cardinality::Exact(*n))),
            Some(CardinalityDef::Keyword(k)) if k == "unlimited" || k == "*" => {
                Ok(Some(Cardinality::Unlimited))
            }
            Some(CardinalityDef::Keyword(k)) => Err(ConfigError::ValidationError {
                message: format!("Unknown cardinality '{}' for '{}'", k, self.id),
            }),
        }
    }

    pub fn into_element(self) -> Result<Element, ConfigError> {
        let cardinality = self.cardinality()?;
        // Arrays are per-slot defaults only where there is more than one slot.
        let per_slot = !matches!(cardinality, None | Some(Cardinality::Exact(1)));

        let element = match self.kind {
            ElementKind::Argument => {
                let mut arg = Argument::new(self.id);
                if let Some(c) = cardinality {
                    arg = arg.with_cardinality(c);
                }
                let arg = apply_common(arg, self.type_name, self.default, self.help, per_slot);
                Element::from(arg)
            }
            ElementKind::Flag => {
                let mut flag = Flag::new(self.id).aliases(self.aliases);
                if let Some(alias) = self.alias {
                    flag = flag.alias(alias);
                }
                let flag = apply_common(flag, self.type_name, self.default, self.help, true);
                Element::from(flag)
            }
            ElementKind::Option => {
                let mut opt = OptionArg::new(self.id).aliases(self.aliases);
                if let Some(alias) = self.alias {
                    opt = opt.alias(alias);
                }
                if let Some(c) = cardinality {
                    opt = opt.with_cardinality(c);
                }
                if let Some(min) = self.minimum {
                    opt = opt.with_minimum(min);
                }
                let opt = apply_common(opt, self.type_name, self.default, self.help, per_slot);
                Element::from(opt)
            }
        };
        Ok(element)
    }
}

fn apply_common<E: Configure>(
    mut element: E,
    type_name: Option<String>,
    default: Option<toml::Value>,
    help: Option<String>,
    per_slot: bool,
) -> E {
    if let Some(name) = type_name {
        element = element.coerce_to(Target::from_name(&name));
    }
    match default.map(toml_to_value) {
        Some(Value::List(items)) if per_slot => element = element.with_default_slots(items),
        Some(value) => element = element.with_default(value),
        None => {}
    }
    if let Some(text) = help {
        element = element.help(text);
    }
    element
}

/// Map a TOML value onto an element value.
pub fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Map(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_value(v)))
                .collect(),
        ),
    }
}

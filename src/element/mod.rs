//! Element definitions: positional arguments, flags and options.
//!
//! Each variant owns its identifier, cardinality, default policy, coercion
//! target and pipeline, and claims tokens through [`Consume::consume`].
//! Builder methods shared by all variants live on [`Configure`].

mod argument;
mod flag;
mod option;

pub use argument::Argument;
pub use flag::{Action, Flag};
pub use option::OptionArg;

use std::fmt;
use std::sync::Arc;

use crate::coerce::{coerce, Target, TypeRegistry, ValueKind};
use crate::error::ArgError;
use crate::pipeline::Pipeline;
use crate::tokens::TokenBuffer;
use crate::value::Value;

/// How many token-values an element consumes when matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Presence only (flags).
    Zero,
    /// Exactly `n` values, `n >= 1`.
    Exact(usize),
    Unlimited,
}

impl Cardinality {
    /// Value count for finite cardinalities.
    pub fn finite(self) -> Option<usize> {
        match self {
            Cardinality::Zero => Some(0),
            Cardinality::Exact(n) => Some(n),
            Cardinality::Unlimited => None,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Zero => write!(f, "0"),
            Cardinality::Exact(n) => write!(f, "{}", n),
            Cardinality::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Fallback used when an element reads nothing from the buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Scalar(Value),
    /// One value per slot; length must equal a finite cardinality.
    Slots(Vec<Value>),
}

impl DefaultValue {
    /// The default as a single value (slots become a list).
    pub fn to_value(&self) -> Value {
        match self {
            DefaultValue::Scalar(v) => v.clone(),
            DefaultValue::Slots(items) => Value::List(items.clone()),
        }
    }

    /// Default for slot `index`; scalars repeat.
    pub fn slot(&self, index: usize) -> Value {
        match self {
            DefaultValue::Scalar(v) => v.clone(),
            DefaultValue::Slots(items) => items.get(index).cloned().unwrap_or_default(),
        }
    }
}

/// State shared by every element variant.
#[derive(Debug, Clone)]
pub struct Common {
    id: String,
    help: Option<String>,
    default: Option<DefaultValue>,
    target: Target,
    pipeline: Pipeline,
}

impl Common {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            help: None,
            default: None,
            target: Target::Raw,
            pipeline: Pipeline::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Coerce a consumed token and run it through the pipeline.
    pub(crate) fn resolve(&self, raw: &str) -> Result<Value, ArgError> {
        self.resolve_as(raw, &self.target)
    }

    pub(crate) fn resolve_as(&self, raw: &str, target: &Target) -> Result<Value, ArgError> {
        let value = coerce(&self.id, raw, target)?;
        self.pipeline.apply(&self.id, value)
    }

    pub(crate) fn resolve_all(&self, raws: &[String]) -> Result<Vec<Value>, ArgError> {
        raws.iter().map(|raw| self.resolve(raw)).collect()
    }

    /// Registration-time checks common to every variant.
    fn check(&self, cardinality: Cardinality) -> Result<(), ArgError> {
        if self.id.is_empty() {
            return Err(ArgError::config(&self.id, "identifier must not be empty"));
        }
        if self.id.starts_with('-') {
            return Err(ArgError::config(
                &self.id,
                "identifier must not start with '-'",
            ));
        }
        if let Cardinality::Exact(0) = cardinality {
            return Err(ArgError::config(
                &self.id,
                "exact cardinality must be at least 1",
            ));
        }
        if let Some(DefaultValue::Slots(items)) = &self.default {
            match cardinality {
                Cardinality::Exact(1) => {
                    return Err(ArgError::config(
                        &self.id,
                        "a single-value element takes a scalar default, not slots",
                    ));
                }
                Cardinality::Exact(n) if items.len() != n => {
                    return Err(ArgError::config(
                        &self.id,
                        format!(
                            "default has {} slots but cardinality is {}",
                            items.len(),
                            n
                        ),
                    ));
                }
                Cardinality::Zero => {
                    return Err(ArgError::config(
                        &self.id,
                        "a per-slot default needs a cardinality of at least 1",
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Builder methods and accessors shared by all element variants.
pub trait Configure: Sized {
    fn common(&self) -> &Common;
    fn common_mut(&mut self) -> &mut Common;

    /// Help text, for display only.
    fn help(mut self, text: impl Into<String>) -> Self {
        self.common_mut().help = Some(text.into());
        self
    }

    /// Scalar default, used as-is when nothing is read.
    fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.common_mut().default = Some(DefaultValue::Scalar(value.into()));
        self
    }

    /// Per-slot default for multi-value elements.
    fn with_default_slots<V: Into<Value>>(mut self, values: Vec<V>) -> Self {
        self.common_mut().default = Some(DefaultValue::Slots(
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    fn coerce_to(mut self, target: Target) -> Self {
        self.common_mut().target = target;
        self
    }

    fn kind(self, kind: ValueKind) -> Self {
        self.coerce_to(Target::Kind(kind))
    }

    /// Coerce through a type registered on the parser under `name`.
    fn typed(self, name: impl Into<String>) -> Self {
        self.coerce_to(Target::named(name))
    }

    fn validate_with<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.common_mut().pipeline.set_validator(Arc::new(validator));
        self
    }

    /// Append a transform; transforms run in the order they were added.
    fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.common_mut().pipeline.push_transform(Arc::new(transform));
        self
    }
}

/// The capability every element exposes to the parser.
pub trait Consume {
    fn identifier(&self) -> &str;
    fn cardinality(&self) -> Cardinality;

    /// Claim this element's tokens from the buffer and resolve its value.
    fn consume(&self, tokens: &mut TokenBuffer) -> Result<Value, ArgError>;
}

/// A registered element.
#[derive(Debug, Clone)]
pub enum Element {
    Argument(Argument),
    Flag(Flag),
    Option(OptionArg),
}

impl Element {
    pub fn identifier(&self) -> &str {
        self.common().id()
    }

    pub fn cardinality(&self) -> Cardinality {
        match self {
            Element::Argument(a) => Consume::cardinality(a),
            Element::Flag(f) => Consume::cardinality(f),
            Element::Option(o) => Consume::cardinality(o),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Element::Argument(_))
    }

    pub fn common(&self) -> &Common {
        match self {
            Element::Argument(a) => a.common(),
            Element::Flag(f) => f.common(),
            Element::Option(o) => o.common(),
        }
    }

    pub fn help(&self) -> Option<&str> {
        self.common().help()
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.common().default_value()
    }

    /// Check the definition and bind named types. Used by `Parser::register`.
    pub(crate) fn prepare(self, types: &TypeRegistry) -> Result<Self, ArgError> {
        let mut element = self;
        let cardinality = element.cardinality();
        element.common().check(cardinality)?;

        match &mut element {
            Element::Argument(a) if cardinality == Cardinality::Zero => {
                return Err(ArgError::config(
                    a.common().id(),
                    "cardinality zero is reserved for flags",
                ));
            }
            Element::Option(option) => {
                option.check_minimum()?;
                if cardinality == Cardinality::Zero {
                    option.common_mut().target = Target::Kind(ValueKind::Bool);
                }
            }
            _ => {}
        }

        let common = match &mut element {
            Element::Argument(a) => a.common_mut(),
            Element::Flag(f) => f.common_mut(),
            Element::Option(o) => o.common_mut(),
        };
        let target = std::mem::take(&mut common.target);
        common.target = types.resolve(&common.id, target)?;

        Ok(element)
    }

    /// Consume with knowledge of the element's position among positional arguments.
    pub(crate) fn consume_at(
        &self,
        tokens: &mut TokenBuffer,
        trailing: bool,
    ) -> Result<Value, ArgError> {
        match self {
            Element::Argument(a) => a.consume_at(tokens, trailing),
            Element::Flag(f) => f.consume(tokens),
            Element::Option(o) => o.consume(tokens),
        }
    }
}

impl From<Argument> for Element {
    fn from(a: Argument) -> Self {
        Element::Argument(a)
    }
}

impl From<Flag> for Element {
    fn from(f: Flag) -> Self {
        Element::Flag(f)
    }
}

impl From<OptionArg> for Element {
    fn from(o: OptionArg) -> Self {
        Element::Option(o)
    }
}

/// Normalize a short alias: `"v"` and `"-v"` both become `"-v"`.
fn short_form(alias: &str) -> String {
    format!("-{}", alias.trim_start_matches('-'))
}

//! Positional arguments claim plain tokens left to right.

use crate::element::{Cardinality, Common, Configure, Consume, DefaultValue};
use crate::error::ArgError;
use crate::tokens::TokenBuffer;
use crate::value::Value;

/// A positional argument.
///
/// Option-like tokens are never candidates; they stay in the buffer for
/// whoever owns them. Only the trailing positional argument of a parser may
/// fall back to its default when candidates run short.
#[derive(Debug, Clone)]
pub struct Argument {
    common: Common,
    cardinality: Cardinality,
}

impl Argument {
    /// A single-value argument.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            common: Common::new(id),
            cardinality: Cardinality::Exact(1),
        }
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Exactly `n` values.
    pub fn count(self, n: usize) -> Self {
        self.with_cardinality(Cardinality::Exact(n))
    }

    /// Every remaining plain token.
    pub fn unlimited(self) -> Self {
        self.with_cardinality(Cardinality::Unlimited)
    }

    /// Consume as a leading (`trailing == false`) or trailing positional argument.
    pub fn consume_at(
        &self,
        tokens: &mut TokenBuffer,
        trailing: bool,
    ) -> Result<Value, ArgError> {
        let id = self.common.id();
        let candidates = tokens.candidates();

        let required = match self.cardinality {
            Cardinality::Exact(n) => n,
            Cardinality::Unlimited => 0,
            Cardinality::Zero => {
                return Err(ArgError::config(id, "cardinality zero is reserved for flags"))
            }
        };

        if candidates.len() < required && !self.default_covers(trailing, required) {
            return Err(ArgError::missing(id, required, candidates.len()));
        }

        let default = self.common.default_value();
        match self.cardinality {
            Cardinality::Exact(1) => {
                match candidates.first().and_then(|slot| tokens.take(*slot)) {
                    Some(raw) => self.common.resolve(&raw),
                    None => Ok(default.map(DefaultValue::to_value).unwrap_or_default()),
                }
            }
            Cardinality::Exact(n) => {
                let mut slots: Vec<Value> = (0..n)
                    .map(|i| default.map(|d| d.slot(i)).unwrap_or_default())
                    .collect();
                let raws = tokens.take_all(&candidates[..candidates.len().min(n)]);
                for (slot, raw) in slots.iter_mut().zip(&raws) {
                    *slot = self.common.resolve(raw)?;
                }
                Ok(Value::List(slots))
            }
            _ => {
                if candidates.is_empty() && trailing {
                    if let Some(default) = default {
                        return Ok(default.to_value());
                    }
                }
                let raws = tokens.take_all(&candidates);
                Ok(Value::List(self.common.resolve_all(&raws)?))
            }
        }
    }

    /// Whether the default may stand in for `required` missing values.
    fn default_covers(&self, trailing: bool, required: usize) -> bool {
        if !trailing {
            return false;
        }
        match self.common.default_value() {
            None => false,
            Some(DefaultValue::Scalar(_)) => true,
            Some(DefaultValue::Slots(items)) => items.len() >= required,
        }
    }
}

impl Configure for Argument {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

impl Consume for Argument {
    fn identifier(&self) -> &str {
        self.common.id()
    }

    fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// A standalone argument is its own trailing element.
    fn consume(&self, tokens: &mut TokenBuffer) -> Result<Value, ArgError> {
        self.consume_at(tokens, true)
    }
}

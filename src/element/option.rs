//! Named options: a switch followed by, or carrying, its values.
//!
//! Accepted forms, tested in this order for each unclaimed token:
//!
//! ```text
//! --name value      exact match, values follow as separate tokens
//! --name=value      inline, '=' separator
//! --name:value      inline, ':' separator
//! -nvalue           inline, concatenated (single-character forms only)
//! ```
//!
//! Inline values of multi-value options are comma-separated.

use crate::coerce::{split_list, Target, ValueKind};
use crate::element::{short_form, Cardinality, Common, Configure, Consume, DefaultValue};
use crate::error::ArgError;
use crate::tokens::{is_option_like, TokenBuffer};
use crate::value::Value;

/// How a token matched the option.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Hit {
    /// The token is the switch itself.
    Exact,
    /// The token carried its value after a separator.
    Inline(String),
}

const SEPARATORS: [char; 2] = ['=', ':'];

/// A named option with a value (or values).
#[derive(Debug, Clone)]
pub struct OptionArg {
    common: Common,
    cardinality: Cardinality,
    minimum: Option<usize>,
    alias: Option<String>,
    aliases: Vec<String>,
}

impl OptionArg {
    /// A single-value option matched by `--<id>`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            common: Common::new(id),
            cardinality: Cardinality::Exact(1),
            minimum: None,
            alias: None,
            aliases: Vec::new(),
        }
    }

    /// Cardinality zero turns the option into a boolean switch.
    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        if cardinality == Cardinality::Zero {
            self.common.target = Target::Kind(ValueKind::Bool);
        }
        self
    }

    pub fn count(self, n: usize) -> Self {
        self.with_cardinality(Cardinality::Exact(n))
    }

    pub fn unlimited(self) -> Self {
        self.with_cardinality(Cardinality::Unlimited)
    }

    /// Require at least `minimum` values; the rest may come from the default.
    pub fn with_minimum(mut self, minimum: usize) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Short alias; `"o"` and `"-o"` both match `-o`.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Extra match strings, compared verbatim.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn minimum(&self) -> Option<usize> {
        self.minimum
    }

    /// Explicit minimum, else the cardinality (1 for unlimited).
    pub fn effective_minimum(&self) -> usize {
        self.minimum.unwrap_or(match self.cardinality {
            Cardinality::Zero => 0,
            Cardinality::Exact(n) => n,
            Cardinality::Unlimited => 1,
        })
    }

    /// Every switch spelling of this option.
    pub fn forms(&self) -> Vec<String> {
        let mut forms = vec![format!("--{}", self.common.id())];
        forms.extend(self.alias.as_deref().map(short_form));
        forms.extend(self.aliases.iter().cloned());
        forms
    }

    pub(crate) fn check_minimum(&self) -> Result<(), ArgError> {
        match (self.minimum, self.cardinality.finite()) {
            (Some(min), Some(n)) if min > n => Err(ArgError::config(
                self.common.id(),
                format!("minimum {} exceeds cardinality {}", min, n),
            )),
            _ => Ok(()),
        }
    }

    fn match_token(forms: &[String], token: &str) -> Option<Hit> {
        if forms.iter().any(|form| form == token) {
            return Some(Hit::Exact);
        }

        for sep in SEPARATORS {
            for form in forms {
                let value = token
                    .strip_prefix(form.as_str())
                    .and_then(|rest| rest.strip_prefix(sep));
                if let Some(value) = value {
                    return Some(Hit::Inline(value.to_string()));
                }
            }
        }

        forms
            .iter()
            .filter(|form| is_single_char(form))
            .find_map(|form| token.strip_prefix(form.as_str()))
            .filter(|rest| !rest.is_empty())
            .map(|rest| Hit::Inline(rest.to_string()))
    }

    /// Value when the option does not appear at all.
    fn absent(&self) -> Value {
        if let Some(default) = self.common.default_value() {
            return default.to_value();
        }
        match self.cardinality {
            Cardinality::Zero => Value::Bool(false),
            Cardinality::Exact(1) => Value::Null,
            _ => Value::List(Vec::new()),
        }
    }

    fn presence(&self) -> Result<Value, ArgError> {
        self.common.resolve_as("true", &Target::Kind(ValueKind::Bool))
    }

    fn resolve_inline(&self, raw: &str) -> Result<Value, ArgError> {
        match self.cardinality {
            Cardinality::Zero => self.common.resolve_as(raw, &Target::Kind(ValueKind::Bool)),
            Cardinality::Exact(1) => self.common.resolve(raw),
            _ => {
                let values = self.common.resolve_all(&split_list(raw))?;
                self.complete(values)
            }
        }
    }

    fn resolve_following(
        &self,
        tokens: &mut TokenBuffer,
        switch: usize,
    ) -> Result<Value, ArgError> {
        let id = self.common.id();

        match self.cardinality {
            Cardinality::Zero => self.presence(),
            Cardinality::Exact(1) => {
                let next = tokens
                    .next_after(switch)
                    .filter(|(_, token)| !is_option_like(token))
                    .map(|(slot, _)| slot);
                match next.and_then(|slot| tokens.take(slot)) {
                    Some(raw) => self.common.resolve(&raw),
                    None if self.effective_minimum() > 0 => Err(ArgError::missing(id, 1, 0)),
                    None => Ok(self
                        .common
                        .default_value()
                        .map(DefaultValue::to_value)
                        .unwrap_or_default()),
                }
            }
            _ => {
                let limit = self.cardinality.finite().unwrap_or(usize::MAX);
                let mut slots = Vec::new();
                let mut cursor = switch;
                while slots.len() < limit {
                    match tokens.next_after(cursor) {
                        Some((slot, token)) if !is_option_like(token) => {
                            slots.push(slot);
                            cursor = slot;
                        }
                        _ => break,
                    }
                }
                let raws = tokens.take_all(&slots);
                let values = self.common.resolve_all(&raws)?;
                self.complete(values)
            }
        }
    }

    /// Back-fill a finite multi-value result from the default and enforce the minimum.
    ///
    /// An explicit minimum counts supplied values only. Without one, default-filled
    /// slots count towards the cardinality.
    fn complete(&self, mut values: Vec<Value>) -> Result<Value, ArgError> {
        let id = self.common.id();
        let supplied = values.len();
        let mut available = supplied;

        if let Some(n) = self.cardinality.finite() {
            if values.len() > n {
                tracing::warn!(
                    "Option '{}' takes {} values, ignoring {} extra",
                    id,
                    n,
                    values.len() - n
                );
                values.truncate(n);
            }
            if let Some(default) = self.common.default_value() {
                available = n;
                for slot in values.len()..n {
                    values.push(default.slot(slot));
                }
            } else {
                values.resize(n, Value::Null);
            }
        }

        let (minimum, counted) = match self.minimum {
            Some(minimum) => (minimum, supplied),
            None => (self.effective_minimum(), available),
        };
        if counted < minimum {
            return Err(ArgError::missing(id, minimum, supplied));
        }
        Ok(Value::List(values))
    }
}

fn is_single_char(form: &str) -> bool {
    let mut chars = form.chars();
    matches!((chars.next(), chars.next(), chars.next()), (Some('-'), Some(c), None) if c != '-')
}

impl Configure for OptionArg {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

impl Consume for OptionArg {
    fn identifier(&self) -> &str {
        self.common.id()
    }

    fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    fn consume(&self, tokens: &mut TokenBuffer) -> Result<Value, ArgError> {
        let forms = self.forms();
        let found = tokens
            .slots()
            .find_map(|(slot, token)| Self::match_token(&forms, token).map(|hit| (slot, hit)));

        let Some((switch, hit)) = found else {
            return Ok(self.absent());
        };

        tokens.take(switch);
        match hit {
            Hit::Inline(raw) => self.resolve_inline(&raw),
            Hit::Exact => self.resolve_following(tokens, switch),
        }
    }
}

//! Element registry and the consumption sequence.
//!
//! ```text
//! tokens → TokenBuffer → flags + options (registration order)
//!                      → positional arguments (registration order)
//!                      → Matches
//! ```
//!
//! Flags and options always run before positional arguments: positional
//! scanning skips option-like tokens, so a switch must be claimed by its
//! owner before any positional argument looks at the buffer.

use crate::coerce::TypeRegistry;
use crate::element::{DefaultValue, Element};
use crate::error::ArgError;
use crate::matches::Matches;
use crate::tokens::{is_option_like, TokenBuffer};
use crate::value::Value;

/// Ordered collection of elements plus parse settings.
///
/// Registration is append-only; `parse` never mutates the parser, so one
/// parser serves any number of parse calls.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    elements: Vec<Element>,
    types: TypeRegistry,
    strict: bool,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unclaimed option-like tokens instead of ignoring them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Register a constructible type for elements configured with `typed(name)`.
    ///
    /// Must happen before registering the elements that use it.
    pub fn with_type<F>(mut self, name: impl Into<String>, ctor: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.types.register(name, ctor);
        self
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Add an element.
    ///
    /// Fails with `DuplicateIdentifier`, `InvalidConfiguration` or, for an
    /// unknown named type, `InvalidType`. On failure the registry is unchanged.
    pub fn register(&mut self, element: impl Into<Element>) -> Result<&Element, ArgError> {
        let element: Element = element.into();
        let id = element.identifier();

        if self.get(id).is_some() {
            return Err(ArgError::DuplicateIdentifier { id: id.to_string() });
        }

        let element = element.prepare(&self.types)?;

        if element.is_positional() {
            if let Some(previous) = self.elements.iter().rev().find(|e| e.is_positional()) {
                if previous.default_value().is_some() {
                    tracing::warn!(
                        "'{}' is no longer the trailing positional, its default will never apply",
                        previous.identifier()
                    );
                }
            }
        }

        tracing::debug!(
            "Registered '{}' (cardinality {})",
            element.identifier(),
            element.cardinality()
        );
        self.elements.push(element);
        Ok(&self.elements[self.elements.len() - 1])
    }

    /// Registered elements in registration order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.identifier() == id)
    }

    /// Parse a token sequence (program name excluded).
    ///
    /// The first failing element aborts the parse; no partial result is returned.
    pub fn parse<I, S>(&self, tokens: I) -> Result<Matches, ArgError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut buffer = TokenBuffer::new(tokens);
        let mut values = vec![Value::Null; self.elements.len()];

        let (named, positional): (Vec<usize>, Vec<usize>) =
            (0..self.elements.len()).partition(|i| !self.elements[*i].is_positional());
        tracing::debug!(
            "Parsing {} tokens with {} flags/options and {} positional arguments",
            buffer.len(),
            named.len(),
            positional.len()
        );

        for index in named {
            let element = &self.elements[index];
            values[index] = element.consume_at(&mut buffer, false)?;
            tracing::debug!("'{}' resolved to {}", element.identifier(), values[index]);
        }

        let last = positional.last().copied();
        for index in positional {
            let element = &self.elements[index];
            let trailing = Some(index) == last;
            values[index] = match element.consume_at(&mut buffer, trailing) {
                Ok(value) => value,
                Err(ArgError::MissingArgument { .. })
                    if trailing && element.default_value().is_some() =>
                {
                    element
                        .default_value()
                        .map(DefaultValue::to_value)
                        .unwrap_or_default()
                }
                Err(err) => return Err(err),
            };
            tracing::debug!("'{}' resolved to {}", element.identifier(), values[index]);
        }

        if self.strict {
            if let Some(token) = buffer.remaining().into_iter().find(|t| is_option_like(t)) {
                return Err(ArgError::UnrecognizedOption {
                    token: token.to_string(),
                });
            }
        }

        let leftover = buffer.into_remaining();
        if !leftover.is_empty() {
            tracing::debug!("Unclaimed tokens: {:?}", leftover);
        }

        let entries = self
            .elements
            .iter()
            .map(|e| e.identifier().to_string())
            .zip(values)
            .collect();
        Ok(Matches::new(entries, leftover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Argument, Configure, Flag, OptionArg};

    #[test]
    fn test_register_returns_element() {
        let mut parser = Parser::new();
        let element = parser.register(Flag::new("quiet")).unwrap();
        assert_eq!(element.identifier(), "quiet");
        assert_eq!(parser.elements().len(), 1);
    }

    #[test]
    fn test_duplicate_leaves_registry_unchanged() {
        let mut parser = Parser::new();
        parser.register(OptionArg::new("name")).unwrap();
        let err = parser.register(Argument::new("name")).unwrap_err();
        assert_eq!(err, ArgError::DuplicateIdentifier { id: "name".into() });
        assert_eq!(parser.elements().len(), 1);
        assert!(!parser.elements()[0].is_positional());
    }

    #[test]
    fn test_invalid_config_leaves_registry_unchanged() {
        let mut parser = Parser::new();
        let bad = OptionArg::new("xy").count(2).with_default_slots(vec![1]);
        assert!(matches!(
            parser.register(bad),
            Err(ArgError::InvalidConfiguration { .. })
        ));
        assert!(parser.elements().is_empty());
    }

    #[test]
    fn test_non_trailing_default_does_not_apply() {
        let mut parser = Parser::new();
        parser.register(Argument::new("first").with_default("a")).unwrap();
        parser.register(Argument::new("second")).unwrap();

        let err = parser.parse(["only"]).unwrap_err();
        assert_eq!(err, ArgError::missing("second", 1, 0));
    }

    #[test]
    fn test_trailing_default_applies() {
        let mut parser = Parser::new();
        parser.register(Argument::new("first")).unwrap();
        parser.register(Argument::new("second").with_default("b")).unwrap();

        let m = parser.parse(["a"]).unwrap();
        assert_eq!(m.get_str("first").unwrap(), "a");
        assert_eq!(m.get_str("second").unwrap(), "b");
    }

    #[test]
    fn test_strict_rejects_unclaimed_option() {
        let mut parser = Parser::new().strict(true);
        parser.register(Argument::new("file")).unwrap();

        let err = parser.parse(["--bogus", "x"]).unwrap_err();
        assert_eq!(
            err,
            ArgError::UnrecognizedOption {
                token: "--bogus".into()
            }
        );
    }

    #[test]
    fn test_lenient_reports_leftovers() {
        let mut parser = Parser::new();
        parser.register(Argument::new("file")).unwrap();

        let m = parser.parse(["--bogus", "x", "y"]).unwrap();
        assert_eq!(m.get_str("file").unwrap(), "x");
        assert_eq!(m.leftover(), ["--bogus".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_named_type_via_parser() {
        let mut parser =
            Parser::new().with_type("upper", |raw| Ok(Value::from(raw.to_uppercase())));
        parser.register(OptionArg::new("name").typed("upper")).unwrap();

        let m = parser.parse(["--name", "ada"]).unwrap();
        assert_eq!(m.get_str("name").unwrap(), "ADA");
    }
}

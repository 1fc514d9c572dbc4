//! Declarative command-line argument parsing.
//!
//! Elements (positional arguments, flags, options) are registered on a
//! [`Parser`]; [`Parser::parse`] runs them over the token list and returns
//! [`Matches`], a validated, type-coerced map from identifier to value.
//!
//! ```text
//! Register → Partition → Flags/Options → Positional → Matches
//! ```

pub mod coerce;
pub mod config;
pub mod element;
mod error;
pub mod logging;
mod matches;
mod parser;
pub mod pipeline;
pub mod tokens;
mod value;

pub use coerce::{Target, TypeRegistry, ValueKind};
pub use config::{ConfigError, ParserConfig};
pub use element::{
    Argument, Cardinality, Configure, Consume, DefaultValue, Element, Flag, OptionArg,
};
pub use error::ArgError;
pub use matches::Matches;
pub use parser::Parser;
pub use tokens::TokenBuffer;
pub use value::{Object, Value};

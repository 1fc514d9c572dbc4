//! Boolean flags. Presence only, never a value.

use std::fmt;
use std::sync::Arc;

use crate::element::{short_form, Cardinality, Common, Configure, Consume, DefaultValue};
use crate::error::ArgError;
use crate::tokens::TokenBuffer;
use crate::value::Value;

/// Callback run when a flag is present.
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// A boolean flag matched by `--<id>`, `-<alias>` or an extra alias.
#[derive(Clone)]
pub struct Flag {
    common: Common,
    alias: Option<String>,
    aliases: Vec<String>,
    actions: Vec<Action>,
}

impl Flag {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            common: Common::new(id),
            alias: None,
            aliases: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Short alias; `"v"` and `"-v"` both match `-v`.
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

    /// Run `action` whenever the flag is present. Actions run in the order added.
    pub fn on_present<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(action));
        self
    }

    /// Every token that matches this flag.
    pub fn forms(&self) -> Vec<String> {
        let mut forms = vec![format!("--{}", self.common.id())];
        forms.extend(self.alias.as_deref().map(short_form));
        forms.extend(self.aliases.iter().cloned());
        forms
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("common", &self.common)
            .field("alias", &self.alias)
            .field("aliases", &self.aliases)
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl Configure for Flag {
    fn common(&self) -> &Common {
        &self.common
    }

    fn common_mut(&mut self) -> &mut Common {
        &mut self.common
    }
}

impl Consume for Flag {
    fn identifier(&self) -> &str {
        self.common.id()
    }

    fn cardinality(&self) -> Cardinality {
        Cardinality::Zero
    }

    fn consume(&self, tokens: &mut TokenBuffer) -> Result<Value, ArgError> {
        let forms = self.forms();
        let hit = tokens
            .slots()
            .find(|(_, token)| forms.iter().any(|form| form == token))
            .map(|(slot, _)| slot);

        let Some(slot) = hit else {
            return Ok(self
                .common
                .default_value()
                .map(DefaultValue::to_value)
                .unwrap_or(Value::Bool(false)));
        };

        tokens.take(slot);
        for action in &self.actions {
            action();
        }
        self.common.pipeline().apply(self.common.id(), Value::Bool(true))
    }
}

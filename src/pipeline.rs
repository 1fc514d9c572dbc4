//! Validation and transforms, applied to freshly consumed values only.

use std::fmt;
use std::sync::Arc;

use crate::error::ArgError;
use crate::value::Value;

pub type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Optional validator followed by transforms in registration order.
///
/// Default values never enter the pipeline.
#[derive(Clone, Default)]
pub struct Pipeline {
    validator: Option<Validator>,
    transforms: Vec<Transform>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validator, replacing any previous one.
    pub fn set_validator(&mut self, validator: Validator) {
        self.validator = Some(validator);
    }

    pub fn push_transform(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    pub fn is_empty(&self) -> bool {
        self.validator.is_none() && self.transforms.is_empty()
    }

    /// Validate then transform a value read for element `id`.
    pub fn apply(&self, id: &str, value: Value) -> Result<Value, ArgError> {
        if let Some(validator) = &self.validator {
            if !validator(&value) {
                return Err(ArgError::InvalidArgument {
                    id: id.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(self
            .transforms
            .iter()
            .fold(value, |current, transform| transform(current)))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("validator", &self.validator.is_some())
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

use crate::{ConfigError, Value};
use std::fmt::Display;

pub(crate) mod range;
pub(crate) mod valid_string;

/// A trait for any stateful validation logic applied to configuration values.
/// It must be `Send + Sync` to be stored in a static `Lazy` cell.
pub trait Validator: Display + Send + Sync {
    /// The core validation method. `name` is only used to build error messages.
    fn validate(&self, name: &str, value: &Value) -> Result<(), ConfigError>;
}

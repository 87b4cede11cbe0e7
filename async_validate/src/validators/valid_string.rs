use crate::validators::Validator;
use crate::{ConfigError, Value};
use std::fmt::{self, Display};

/// A stateful validator that checks if a string is in a predefined set.
#[derive(Clone, Debug)]
pub struct ValidString {
    valid_strings: Vec<String>,
}

impl ValidString {
    fn new(valid_strings: Vec<String>) -> Self {
        Self { valid_strings }
    }

    /// Factory for creating a `ValidString` validator.
    ///
    /// Example: `ValidString::in_list(&["debounce"])`
    pub fn in_list(valid_strings: &[&'static str]) -> Box<dyn Validator> {
        Box::new(Self::new(
            valid_strings.iter().map(|s| s.to_string()).collect(),
        ))
    }
}

impl Validator for ValidString {
    fn validate(&self, name: &str, value: &Value) -> Result<(), ConfigError> {
        match value.as_str() {
            Some(s) if self.valid_strings.iter().any(|v| v == s) => Ok(()),
            _ => Err(ConfigError::ValidationFailed {
                name: name.to_string(),
                message: format!(
                    "String must be one of: {}, but received \"{}\"",
                    self.valid_strings.join(", "),
                    value
                ),
            }),
        }
    }
}

impl Display for ValidString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.valid_strings.join(", "))
    }
}

//! Directive and plugin configuration.
//!
//! The directive accepts a single optional argument, `debounce`, whose value is the
//! debounce interval in milliseconds:
//!
//! ```text
//! async-validate:debounce="300"
//! ```
//!
//! When the directive carries no value, the plugin-wide default applies, and when
//! that is absent too the interval is `0`.

use crate::validators::{Validator, range::Range, valid_string::ValidString};
use crate::{ConfigError, Value};
use indexmap::IndexSet;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Duration;

pub(crate) mod plugin;

pub use plugin::PluginOptions;

pub const DEBOUNCE_ARG: &str = "debounce";
pub const EXAMPLE_USAGE: &str = "async-validate:debounce=\"3000\"";

static ARGUMENT_VALIDATOR: Lazy<Box<dyn Validator>> =
    Lazy::new(|| ValidString::in_list(&[DEBOUNCE_ARG]));

static INTERVAL_VALIDATOR: Lazy<Box<dyn Validator>> = Lazy::new(|| Range::at_least(0));

/// The directive binding payload handed over by the host on bind and update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectiveBinding {
    pub argument: Option<String>,
    pub value: Option<Value>,
    /// Accepted as part of the host payload. The directive defines no modifiers
    /// and ignores them.
    pub modifiers: IndexSet<String>,
}

impl DirectiveBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding for `async-validate:debounce="<ms>"`.
    pub fn debounce(ms: impl Into<Value>) -> Self {
        Self::new().argument(DEBOUNCE_ARG).value(ms)
    }

    pub fn argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.insert(modifier.into());
        self
    }
}

/// A validated, non-negative debounce interval in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct DebounceInterval(f64);

impl DebounceInterval {
    pub const ZERO: DebounceInterval = DebounceInterval(0.0);

    /// Validates `ms` with the same rules as the directive value.
    pub fn from_millis(name: &str, ms: f64) -> Result<Self, ConfigError> {
        Self::parse(name, &Value::Number(ms))
    }

    fn parse(name: &str, value: &Value) -> Result<Self, ConfigError> {
        INTERVAL_VALIDATOR.validate(name, value)?;
        // The validator guarantees a finite, non-negative number.
        Ok(Self(value.as_f64().unwrap_or_default()))
    }

    /// Picks the directive value, then the plugin default, then zero.
    pub fn resolve(directive: Option<Self>, plugin: Option<Self>) -> Self {
        directive.or(plugin).unwrap_or(Self::ZERO)
    }

    pub fn as_millis(&self) -> f64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.0 / 1000.0).unwrap_or(Duration::MAX)
    }
}

/// Validates the directive's argument and value.
///
/// Returns the directive-level interval, or `None` when the directive does not set
/// one and the plugin default should apply.
pub fn validate_debounce_interval(
    binding: &DirectiveBinding,
) -> Result<Option<DebounceInterval>, ConfigError> {
    // An empty argument counts as no argument.
    let argument = binding.argument.as_deref().filter(|arg| !arg.is_empty());
    if let Some(arg) = argument
        && ARGUMENT_VALIDATOR
            .validate("argument", &Value::from(arg))
            .is_err()
    {
        return Err(ConfigError::InvalidArgument {
            name: "argument".to_string(),
            message: format!(
                "The argument of async-validate directive must be \"{DEBOUNCE_ARG}\", but \
                received \"{arg}\""
            ),
        });
    }

    match (&binding.value, argument.is_some()) {
        (Some(_), false) => Err(ConfigError::ValueWithoutArgument {
            usage: EXAMPLE_USAGE,
        }),
        (Some(value), true) => DebounceInterval::parse("value", value).map(Some),
        (None, true) => {
            tracing::warn!(
                "This warning is shown because you used the debounce argument on an \
                async-validate directive without value. To remove this warning, either add a \
                value to the directive (for example, {EXAMPLE_USAGE}) or remove the debounce \
                argument from the directive."
            );
            Ok(None)
        }
        (None, false) => Ok(None),
    }
}

/// Parses a raw property into a number, the way string-sourced options are read.
fn parse_number_prop(
    key: &str,
    props: &HashMap<String, String>,
) -> Result<Option<f64>, ConfigError> {
    props
        .get(key)
        .map(|raw| {
            raw.trim()
                .to_lowercase()
                .parse::<f64>()
                .map_err(|e| ConfigError::InvalidValue {
                    name: key.to_string(),
                    message: e.to_string(),
                })
        })
        .transpose()
}

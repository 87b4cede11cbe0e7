/// Errors raised while parsing the directive or plugin configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {name}: {message}")]
    InvalidArgument { name: String, message: String },
    #[error("Value can only be used with debounce argument. For example, {usage}")]
    ValueWithoutArgument { usage: &'static str },
    #[error("Failed to parse name '{name}': {message}")]
    InvalidValue { name: String, message: String },
    #[error("Validation failed for name '{name}': {message}")]
    ValidationFailed { name: String, message: String },
}

/// Everything the directive can fail with.
///
/// Supersession of a runner or a debounce check is not an error: stale results are
/// dropped silently and never surface here.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DirectiveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("The type of property {attr} must be an array, but received {received}")]
    Shape { attr: String, received: String },
    #[error(
        "The return value of {attr} (rule #{index}) should be either a string or a boolean, \
        but received \"{received}\"."
    )]
    RuleContract {
        attr: String,
        index: usize,
        received: String,
    },
    #[error("Debounced validation requires a running Tokio runtime")]
    NoRuntime,
}

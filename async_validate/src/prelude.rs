//! The `async_validate` prelude.

pub use crate::attrs::{Attr, Attrs, RULES_ATTR};
pub use crate::directive::{AsyncValidate, VNode};
pub use crate::errors::{ConfigError, DirectiveError};
pub use crate::options::{DebounceInterval, DirectiveBinding, PluginOptions};
pub use crate::rules::{Rule, RuleSet, ValidationOutcome};
pub use crate::validators::{Validator, range::Range, valid_string::ValidString};
pub use crate::{
    HostComponent, InputField, TrackedValue, ValidationSnapshot, ValidationState, Value,
};

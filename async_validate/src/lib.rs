//! Debounced, race-safe asynchronous validation for input components.
//!
//! The [`AsyncValidate`] directive is bound to an input component. Whenever the
//! bound value changes it builds a fresh [`Runner`] over the element's
//! `async-rules` attribute, installs it on the component and schedules it after
//! the debounce interval. All rules run concurrently; their messages are
//! collected in declaration order and committed to the component's
//! [`ValidationState`], but only by the most recently installed runner. Results
//! of superseded runs are dropped, so a slow response to an old value can never
//! overwrite the outcome for a newer one.
//!
//! ```no_run
//! use async_validate::prelude::*;
//!
//! # async fn demo() -> Result<(), DirectiveError> {
//! let plugin = AsyncValidate::new(Some(300.0))?;
//! let field = InputField::new("");
//! let rules = Attr::rules([Rule::new(|v: Value| async move {
//!     if v.as_str().is_some_and(|s| s.contains('@')) {
//!         Value::from(true)
//!     } else {
//!         Value::from("must contain @")
//!     }
//! })]);
//!
//! let binding = DirectiveBinding::new();
//! let old = VNode::new(&field).value("").attr(RULES_ATTR, rules.clone());
//! plugin.bind(&binding, &old)?;
//!
//! field.value().set("abc");
//! let new = VNode::new(&field).value("abc").attr(RULES_ATTR, rules);
//! plugin.component_updated(&binding, &new, &old)?;
//!
//! // On submit:
//! let valid = field.validate_async(true).await?;
//! assert_eq!(valid, Some(false));
//! # Ok(())
//! # }
//! ```

extern crate self as async_validate;

pub use async_validate_macros::HostComponent;
pub use component::{HostComponent, InputField};
pub use errors::{ConfigError, DirectiveError};
pub use runner::Runner;
pub use state::{ValidationSnapshot, ValidationState};
pub use types::tracked::TrackedValue;
pub use types::value::Value;

pub mod attrs;
pub mod options;
pub mod prelude;
pub mod rules;

mod component;
mod debounce;
mod directive;
mod errors;
mod runner;
mod state;
mod types;
mod validators;

pub use attrs::RULES_ATTR;
pub use directive::{AsyncValidate, VNode};

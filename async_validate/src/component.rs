use crate::{DirectiveError, TrackedValue, ValidationState, Value};
use futures::future::BoxFuture;
use getset::Getters;
use std::sync::Arc;

/// What the directive needs from the host's component instance.
///
/// Usually derived:
///
/// ```
/// use async_validate::prelude::*;
///
/// #[derive(HostComponent)]
/// struct EmailField {
///     #[host(value)]
///     value: TrackedValue,
///     #[host(state)]
///     validation: ValidationState,
/// }
/// ```
pub trait HostComponent: Send + Sync + 'static {
    /// The component's internal tracked value.
    fn internal_value(&self) -> Value;

    fn validation_state(&self) -> &ValidationState;

    /// Validates now with the currently installed runner, skipping the debounce.
    ///
    /// Applications call this with `force = true` on submit to mark the field as
    /// interacted with and surface its errors.
    fn validate_async(
        &self,
        force: bool,
    ) -> BoxFuture<'static, Result<Option<bool>, DirectiveError>> {
        self.validation_state().validate_async(force)
    }
}

/// A plain text input: a tracked value plus its validation state.
#[derive(Debug, Default, Getters, async_validate_macros::HostComponent)]
#[getset(get = "pub")]
pub struct InputField {
    #[host(value)]
    value: TrackedValue,
    #[host(state)]
    validation: ValidationState,
}

impl InputField {
    pub fn new(value: impl Into<Value>) -> Arc<Self> {
        Arc::new(Self {
            value: TrackedValue::new(value),
            validation: ValidationState::new(),
        })
    }
}

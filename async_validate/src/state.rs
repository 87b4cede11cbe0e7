//! Per-instance validation state.
//!
//! Every bound component owns one [`ValidationState`]. It holds what the host
//! renders (`error_bucket`, `valid`, `has_input`, `has_focused`) together with the
//! two supersession slots: the currently installed [`Runner`] and the pending
//! debounce check. The only way to write an outcome is
//! [`ValidationState::commit_if_current`], which refuses runners that have been
//! replaced in the meantime.

use crate::debounce::DebounceCheck;
use crate::rules::ValidationOutcome;
use crate::runner::Runner;
use crate::DirectiveError;
use futures::future::{BoxFuture, FutureExt};
use getset::{CopyGetters, Getters};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A point-in-time copy of the presentation fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Getters, CopyGetters)]
pub struct ValidationSnapshot {
    #[getset(get = "pub")]
    error_bucket: Vec<String>,
    #[getset(get_copy = "pub")]
    valid: bool,
    #[getset(get_copy = "pub")]
    has_input: bool,
    #[getset(get_copy = "pub")]
    has_focused: bool,
}

#[derive(Debug, Default)]
struct Slots {
    fields: ValidationSnapshot,
    current_runner: Option<Runner>,
    pending_debounce: Option<DebounceCheck>,
}

#[derive(Debug, Default)]
pub struct ValidationState {
    slots: Mutex<Slots>,
}

impl ValidationState {
    pub fn new() -> Self {
        Self::default()
    }

    // The lock is never held across an await, so a poisoned lock only means a
    // panic elsewhere; the fields themselves are always consistent.
    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ValidationSnapshot {
        self.lock().fields.clone()
    }

    pub fn current_runner(&self) -> Option<Runner> {
        self.lock().current_runner.clone()
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.lock().pending_debounce.is_some()
    }

    /// Runs the currently installed runner, bypassing any debounce.
    ///
    /// Resolves to `Ok(None)` when nothing is installed yet or when the element
    /// has no rules to evaluate.
    pub fn validate_async(
        &self,
        force: bool,
    ) -> BoxFuture<'static, Result<Option<bool>, DirectiveError>> {
        let runner = self.current_runner();
        async move {
            match runner {
                Some(runner) => runner.run(force).await,
                None => Ok(None),
            }
        }
        .boxed()
    }

    /// Makes `runner` the only one allowed to commit from now on.
    pub(crate) fn install_runner(&self, runner: Runner) {
        tracing::debug!(runner = runner.id(), "installing validation runner");
        self.lock().current_runner = Some(runner);
    }

    pub(crate) fn mark_interacted(&self) {
        let mut slots = self.lock();
        slots.fields.has_input = true;
        slots.fields.has_focused = true;
    }

    /// Writes `outcome` only if `runner` is still the installed one.
    ///
    /// Returns whether the outcome was committed. A refused commit is the normal
    /// result of supersession and is not reported anywhere.
    pub(crate) fn commit_if_current(&self, runner: &Runner, outcome: ValidationOutcome) -> bool {
        let mut slots = self.lock();
        if !slots
            .current_runner
            .as_ref()
            .is_some_and(|current| current.ptr_eq(runner))
        {
            return false;
        }
        let (error_bucket, valid) = outcome.into_parts();
        slots.fields.error_bucket = error_bucket;
        slots.fields.valid = valid;
        true
    }

    /// Installs `check` as the pending debounce, handing back the one it replaces.
    pub(crate) fn replace_debounce(&self, check: DebounceCheck) -> Option<DebounceCheck> {
        self.lock().pending_debounce.replace(check)
    }

    pub(crate) fn is_current_debounce(&self, check: &DebounceCheck) -> bool {
        self.lock()
            .pending_debounce
            .as_ref()
            .is_some_and(|pending| pending.same_as(check))
    }

    /// Clears the pending slot once `check` has fired, unless it was replaced.
    pub(crate) fn finish_debounce(&self, check: &DebounceCheck) {
        let mut slots = self.lock();
        if slots
            .pending_debounce
            .as_ref()
            .is_some_and(|pending| pending.same_as(check))
        {
            slots.pending_debounce = None;
        }
    }
}

use crate::Value;
use std::sync::{Mutex, PoisonError};

/// The component's internal tracked value (what the user has typed so far).
///
/// Runners read it when they are built; the host writes it on every input event.
#[derive(Debug, Default)]
pub struct TrackedValue {
    inner: Mutex<Value>,
}

impl TrackedValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            inner: Mutex::new(value.into()),
        }
    }

    pub fn get(&self) -> Value {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the tracked value, returning the previous one.
    pub fn set(&self, value: impl Into<Value>) -> Value {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, value.into())
    }
}

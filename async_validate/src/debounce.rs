//! Per-instance debouncing of update-triggered validation.
//!
//! Each update replaces the instance's pending [`DebounceCheck`]. The replaced
//! check is cancelled, and should its timer still fire it finds it is no longer
//! the installed check and does nothing. Only the newest scheduled check ever
//! runs a validation.

use crate::options::DebounceInterval;
use crate::{DirectiveError, HostComponent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

static NEXT_CHECK_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to one scheduled debounce check.
#[derive(Clone, Debug)]
pub(crate) struct DebounceCheck {
    id: u64,
    token: CancellationToken,
}

impl DebounceCheck {
    fn new() -> Self {
        Self {
            id: NEXT_CHECK_ID.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        }
    }

    pub(crate) fn same_as(&self, other: &DebounceCheck) -> bool {
        self.id == other.id
    }

    fn cancel(&self) {
        self.token.cancel();
    }
}

/// The runtime debounced checks are spawned on.
pub(crate) fn runtime() -> Result<Handle, DirectiveError> {
    Handle::try_current().map_err(|_| DirectiveError::NoRuntime)
}

/// Schedules the component's current runner to run after `interval`.
///
/// A zero interval still goes through the timer and fires on the next turn of
/// the runtime.
pub(crate) fn schedule<C: HostComponent>(
    runtime: &Handle,
    component: &Arc<C>,
    interval: DebounceInterval,
) {
    let check = DebounceCheck::new();
    if let Some(previous) = component.validation_state().replace_debounce(check.clone()) {
        tracing::debug!(
            superseded = previous.id,
            by = check.id,
            "superseding pending debounced validation"
        );
        previous.cancel();
    }

    let delay = interval.as_duration();
    let token = check.token.clone();
    let component: Weak<C> = Arc::downgrade(component);
    tracing::debug!(check = check.id, ?delay, "scheduling debounced validation");

    runtime.spawn(
        async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => fire(component, check).await,
            }
        }
        .in_current_span(),
    );
}

async fn fire<C: HostComponent>(component: Weak<C>, check: DebounceCheck) {
    let runner = {
        let Some(component) = component.upgrade() else {
            return;
        };
        let state = component.validation_state();
        if !state.is_current_debounce(&check) {
            return;
        }
        state.finish_debounce(&check);
        state.current_runner()
    };
    let Some(runner) = runner else {
        return;
    };

    tracing::debug!(check = check.id, runner = runner.id(), "running debounced validation");
    if let Err(error) = runner.run(false).await {
        // Nobody awaits a debounced run, so this is the only place it can surface.
        tracing::warn!(%error, runner = runner.id(), "debounced validation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::{Attr, Attrs, RULES_ATTR};
    use crate::rules::Rule;
    use crate::runner::Runner;
    use crate::{InputField, Value};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn counting_attrs(calls: Arc<AtomicUsize>) -> Arc<Attrs> {
        let mut attrs = Attrs::new();
        attrs.insert(
            RULES_ATTR.to_string(),
            Attr::rules([Rule::new(move |v: Value| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { v.as_str().map_or(Value::from(false), |s| Value::from(s.len() > 2)) }
            })]),
        );
        Arc::new(attrs)
    }

    fn install(field: &Arc<InputField>, calls: &Arc<AtomicUsize>) {
        let runner = Runner::new(field, counting_attrs(calls.clone()));
        field.validation().install_runner(runner);
    }

    #[test]
    fn test_requires_runtime() {
        assert_eq!(runtime().unwrap_err(), DirectiveError::NoRuntime);
    }

    #[tokio::test]
    async fn test_superseded_check_is_inert_when_fired() {
        let field = InputField::new("abc");
        let calls = Arc::new(AtomicUsize::new(0));
        install(&field, &calls);

        let stale = DebounceCheck::new();
        field.validation().replace_debounce(stale.clone());
        let newer = DebounceCheck::new();
        field.validation().replace_debounce(newer.clone());

        // The stale timer fires without having been cancelled.
        fire(Arc::downgrade(&field), stale).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(field.validation().is_current_debounce(&newer));
        assert!(field.validation().current_runner().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_interval() {
        let field = InputField::new("abc");
        let calls = Arc::new(AtomicUsize::new(0));
        install(&field, &calls);

        let interval = DebounceInterval::from_millis("value", 300.0).unwrap();
        schedule(&Handle::current(), &field, interval);
        assert!(field.validation().has_pending_debounce());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(field.validation().snapshot().valid());
        assert!(!field.validation().has_pending_debounce());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_still_defers() {
        let field = InputField::new("abc");
        let calls = Arc::new(AtomicUsize::new(0));
        install(&field, &calls);

        schedule(&Handle::current(), &field, DebounceInterval::ZERO);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_updates_collapse_into_one_run() {
        let field = InputField::new("abc");
        let calls = Arc::new(AtomicUsize::new(0));
        let interval = DebounceInterval::from_millis("value", 100.0).unwrap();

        for _ in 0..5 {
            install(&field, &calls);
            schedule(&Handle::current(), &field, interval);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_component_never_runs() {
        let field = InputField::new("abc");
        let calls = Arc::new(AtomicUsize::new(0));
        install(&field, &calls);

        schedule(&Handle::current(), &field, DebounceInterval::ZERO);
        drop(field);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

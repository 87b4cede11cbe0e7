use crate::attrs::{Attrs, extract_rules};
use crate::rules::evaluate;
use crate::{DirectiveError, HostComponent, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_RUNNER_ID: AtomicU64 = AtomicU64::new(1);

/// A validation run bound to one version of the element's configuration.
///
/// A runner captures the component's tracked value and the attribute snapshot at
/// construction time. Runners are compared by identity only: two runners built
/// from identical inputs are still different runners, and installing the second
/// one supersedes the first.
#[derive(Clone)]
pub struct Runner {
    inner: Arc<RunnerInner>,
}

struct RunnerInner {
    id: u64,
    value: Value,
    attrs: Arc<Attrs>,
    component: Weak<dyn HostComponent>,
}

impl Runner {
    pub fn new<C: HostComponent>(component: &Arc<C>, attrs: Arc<Attrs>) -> Self {
        let value = component.internal_value();
        let component: Weak<C> = Arc::downgrade(component);
        let component: Weak<dyn HostComponent> = component;
        Self {
            inner: Arc::new(RunnerInner {
                id: NEXT_RUNNER_ID.fetch_add(1, Ordering::Relaxed),
                value,
                attrs,
                component,
            }),
        }
    }

    /// Diagnostic id; identity checks use [`Runner::ptr_eq`].
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn value(&self) -> &Value {
        &self.inner.value
    }

    pub fn ptr_eq(&self, other: &Runner) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Evaluates the rules and commits the outcome if this runner is still current.
    ///
    /// With `force`, the field is marked as interacted with before anything else,
    /// so the host starts showing errors. Resolves to the freshly computed validity
    /// even when the commit was refused, and to `None` when there was nothing to
    /// validate or the component is gone.
    pub async fn run(&self, force: bool) -> Result<Option<bool>, DirectiveError> {
        let Some(component) = self.inner.component.upgrade() else {
            return Ok(None);
        };
        if force {
            component.validation_state().mark_interacted();
        }
        // Don't keep the component alive while rules are in flight.
        drop(component);

        let Some(rules) = extract_rules(&self.inner.attrs)? else {
            return Ok(None);
        };

        let outcome = evaluate(&rules, &self.inner.value).await?;
        let valid = outcome.is_valid();

        if let Some(component) = self.inner.component.upgrade() {
            component.validation_state().commit_if_current(self, outcome);
        }
        Ok(Some(valid))
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::{Attr, RULES_ATTR};
    use crate::rules::Rule;
    use crate::{InputField, ValidationSnapshot};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn email_rules() -> Arc<Attrs> {
        let mut attrs = Attrs::new();
        attrs.insert(
            RULES_ATTR.to_string(),
            Attr::rules([
                Rule::new(|v: Value| async move { v.as_str().is_some_and(|s| !s.is_empty()) }),
                Rule::new(|v: Value| async move {
                    match v.as_str() {
                        Some(s) if s.contains('@') => Value::from(true),
                        _ => Value::from("must contain @"),
                    }
                }),
            ]),
        );
        Arc::new(attrs)
    }

    fn slow_rule(ms: u64, result: &'static str) -> Arc<Attrs> {
        let mut attrs = Attrs::new();
        attrs.insert(
            RULES_ATTR.to_string(),
            Attr::rules([Rule::new(move |_| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                result
            })]),
        );
        Arc::new(attrs)
    }

    #[test]
    fn test_identity_is_not_structural() {
        let field = InputField::new("abc");
        let attrs = email_rules();

        let first = Runner::new(&field, attrs.clone());
        let second = Runner::new(&field, attrs);

        assert!(first.ptr_eq(&first.clone()));
        assert!(!first.ptr_eq(&second));
        assert_ne!(first.id(), second.id());
    }

    #[tokio::test]
    async fn test_installed_runner_commits() {
        let field = InputField::new("abc");
        let runner = Runner::new(&field, email_rules());
        field.validation().install_runner(runner.clone());

        assert_eq!(runner.run(false).await, Ok(Some(false)));

        let snapshot = field.validation().snapshot();
        assert_eq!(snapshot.error_bucket(), &vec!["must contain @".to_string()]);
        assert!(!snapshot.valid());
        assert!(!snapshot.has_input());
        assert!(!snapshot.has_focused());
    }

    #[tokio::test]
    async fn test_value_is_captured_at_construction() {
        let field = InputField::new("a@b");
        let runner = Runner::new(&field, email_rules());
        field.validation().install_runner(runner.clone());
        field.value().set("no-at-sign");

        assert_eq!(runner.run(false).await, Ok(Some(true)));
        assert!(field.validation().snapshot().valid());
    }

    #[tokio::test]
    async fn test_superseded_runner_reports_but_does_not_commit() {
        let field = InputField::new("abc");
        let stale = Runner::new(&field, email_rules());
        field.validation().install_runner(stale.clone());
        field.validation().install_runner(Runner::new(&field, email_rules()));

        assert_eq!(stale.run(true).await, Ok(Some(false)));

        let snapshot = field.validation().snapshot();
        assert!(snapshot.error_bucket().is_empty());
        assert!(!snapshot.valid());
        // Forcing still marks the field even though the outcome was dropped.
        assert!(snapshot.has_input());
        assert!(snapshot.has_focused());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_installed_wins_regardless_of_settlement_order() {
        let field = InputField::new("x");
        let slow = Runner::new(&field, slow_rule(500, "slow"));
        let fast = Runner::new(&field, slow_rule(10, "fast"));

        field.validation().install_runner(slow.clone());
        let slow_run = tokio::spawn({
            let slow = slow.clone();
            async move { slow.run(false).await }
        });
        tokio::task::yield_now().await;
        field.validation().install_runner(fast.clone());

        assert_eq!(fast.run(false).await, Ok(Some(false)));
        assert_eq!(slow_run.await.unwrap(), Ok(Some(false)));

        assert_eq!(
            field.validation().snapshot().error_bucket(),
            &vec!["fast".to_string()]
        );
    }

    #[tokio::test]
    async fn test_contract_violation_leaves_state_untouched() {
        let field = InputField::new("abc");
        let mut attrs = Attrs::new();
        attrs.insert(
            RULES_ATTR.to_string(),
            Attr::rules([
                Rule::new(|_| async { "first" }),
                Rule::new(|_| async { Value::Null }),
            ]),
        );
        let runner = Runner::new(&field, Arc::new(attrs));
        field.validation().install_runner(runner.clone());

        let res = runner.run(false).await;

        assert!(matches!(res, Err(DirectiveError::RuleContract { index: 1, .. })));
        assert_eq!(field.validation().snapshot(), ValidationSnapshot::default());
    }

    #[tokio::test]
    async fn test_dropped_component_is_a_no_op() {
        let field = InputField::new("abc");
        let runner = Runner::new(&field, email_rules());
        drop(field);

        assert_eq!(runner.run(true).await, Ok(None));
    }
}

//! Asynchronous validation rules and their evaluation.

use crate::{DirectiveError, RULES_ATTR, Value};
use futures::future::{BoxFuture, FutureExt, join_all};
use getset::{CopyGetters, Getters};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type RuleFn = dyn Fn(Value) -> BoxFuture<'static, Value> + Send + Sync;

/// An opaque asynchronous rule.
///
/// A rule resolves to `true` when the value is valid, and to `false` or an error
/// message when it is not. Any other result breaks the rule contract.
#[derive(Clone)]
pub struct Rule {
    f: Arc<RuleFn>,
}

impl Rule {
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Into<Value> + 'static,
    {
        Self {
            f: Arc::new(move |value: Value| f(value).map(Into::<Value>::into).boxed()),
        }
    }

    pub fn call(&self, value: Value) -> BoxFuture<'static, Value> {
        (self.f)(value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

pub type RuleSet = Vec<Rule>;

/// The aggregated result of one evaluation of a rule set.
#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters)]
pub struct ValidationOutcome {
    #[getset(get = "pub")]
    error_messages: Vec<String>,
    #[getset(get_copy = "pub")]
    is_valid: bool,
}

impl ValidationOutcome {
    pub fn new(error_messages: Vec<String>) -> Self {
        let is_valid = error_messages.is_empty();
        Self {
            error_messages,
            is_valid,
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, bool) {
        (self.error_messages, self.is_valid)
    }
}

/// Runs every rule against `value` concurrently and waits for all of them.
///
/// There is no short-circuit on the first failure: all rules run so the outcome
/// carries the complete error set, ordered by rule declaration rather than by the
/// order in which the rules resolved.
pub async fn evaluate(
    rules: &[Rule],
    value: &Value,
) -> Result<ValidationOutcome, DirectiveError> {
    let results = join_all(rules.iter().map(|rule| rule.call(value.clone()))).await;

    let mut error_messages = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Value::Bool(true) => {}
            Value::Bool(false) => error_messages.push(String::new()),
            Value::Text(message) => error_messages.push(message),
            other => {
                return Err(DirectiveError::RuleContract {
                    attr: RULES_ATTR.to_string(),
                    index,
                    received: other.type_name().to_string(),
                });
            }
        }
    }

    Ok(ValidationOutcome::new(error_messages))
}

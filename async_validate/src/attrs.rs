//! The element's attribute snapshot and the rule set extracted from it.

use crate::rules::{Rule, RuleSet};
use crate::{DirectiveError, Value};
use indexmap::IndexMap;

/// The attribute carrying the ordered rule sequence.
pub const RULES_ATTR: &str = "async-rules";

/// A single attribute value as bound on the element.
#[derive(Clone, Debug)]
pub enum Attr {
    Value(Value),
    Rules(RuleSet),
}

impl Attr {
    pub fn rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Attr::Rules(rules.into_iter().collect())
    }
}

impl From<RuleSet> for Attr {
    fn from(rules: RuleSet) -> Self {
        Attr::Rules(rules)
    }
}

impl From<Value> for Attr {
    fn from(value: Value) -> Self {
        Attr::Value(value)
    }
}

impl From<&str> for Attr {
    fn from(s: &str) -> Self {
        Attr::Value(Value::from(s))
    }
}

/// Attributes in declaration order.
pub type Attrs = IndexMap<String, Attr>;

/// Reads the rule set out of an attribute snapshot.
///
/// `Ok(None)` means there is nothing to validate: the attribute is missing, falsy,
/// or an empty rule sequence. The caller must then leave the instance untouched.
pub fn extract_rules(attrs: &Attrs) -> Result<Option<RuleSet>, DirectiveError> {
    match attrs.get(RULES_ATTR) {
        None => Ok(None),
        Some(Attr::Rules(rules)) if rules.is_empty() => Ok(None),
        Some(Attr::Rules(rules)) => Ok(Some(rules.clone())),
        Some(Attr::Value(value)) if !value.is_truthy() => Ok(None),
        Some(Attr::Value(value)) => Err(DirectiveError::Shape {
            attr: RULES_ATTR.to_string(),
            received: value.type_name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs_with(attr: impl Into<Attr>) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.insert("label".to_string(), Attr::from("Email"));
        attrs.insert(RULES_ATTR.to_string(), attr.into());
        attrs
    }

    #[test]
    fn test_missing_or_falsy_rules_mean_nothing_to_validate() {
        assert!(extract_rules(&Attrs::new()).unwrap().is_none());

        for falsy in [
            Value::Null,
            Value::from(false),
            Value::from(0),
            Value::from(""),
        ] {
            assert!(extract_rules(&attrs_with(falsy)).unwrap().is_none());
        }

        assert!(extract_rules(&attrs_with(RuleSet::new())).unwrap().is_none());
    }

    #[test]
    fn test_rules_are_returned_in_order() {
        let attrs = attrs_with(Attr::rules([
            Rule::new(|_| async { true }),
            Rule::new(|_| async { false }),
        ]));

        assert_eq!(extract_rules(&attrs).unwrap().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_non_sequence_is_a_shape_error() {
        let res = extract_rules(&attrs_with("not-an-array"));

        assert_eq!(
            res.as_ref().map(|r| r.is_some()),
            Err(&DirectiveError::Shape {
                attr: RULES_ATTR.to_string(),
                received: "string".to_string(),
            })
        );
        assert_eq!(
            res.unwrap_err().to_string(),
            "The type of property async-rules must be an array, but received string"
        );

        // A list of plain values is not a rule sequence either.
        let res = extract_rules(&attrs_with(Value::from(vec![Value::from(true)])));
        assert!(matches!(res, Err(DirectiveError::Shape { .. })));
    }
}

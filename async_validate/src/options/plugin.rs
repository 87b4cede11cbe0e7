use super::{DebounceInterval, parse_number_prop};
use crate::ConfigError;
use std::collections::HashMap;

/// Plugin-wide options, given once when the plugin is installed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PluginOptions {
    debounce_interval: Option<f64>,
}

impl PluginOptions {
    pub const DEBOUNCE_INTERVAL: &'static str = "debounceInterval";

    pub fn new() -> Self {
        Self::default()
    }

    /// Default debounce interval in milliseconds for directives that don't set one.
    pub fn debounce_interval(mut self, ms: f64) -> Self {
        self.debounce_interval = Some(ms);
        self
    }

    /// Reads the options from raw string properties. Unknown keys are ignored.
    pub fn from_props(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let options = Self {
            debounce_interval: parse_number_prop(Self::DEBOUNCE_INTERVAL, props)?,
        };
        options.validated_interval()?;
        Ok(options)
    }

    pub(crate) fn validated_interval(&self) -> Result<Option<DebounceInterval>, ConfigError> {
        self.debounce_interval
            .map(|ms| DebounceInterval::from_millis(Self::DEBOUNCE_INTERVAL, ms))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(value: &str) -> HashMap<String, String> {
        let mut props = HashMap::new();
        props.insert(PluginOptions::DEBOUNCE_INTERVAL.to_string(), value.to_string());
        props
    }

    #[test]
    fn test_from_props() {
        let options = PluginOptions::from_props(&props(" 250 ")).unwrap();
        assert_eq!(options, PluginOptions::new().debounce_interval(250.0));

        let options = PluginOptions::from_props(&HashMap::new()).unwrap();
        assert_eq!(options.validated_interval(), Ok(None));
    }

    #[test]
    fn test_from_props_bad_inputs() {
        for bad in ["hello", "", "3OO"] {
            let res = PluginOptions::from_props(&props(bad));
            assert!(
                matches!(&res, Err(ConfigError::InvalidValue { name, .. }) if name == "debounceInterval"),
                "Expected InvalidValue error for input '{}', but got {:?}",
                bad,
                res
            );
        }

        for bad in ["-1", "NaN", "inf"] {
            let res = PluginOptions::from_props(&props(bad));
            assert!(
                matches!(&res, Err(ConfigError::ValidationFailed { name, .. }) if name == "debounceInterval"),
                "Expected ValidationFailed error for input '{}', but got {:?}",
                bad,
                res
            );
        }
    }
}

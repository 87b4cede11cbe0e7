//! The `async-validate` directive: the entry points the host calls on bind and
//! on every component update.

use crate::attrs::{Attr, Attrs, extract_rules};
use crate::debounce;
use crate::options::{
    DebounceInterval, DirectiveBinding, PluginOptions, validate_debounce_interval,
};
use crate::runner::Runner;
use crate::{ConfigError, DirectiveError, HostComponent, Value};
use std::sync::Arc;

/// The host's node descriptor for the element the directive is bound to.
#[derive(Debug)]
pub struct VNode<C> {
    pub component_instance: Option<Arc<C>>,
    pub attrs: Arc<Attrs>,
    /// The bound `value` prop, diffed across updates.
    pub value: Option<Value>,
}

impl<C> VNode<C> {
    pub fn new(component: &Arc<C>) -> Self {
        Self {
            component_instance: Some(component.clone()),
            ..Self::detached()
        }
    }

    /// A node that does not resolve to a component instance.
    pub fn detached() -> Self {
        Self {
            component_instance: None,
            attrs: Arc::new(Attrs::new()),
            value: None,
        }
    }

    pub fn attr(mut self, name: impl Into<String>, attr: impl Into<Attr>) -> Self {
        Arc::make_mut(&mut self.attrs).insert(name.into(), attr.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl<C> Clone for VNode<C> {
    fn clone(&self) -> Self {
        Self {
            component_instance: self.component_instance.clone(),
            attrs: self.attrs.clone(),
            value: self.value.clone(),
        }
    }
}

/// The installed plugin. Holds the plugin-wide default debounce interval.
#[derive(Clone, Debug, Default)]
pub struct AsyncValidate {
    default_interval: Option<DebounceInterval>,
}

impl AsyncValidate {
    /// Installs the plugin. An invalid default interval fails immediately.
    pub fn new(default_interval: Option<f64>) -> Result<Self, ConfigError> {
        let options = match default_interval {
            Some(ms) => PluginOptions::new().debounce_interval(ms),
            None => PluginOptions::new(),
        };
        Self::with_options(&options)
    }

    pub fn with_options(options: &PluginOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            default_interval: options.validated_interval()?,
        })
    }

    pub fn default_interval(&self) -> Option<DebounceInterval> {
        self.default_interval
    }

    /// Attaches the directive: installs the initial runner without running it.
    ///
    /// Validation then happens on the next update or on a forced
    /// [`HostComponent::validate_async`] call.
    pub fn bind<C: HostComponent>(
        &self,
        binding: &DirectiveBinding,
        vnode: &VNode<C>,
    ) -> Result<(), DirectiveError> {
        let Some(component) = &vnode.component_instance else {
            return Ok(());
        };
        validate_debounce_interval(binding)?;

        let runner = Runner::new(component, vnode.attrs.clone());
        component.validation_state().install_runner(runner);
        Ok(())
    }

    /// Re-validates after a component update, debounced.
    ///
    /// Nothing happens when the bound value did not change, even if the rules did.
    /// Otherwise a new runner is installed right away (so a forced validation
    /// before the timer fires already uses it) and a debounced run is scheduled.
    pub fn component_updated<C: HostComponent>(
        &self,
        binding: &DirectiveBinding,
        vnode: &VNode<C>,
        old_vnode: &VNode<C>,
    ) -> Result<(), DirectiveError> {
        let Some(component) = &vnode.component_instance else {
            return Ok(());
        };
        let interval =
            DebounceInterval::resolve(validate_debounce_interval(binding)?, self.default_interval);

        if extract_rules(&vnode.attrs)?.is_none() {
            return Ok(());
        }
        if vnode.value == old_vnode.value {
            return Ok(());
        }

        let runtime = debounce::runtime()?;
        let runner = Runner::new(component, vnode.attrs.clone());
        component.validation_state().install_runner(runner);
        debounce::schedule(&runtime, component, interval);
        Ok(())
    }
}

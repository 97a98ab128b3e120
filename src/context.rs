//! Wiring of the alert subsystem from a [`Config`].

use crate::alert_type::{AlertEvent, AlertType};
use crate::bus::EventBus;
use crate::config::Config;
use crate::dispatcher::AlertDispatcher;
use crate::error::AlertError;
use crate::facade::Alert;
use crate::handler::{AlertHandler, ConsoleHandler};
use crate::registry::OverrideRegistry;
use std::sync::Arc;
use tracing::info;

/// A configured alert subsystem: the facade plus the dispatcher.
pub struct AlertContext {
    alert: Alert,
    dispatcher: AlertDispatcher,
    config: Config,
}

impl AlertContext {
    /// Creates a new `AlertContextBuilder` for the given configuration.
    pub fn builder(config: Config) -> AlertContextBuilder {
        AlertContextBuilder::new(config)
    }

    pub fn alert(&self) -> &Alert {
        &self.alert
    }

    pub fn dispatcher(&self) -> &AlertDispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &OverrideRegistry {
        self.dispatcher.registry()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

pub struct AlertContextBuilder {
    config: Config,
    registry: OverrideRegistry,
    bindings: Vec<AlertType>,
    handler_override: Option<Box<dyn AlertHandler>>,
    bus_override: Option<Arc<EventBus>>,
    install_listeners: Option<bool>,
}

impl AlertContextBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: OverrideRegistry::new(),
            bindings: Vec::new(),
            handler_override: None,
            bus_override: None,
            install_listeners: None,
        }
    }

    /// Registers a custom alert type so it gets a topic and can be named in
    /// `overrides`.
    pub fn register<T: AlertEvent>(mut self) -> Self {
        self.registry.add_custom_type::<T>();
        self
    }

    /// Binds `T` to the standard category it is a kind of. Applied after
    /// the configured overrides, so it wins over them.
    pub fn bind<T: AlertEvent>(mut self) -> Self {
        self.bindings.push(AlertType::of::<T>());
        self
    }

    /// Replaces the default console handler behind the facade.
    pub fn handler(mut self, handler: impl AlertHandler + 'static) -> Self {
        self.handler_override = Some(Box::new(handler));
        self
    }

    /// Shares an existing event bus instead of creating one.
    pub fn bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus_override = Some(bus);
        self
    }

    /// Overrides `dispatch.install_standard_listeners` from the config.
    pub fn install_standard_listeners(mut self, install: bool) -> Self {
        self.install_listeners = Some(install);
        self
    }

    /// Builds the context.
    ///
    /// # Returns
    /// * `Err(AlertError::Configuration)` if an override names an unknown
    ///   type or binds a type to a category it is not a kind of
    pub fn build(self) -> Result<AlertContext, AlertError> {
        let mut registry = self.registry;
        registry.apply_overrides(&self.config.overrides)?;
        for alert_type in self.bindings {
            let category = alert_type.kind_of().ok_or_else(|| {
                AlertError::config(format!(
                    "'{}' is not a kind of any standard alert",
                    alert_type
                ))
            })?;
            registry.bind(category, alert_type)?;
        }

        let handler = self
            .handler_override
            .unwrap_or_else(|| {
                Box::new(ConsoleHandler::from_config(&self.config.console)) as Box<dyn AlertHandler>
            });
        let alert = Alert::from_boxed(handler);

        let bus = self.bus_override.unwrap_or_default();
        let dispatcher = AlertDispatcher::new(Arc::new(registry), bus);

        let install = self
            .install_listeners
            .unwrap_or(self.config.dispatch.install_standard_listeners);
        if install {
            dispatcher.install_standard_listeners();
        }

        info!(
            overridden = dispatcher.registry().has_overrides(),
            custom = dispatcher.registry().custom_alerts().len(),
            "Alert context built"
        );

        Ok(AlertContext {
            alert,
            dispatcher,
            config: self.config,
        })
    }
}

//! Dispatcher configuration

use crate::error::HandlerFailure;
use std::env;
use std::fmt;
use std::sync::Arc;

/// Environment variable read by [`EventConfig::from_env`]
pub const LOG_EVENTS_ENV: &str = "UNOBSERVABLE_LOG_EVENTS";

/// Callback notified of every handler failure suppressed during dispatch.
pub type FailureHook = Arc<dyn Fn(&HandlerFailure) + Send + Sync>;

/// Event configuration
#[derive(Clone)]
pub struct EventConfig {
    /// Enable event logging
    pub enable_logging: bool,

    /// Optional diagnostic hook for suppressed handler failures
    pub failure_hook: Option<FailureHook>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            failure_hook: None,
        }
    }
}

impl fmt::Debug for EventConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventConfig")
            .field("enable_logging", &self.enable_logging)
            .field("failure_hook", &self.failure_hook.is_some())
            .finish()
    }
}

impl EventConfig {
    /// Create config from environment variables.
    ///
    /// `UNOBSERVABLE_LOG_EVENTS=0|false` disables logging; anything else (or
    /// an unset variable) keeps the default.
    pub fn from_env() -> Self {
        let enable_logging = env::var(LOG_EVENTS_ENV)
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);

        Self {
            enable_logging,
            failure_hook: None,
        }
    }

    /// Report a suppressed failure to the hook, if any
    pub(crate) fn notify(&self, failure: &HandlerFailure) {
        if let Some(hook) = &self.failure_hook {
            hook(failure);
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Event configuration builder
pub struct EventBuilder {
    config: EventConfig,
}

impl EventBuilder {
    /// Create new event builder
    pub fn new() -> Self {
        Self {
            config: EventConfig::default(),
        }
    }

    /// Enable/disable logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.config.enable_logging = enabled;
        self
    }

    /// Install a failure hook
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HandlerFailure) + Send + Sync + 'static,
    {
        self.config.failure_hook = Some(Arc::new(hook));
        self
    }

    /// Finish with the configuration only
    pub fn config(self) -> EventConfig {
        self.config
    }

    /// Build the event
    pub fn build<A>(self) -> crate::Event<A> {
        crate::Event::with_config(self.config)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

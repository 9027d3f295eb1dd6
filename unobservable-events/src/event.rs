//! Multicast event dispatcher

use crate::args::Args;
use crate::config::EventConfig;
use crate::error::{EventError, HandlerError, HandlerFailure};
use crate::handler::{Handler, HandlerSpec};
use crate::name::EventName;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Named multicast point owning an ordered list of handlers.
///
/// Handlers run synchronously, in registration order, on the thread that
/// invokes the event. A failing handler (returning `Err` or panicking) never
/// prevents the remaining handlers from running.
///
/// Registering or unregistering handlers from inside a running handler is
/// allowed, but whether the change applies to the dispatch already in
/// progress is undefined.
///
/// # Examples
///
/// ```rust
/// use unobservable_events::{args, Args, Event};
///
/// let event: Event = Event::new();
/// assert!(!event.invoke(&args![]));
///
/// let handler = event.register_fn(|args: &Args| {
///     assert_eq!(args.len(), 2);
///     Ok(())
/// });
/// assert!(event.invoke(&args!["a", "b"]));
///
/// assert_eq!(event.unregister_handler(&handler), Some(handler));
/// assert!(event.is_empty());
/// ```
pub struct Event<A = Args> {
    name: Option<EventName>,
    handlers: RwLock<Vec<Handler<A>>>,
    config: EventConfig,
}

impl<A> Event<A> {
    /// Create new event
    pub fn new() -> Self {
        Self::with_config(EventConfig::default())
    }

    /// Create event with custom config
    pub fn with_config(config: EventConfig) -> Self {
        Self {
            name: None,
            handlers: RwLock::new(Vec::new()),
            config,
        }
    }

    pub(crate) fn named(name: EventName, config: EventConfig) -> Self {
        Self {
            name: Some(name),
            ..Self::with_config(config)
        }
    }

    /// Name this event was created for, if it belongs to an event map
    pub fn name(&self) -> Option<&EventName> {
        self.name.as_ref()
    }

    /// Register a handler so that it will be invoked when the event fires.
    ///
    /// Returns the resolved handler; keep it to unregister later. The same
    /// handler may be registered several times and will then run once per
    /// registration.
    pub fn register(&self, spec: impl Into<HandlerSpec<A>>) -> Result<Handler<A>, EventError> {
        let handler = spec.into().resolve()?;
        self.push(handler.clone());
        Ok(handler)
    }

    /// Register an inline closure
    pub fn register_fn<F>(&self, f: F) -> Handler<A>
    where
        F: Fn(&A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let handler = Handler::from_fn(f);
        self.push(handler.clone());
        handler
    }

    fn push(&self, handler: Handler<A>) {
        if self.config.enable_logging {
            debug!(
                "Registered handler {} on event {}",
                handler.describe(),
                self.label()
            );
        }
        self.handlers.write().push(handler);
    }

    /// Unregister one occurrence of a handler.
    ///
    /// Resolution errors are reported; a handler that is not registered is
    /// not an error and yields `Ok(None)`.
    pub fn unregister(
        &self,
        spec: impl Into<HandlerSpec<A>>,
    ) -> Result<Option<Handler<A>>, EventError> {
        let handler = spec.into().resolve()?;
        Ok(self.unregister_handler(&handler))
    }

    /// Remove the first occurrence of `handler`, returning it if found
    pub fn unregister_handler(&self, handler: &Handler<A>) -> Option<Handler<A>> {
        let removed = {
            let mut handlers = self.handlers.write();
            handlers
                .iter()
                .position(|h| h == handler)
                .map(|index| handlers.remove(index))
        };

        if self.config.enable_logging {
            match &removed {
                Some(h) => debug!("Unregistered handler {} from event {}", h.describe(), self.label()),
                None => debug!(
                    "Handler {} is not registered on event {}",
                    handler.describe(),
                    self.label()
                ),
            }
        }

        removed
    }

    /// Pass `args` to every handler.
    ///
    /// Returns `true` if there was at least one handler and `false` otherwise.
    /// Handler failures are logged and reported to the failure hook but never
    /// propagated.
    pub fn invoke(&self, args: &A) -> bool {
        let snapshot = self.handlers.read().clone();
        if snapshot.is_empty() {
            return false;
        }

        for (position, handler) in snapshot.iter().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.call(args)));

            let err = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(payload) => HandlerError::Panicked(panic_message(payload.as_ref())),
            };

            self.report(position, handler, err);
        }

        true
    }

    /// Alias for [`invoke`](Self::invoke)
    pub fn call(&self, args: &A) -> bool {
        self.invoke(args)
    }

    fn report(&self, position: usize, handler: &Handler<A>, err: HandlerError) {
        if self.config.enable_logging {
            error!(
                "Handler {} on event {} failed: {}",
                handler.describe(),
                self.label(),
                err
            );
        }

        let failure = HandlerFailure {
            event: self.name.clone(),
            position,
            handler: handler.describe(),
            error: err,
        };

        let notified = panic::catch_unwind(AssertUnwindSafe(|| self.config.notify(&failure)));
        if let Err(payload) = notified {
            if self.config.enable_logging {
                error!(
                    "Failure hook panicked on event {}: {}",
                    self.label(),
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    /// Snapshot of the registered handlers, in registration order
    pub fn handlers(&self) -> Vec<Handler<A>> {
        self.handlers.read().clone()
    }

    /// Get handler count
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    /// Whether `handler` is registered at least once
    pub fn contains(&self, handler: &Handler<A>) -> bool {
        self.handlers.read().iter().any(|h| h == handler)
    }

    /// Clear all handlers
    pub fn clear(&self) {
        self.handlers.write().clear();
        if self.config.enable_logging {
            debug!("Cleared all handlers of event {}", self.label());
        }
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

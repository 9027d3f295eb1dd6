//! Event handlers and handler resolution
//!
//! A handler can be supplied in three ways:
//!
//! 1. a callable ([`Handler`]) or an object implementing [`MethodReceiver`]
//!    (its `call` method is used),
//! 2. a receiver plus the name of a method to invoke on it,
//! 3. an inline closure (the "block" of a [`HandlerSpec`]).
//!
//! All three resolve to a [`Handler`], which is what dispatchers store and
//! compare when unregistering.

use crate::error::{EventError, HandlerError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Method used when a receiver is registered on its own.
pub const CALL_METHOD: &str = "call";

/// Shared callable stored by [`Handler::Callable`].
pub type Callback<A> = Arc<dyn Fn(&A) -> Result<(), HandlerError> + Send + Sync>;

/// Object that can be targeted by name, standing in for "object + method".
///
/// The method is late-bound: it is looked up on every invocation, so an
/// unknown name only fails when the event fires.
pub trait MethodReceiver<A>: Send + Sync {
    /// Invoke `method` with `args`
    fn invoke_method(&self, method: &str, args: &A) -> Result<(), HandlerError>;

    /// Name used in diagnostics
    fn receiver_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Resolved event handler.
///
/// Equality is identity-based: two callables are equal when they share the
/// same allocation, two bound methods when they share the receiver allocation
/// and the method name.
pub enum Handler<A> {
    /// Plain callable
    Callable(Callback<A>),

    /// Method bound to a receiver
    BoundMethod {
        receiver: Arc<dyn MethodReceiver<A>>,
        method: Arc<str>,
    },
}

impl<A> Handler<A> {
    /// Wrap a closure
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Handler::Callable(Arc::new(f))
    }

    /// Bind `method` on `receiver`
    pub fn bound<R>(receiver: Arc<R>, method: impl AsRef<str>) -> Self
    where
        R: MethodReceiver<A> + 'static,
    {
        Handler::BoundMethod {
            receiver,
            method: Arc::from(method.as_ref()),
        }
    }

    /// Invoke the handler
    pub fn call(&self, args: &A) -> Result<(), HandlerError> {
        match self {
            Handler::Callable(f) => f(args),
            Handler::BoundMethod { receiver, method } => receiver.invoke_method(method, args),
        }
    }

    /// Short description used in logs and failure reports
    pub fn describe(&self) -> String {
        match self {
            Handler::Callable(f) => format!("callable@{:p}", Arc::as_ptr(f) as *const ()),
            Handler::BoundMethod { receiver, method } => {
                format!("{}#{}", receiver.receiver_name(), method)
            }
        }
    }
}

impl<A> Clone for Handler<A> {
    fn clone(&self) -> Self {
        match self {
            Handler::Callable(f) => Handler::Callable(Arc::clone(f)),
            Handler::BoundMethod { receiver, method } => Handler::BoundMethod {
                receiver: Arc::clone(receiver),
                method: Arc::clone(method),
            },
        }
    }
}

impl<A> PartialEq for Handler<A> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Callable(a), Handler::Callable(b)) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (
                Handler::BoundMethod {
                    receiver: ra,
                    method: ma,
                },
                Handler::BoundMethod {
                    receiver: rb,
                    method: mb,
                },
            ) => Arc::as_ptr(ra) as *const () == Arc::as_ptr(rb) as *const () && ma == mb,
            _ => false,
        }
    }
}

impl<A> Eq for Handler<A> {}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.describe()).finish()
    }
}

/// One positional argument of a handler specification.
pub enum HandlerArg<A> {
    /// Something directly callable
    Handler(Handler<A>),

    /// A receiver object
    Receiver(Arc<dyn MethodReceiver<A>>),

    /// A method name
    Method(String),

    /// Any other value (never callable)
    Value(Value),
}

impl<A> HandlerArg<A> {
    /// Receiver argument
    pub fn receiver<R>(receiver: Arc<R>) -> Self
    where
        R: MethodReceiver<A> + 'static,
    {
        HandlerArg::Receiver(receiver)
    }

    fn describe(&self) -> String {
        match self {
            HandlerArg::Handler(h) => h.describe(),
            HandlerArg::Receiver(r) => r.receiver_name().to_string(),
            HandlerArg::Method(m) => format!("method name `{}`", m),
            HandlerArg::Value(v) => format!("value {}", v),
        }
    }
}

impl<A> From<Handler<A>> for HandlerArg<A> {
    fn from(handler: Handler<A>) -> Self {
        HandlerArg::Handler(handler)
    }
}

impl<A> From<&Handler<A>> for HandlerArg<A> {
    fn from(handler: &Handler<A>) -> Self {
        HandlerArg::Handler(handler.clone())
    }
}

impl<A, R> From<Arc<R>> for HandlerArg<A>
where
    R: MethodReceiver<A> + 'static,
{
    fn from(receiver: Arc<R>) -> Self {
        HandlerArg::Receiver(receiver)
    }
}

impl<A> From<&str> for HandlerArg<A> {
    fn from(method: &str) -> Self {
        HandlerArg::Method(method.to_string())
    }
}

impl<A> From<String> for HandlerArg<A> {
    fn from(method: String) -> Self {
        HandlerArg::Method(method)
    }
}

impl<A> From<Value> for HandlerArg<A> {
    fn from(value: Value) -> Self {
        HandlerArg::Value(value)
    }
}

/// Raw arguments of a register/unregister call.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use unobservable_events::{Args, HandlerError, HandlerSpec, MethodReceiver};
///
/// struct Logger;
///
/// impl MethodReceiver<Args> for Logger {
///     fn invoke_method(&self, method: &str, _args: &Args) -> Result<(), HandlerError> {
///         match method {
///             "log" => Ok(()),
///             other => Err(HandlerError::undefined_method("Logger", other)),
///         }
///     }
/// }
///
/// let spec: HandlerSpec<Args> = HandlerSpec::new().arg(Arc::new(Logger)).arg("log");
/// assert!(spec.resolve().is_ok());
///
/// let spec: HandlerSpec<Args> = HandlerSpec::new();
/// assert!(spec.resolve().is_err());
/// ```
pub struct HandlerSpec<A> {
    args: Vec<HandlerArg<A>>,
    block: Option<Handler<A>>,
}

impl<A> HandlerSpec<A> {
    /// Empty specification
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            block: None,
        }
    }

    /// Specification from positional arguments
    pub fn from_args(args: Vec<HandlerArg<A>>) -> Self {
        Self { args, block: None }
    }

    /// Specification from an inline closure
    pub fn from_block<F>(f: F) -> Self
    where
        F: Fn(&A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self::new().block(f)
    }

    /// Append a positional argument
    pub fn arg(mut self, arg: impl Into<HandlerArg<A>>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Attach an inline closure
    pub fn block<F>(mut self, f: F) -> Self
    where
        F: Fn(&A) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.block = Some(Handler::from_fn(f));
        self
    }

    /// Number of positional arguments
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Normalize into a [`Handler`].
    ///
    /// Three or more positional arguments are always rejected. Otherwise an
    /// inline closure takes precedence and any positional arguments are
    /// ignored.
    pub fn resolve(self) -> Result<Handler<A>, EventError> {
        let Self { args, block } = self;

        if args.len() > 2 {
            return Err(EventError::TooManyArguments(args.len()));
        }

        if let Some(handler) = block {
            if !args.is_empty() {
                debug!(
                    "Ignoring {} positional handler argument(s) in favour of the inline handler",
                    args.len()
                );
            }
            return Ok(handler);
        }

        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (None, _) => Err(EventError::NoHandler),
            (Some(HandlerArg::Handler(handler)), None) => Ok(handler),
            (Some(HandlerArg::Receiver(receiver)), None) => Ok(Handler::BoundMethod {
                receiver,
                method: Arc::from(CALL_METHOD),
            }),
            (Some(other), None) => Err(EventError::NotCallable(other.describe())),
            (Some(HandlerArg::Receiver(receiver)), Some(HandlerArg::Method(method))) => {
                Ok(Handler::BoundMethod {
                    receiver,
                    method: Arc::from(method),
                })
            }
            (Some(first), Some(second)) => Err(EventError::NotCallable(format!(
                "({}, {})",
                first.describe(),
                second.describe()
            ))),
        }
    }
}

impl<A> Default for HandlerSpec<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> From<Handler<A>> for HandlerSpec<A> {
    fn from(handler: Handler<A>) -> Self {
        Self::new().arg(handler)
    }
}

impl<A> From<&Handler<A>> for HandlerSpec<A> {
    fn from(handler: &Handler<A>) -> Self {
        Self::new().arg(handler.clone())
    }
}

impl<A, R> From<Arc<R>> for HandlerSpec<A>
where
    R: MethodReceiver<A> + 'static,
{
    fn from(receiver: Arc<R>) -> Self {
        Self::new().arg(HandlerArg::receiver(receiver))
    }
}

impl<A, R, M> From<(Arc<R>, M)> for HandlerSpec<A>
where
    R: MethodReceiver<A> + 'static,
    M: Into<String>,
{
    fn from((receiver, method): (Arc<R>, M)) -> Self {
        Self::new()
            .arg(HandlerArg::receiver(receiver))
            .arg(HandlerArg::Method(method.into()))
    }
}

impl<A> From<Vec<HandlerArg<A>>> for HandlerSpec<A> {
    fn from(args: Vec<HandlerArg<A>>) -> Self {
        Self::from_args(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        hits: AtomicUsize,
    }

    impl MethodReceiver<Args> for Counter {
        fn invoke_method(&self, method: &str, _args: &Args) -> Result<(), HandlerError> {
            match method {
                "call" | "bump" => {
                    self.hits.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                other => Err(HandlerError::undefined_method("Counter", other)),
            }
        }
    }

    fn counter() -> Arc<Counter> {
        Arc::new(Counter {
            hits: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_resolve_callable() {
        let handler: Handler<Args> = Handler::from_fn(|_| Ok(()));
        let resolved = HandlerSpec::from(handler.clone()).resolve().unwrap();
        assert_eq!(resolved, handler);
    }

    #[test]
    fn test_resolve_receiver_uses_call() {
        let c = counter();
        let resolved: Handler<Args> = HandlerSpec::from(c.clone()).resolve().unwrap();
        resolved.call(&Args::new()).unwrap();
        assert_eq!(c.hits.load(Ordering::SeqCst), 1);
        assert_eq!(resolved, Handler::bound(c, "call"));
    }

    #[test]
    fn test_resolve_bound_method() {
        let c = counter();
        let a: Handler<Args> = HandlerSpec::from((c.clone(), "bump")).resolve().unwrap();
        let b: Handler<Args> = HandlerSpec::from((c.clone(), "bump")).resolve().unwrap();
        let other: Handler<Args> = HandlerSpec::from((counter(), "bump")).resolve().unwrap();

        assert_eq!(a, b);
        assert_ne!(a, other);
        assert_ne!(a, Handler::bound(c, "call"));
    }

    #[test]
    fn test_missing_method_fails_late() {
        let handler: Handler<Args> = HandlerSpec::from((counter(), "missing")).resolve().unwrap();
        let err = handler.call(&Args::new()).unwrap_err();
        assert!(matches!(err, HandlerError::UndefinedMethod { .. }));
    }

    #[test]
    fn test_no_handler() {
        let err = HandlerSpec::<Args>::new().resolve().unwrap_err();
        assert_eq!(err, EventError::NoHandler);
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_not_callable() {
        let err = HandlerSpec::<Args>::new()
            .arg(json!(42))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, EventError::NotCallable(_)));

        let err = HandlerSpec::<Args>::new().arg("bump").resolve().unwrap_err();
        assert!(matches!(err, EventError::NotCallable(_)));

        let err = HandlerSpec::<Args>::new()
            .arg(json!("x"))
            .arg("bump")
            .resolve()
            .unwrap_err();
        assert!(matches!(err, EventError::NotCallable(_)));
    }

    #[test]
    fn test_too_many_arguments() {
        let err = HandlerSpec::<Args>::new()
            .arg(counter())
            .arg("bump")
            .arg(json!(1))
            .resolve()
            .unwrap_err();
        assert_eq!(err, EventError::TooManyArguments(3));

        let err = HandlerSpec::<Args>::new()
            .arg(json!(1))
            .arg(json!(2))
            .arg(json!(3))
            .block(|_| Ok(()))
            .resolve()
            .unwrap_err();
        assert_eq!(err, EventError::TooManyArguments(3));
    }

    #[test]
    fn test_block_takes_precedence() {
        let c = counter();
        let handler = HandlerSpec::new()
            .arg(c.clone())
            .arg("bump")
            .block(|_: &Args| Ok(()))
            .resolve()
            .unwrap();

        assert!(matches!(handler, Handler::Callable(_)));
        handler.call(&Args::new()).unwrap();
        assert_eq!(c.hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_distinct_closures_are_not_equal() {
        let a: Handler<Args> = Handler::from_fn(|_| Ok(()));
        let b: Handler<Args> = Handler::from_fn(|_| Ok(()));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}

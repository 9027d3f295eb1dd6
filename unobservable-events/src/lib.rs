//! Named, per-instance events for Rust objects
//!
//! This crate lets any object expose named *events* that callers attach
//! handlers to, and fire them synchronously to every attached handler.
//!
//! ## Features
//!
//! - **Multicast dispatcher** - Ordered handler lists with fault isolation
//! - **Declarations** - Types declare event names once, through composition too
//! - **Per-instance events** - Every object owns its own dispatchers, created lazily
//! - **Instance-level events** - Single objects can declare extra events
//! - **Flexible handlers** - Closures, callable receivers, or receiver + method name
//!
//! ## Quick Start
//!
//! ```rust
//! use once_cell::sync::Lazy;
//! use std::sync::Arc;
//! use unobservable_events::*;
//!
//! // Declare the events of a type
//! static BUTTON: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| {
//!     TypeDescriptor::builder("Button")
//!         .events(["clicked", "hovered"])
//!         .build()
//! });
//!
//! // Embed an event map in the type
//! struct Button {
//!     events: InstanceEventMap,
//! }
//!
//! impl Observable for Button {
//!     type Args = Args;
//!
//!     fn event_map(&self) -> &InstanceEventMap {
//!         &self.events
//!     }
//! }
//!
//! let button = Button { events: InstanceEventMap::new(&BUTTON) };
//!
//! // Attach a handler
//! button.event("clicked")?.register_fn(|args: &Args| {
//!     println!("clicked at {:?}", &args[..]);
//!     Ok(())
//! });
//!
//! // Fire the event
//! button.raise_event("clicked", &args![10, 20])?;
//!
//! // Undeclared events are rejected
//! assert!(button.raise_event("dragged", &args![]).is_err());
//! # Ok::<(), EventError>(())
//! ```
//!
//! ## Handler Forms
//!
//! ```rust,ignore
//! // Inline closure
//! event.register_fn(|args: &Args| Ok(()));
//!
//! // Receiver object, invoked through its `call` method
//! event.register(Arc::new(Logger))?;
//!
//! // Receiver + method name, looked up when the event fires
//! let handler = event.register((logger.clone(), "log"))?;
//! event.unregister((logger, "log"))?;
//! ```
//!
//! ## Error Handling
//!
//! Handlers that return an error or panic are logged and skipped; the
//! remaining handlers still run. Install a hook to observe failures:
//!
//! ```rust,ignore
//! let config = EventBuilder::new()
//!     .enable_logging(false)
//!     .on_failure(|failure| eprintln!("{}: {}", failure.handler, failure.error))
//!     .config();
//!
//! let events: InstanceEventMap = InstanceEventMap::with_config(&BUTTON, config);
//! ```

pub mod ancestry;
pub mod args;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod handler;
pub mod instance;
pub mod name;
pub mod observable;

pub use ancestry::instance_events_for;
pub use args::Args;
pub use config::{EventBuilder, EventConfig, FailureHook, LOG_EVENTS_ENV};
pub use descriptor::{DeclareOptions, TypeDescriptor, TypeDescriptorBuilder};
pub use error::{ErrorKind, EventError, HandlerError, HandlerFailure};
pub use event::Event;
pub use handler::{CALL_METHOD, Callback, Handler, HandlerArg, HandlerSpec, MethodReceiver};
pub use instance::InstanceEventMap;
pub use name::EventName;
pub use observable::Observable;

#[doc(hidden)]
pub mod __private {
    pub use once_cell;
    pub use serde_json;
}

//! Event capability for user types

use crate::descriptor::DeclareOptions;
use crate::error::EventError;
use crate::event::Event;
use crate::instance::InstanceEventMap;
use crate::name::EventName;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Implemented by types that expose named events.
///
/// Implementors embed an [`InstanceEventMap`] and hand it out from
/// [`event_map`](Observable::event_map); every other method is provided.
///
/// # Examples
///
/// ```rust
/// use once_cell::sync::Lazy;
/// use std::sync::Arc;
/// use unobservable_events::{args, Args, InstanceEventMap, Observable, TypeDescriptor};
///
/// static DOCUMENT: Lazy<Arc<TypeDescriptor>> =
///     Lazy::new(|| TypeDescriptor::builder("Document").events(["saved"]).build());
///
/// struct Document {
///     events: InstanceEventMap,
/// }
///
/// impl Document {
///     fn new() -> Self {
///         Self { events: InstanceEventMap::new(&DOCUMENT) }
///     }
///
///     fn save(&self) -> Result<(), unobservable_events::EventError> {
///         self.raise_event("saved", &args!["draft.txt"])
///     }
/// }
///
/// impl Observable for Document {
///     type Args = Args;
///
///     fn event_map(&self) -> &InstanceEventMap {
///         &self.events
///     }
/// }
///
/// let doc = Document::new();
/// doc.event("saved").unwrap().register_fn(|args: &Args| {
///     assert_eq!(args[0], "draft.txt");
///     Ok(())
/// });
/// doc.save().unwrap();
/// ```
pub trait Observable {
    /// Argument type shared by this object's events
    type Args;

    /// The object's event map
    fn event_map(&self) -> &InstanceEventMap<Self::Args>;

    /// Dispatcher for `name`
    fn event(&self, name: impl Into<EventName>) -> Result<Arc<Event<Self::Args>>, EventError> {
        self.event_map().event(name)
    }

    /// Fire `name` with `args`
    fn raise_event(&self, name: impl Into<EventName>, args: &Self::Args) -> Result<(), EventError> {
        self.event_map().raise_event(name, args)
    }

    /// Declare an instance-level event with an accessor
    fn define_event(&self, name: impl Into<EventName>) -> bool {
        self.event_map()
            .declare_instance_event(name, DeclareOptions::default())
    }

    /// Declare several instance-level events with accessors
    fn define_events<I, N>(&self, names: I) -> Vec<EventName>
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        self.event_map()
            .declare_instance_events(names, DeclareOptions::default())
    }

    /// Events this object exposes; instance-level only unless
    /// `include_type_level` is set
    fn instance_events(&self, include_type_level: bool) -> BTreeSet<EventName> {
        self.event_map().instance_declared_events(include_type_level)
    }
}

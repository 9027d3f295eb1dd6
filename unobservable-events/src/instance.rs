//! Per-instance event map

use crate::args::Args;
use crate::config::EventConfig;
use crate::descriptor::{DeclareOptions, Declarations, TypeDescriptor};
use crate::error::EventError;
use crate::event::Event;
use crate::name::EventName;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Lazily populated mapping from event name to [`Event`] for one object.
///
/// Embed one of these in every observable object. A dispatcher is created
/// the first time its name is looked up and the same `Arc` is returned for
/// the lifetime of the map; two maps never share a dispatcher.
///
/// Besides the events declared by its type, an instance can declare extra
/// events of its own with [`declare_instance_event`](Self::declare_instance_event).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use unobservable_events::{args, InstanceEventMap, TypeDescriptor};
///
/// let button = TypeDescriptor::builder("Button").events(["clicked"]).build();
/// let a: InstanceEventMap = InstanceEventMap::new(&button);
/// let b: InstanceEventMap = InstanceEventMap::new(&button);
///
/// let clicked = a.event("clicked").unwrap();
/// assert!(Arc::ptr_eq(&clicked, &a.event("clicked").unwrap()));
/// assert!(!Arc::ptr_eq(&clicked, &b.event("clicked").unwrap()));
///
/// assert!(a.raise_event("hovered", &args![]).is_err());
/// ```
pub struct InstanceEventMap<A = Args> {
    descriptor: Arc<TypeDescriptor>,
    declarations: Declarations,
    events: DashMap<EventName, Arc<Event<A>>>,
    config: EventConfig,
}

impl<A> InstanceEventMap<A> {
    /// Create an event map for an instance of `descriptor`
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Self {
        Self::with_config(descriptor, EventConfig::default())
    }

    /// Create an event map whose dispatchers use `config`
    pub fn with_config(descriptor: &Arc<TypeDescriptor>, config: EventConfig) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            declarations: Declarations::default(),
            events: DashMap::new(),
            config,
        }
    }

    /// Type this instance belongs to
    pub fn type_descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Whether `name` is declared at type or instance level
    pub fn has_event(&self, name: &str) -> bool {
        self.events.contains_key(name)
            || self.declarations.contains(name)
            || self.descriptor.declared_events(true).contains(name)
    }

    /// Get the dispatcher for `name`, creating it on first use.
    ///
    /// Fails with [`EventError::UndefinedEvent`] when the name is declared
    /// neither by the type (including its ancestry) nor by this instance.
    pub fn event(&self, name: impl Into<EventName>) -> Result<Arc<Event<A>>, EventError> {
        let name = name.into();

        if let Some(event) = self.events.get(&name) {
            return Ok(Arc::clone(event.value()));
        }

        if !self.has_event(&name) {
            return Err(EventError::UndefinedEvent(name));
        }

        let event = self
            .events
            .entry(name.clone())
            .or_insert_with(|| {
                if self.config.enable_logging {
                    debug!(
                        "Created event {} for an instance of {}",
                        name,
                        self.descriptor.name()
                    );
                }
                Arc::new(Event::named(name.clone(), self.config.clone()))
            })
            .value()
            .clone();

        Ok(event)
    }

    /// Dispatcher for `name` through its generated accessor.
    ///
    /// Only events declared with `generate_accessor` (at type or instance
    /// level) have one; others fail with [`EventError::UndefinedAccessor`].
    pub fn accessor(&self, name: impl Into<EventName>) -> Result<Arc<Event<A>>, EventError> {
        let name = name.into();
        if !self.declarations.has_accessor(&name) && !self.descriptor.has_accessor(&name) {
            return Err(EventError::UndefinedAccessor(name));
        }
        self.event(name)
    }

    /// Fire `name` with `args`, ignoring whether any handler ran
    pub fn raise_event(&self, name: impl Into<EventName>, args: &A) -> Result<(), EventError> {
        let event = self.event(name)?;
        event.invoke(args);
        Ok(())
    }

    /// Declare an event on this instance only.
    ///
    /// Returns `false` if this instance already declared `name`. Declaring a
    /// name the type already declares is allowed.
    pub fn declare_instance_event(
        &self,
        name: impl Into<EventName>,
        options: DeclareOptions,
    ) -> bool {
        let name = name.into();
        let created = self.declarations.declare(name.clone(), options);
        if created && self.config.enable_logging {
            debug!(
                "Declared instance event {} on an instance of {}",
                name,
                self.descriptor.name()
            );
        }
        created
    }

    /// Declare several instance events, in order; returns the new ones
    pub fn declare_instance_events<I, N>(&self, names: I, options: DeclareOptions) -> Vec<EventName>
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        names
            .into_iter()
            .map(Into::into)
            .filter(|name: &EventName| self.declare_instance_event(name.clone(), options))
            .collect()
    }

    /// Events declared on this instance, plus the type's when
    /// `include_type_level` is set
    pub fn instance_declared_events(&self, include_type_level: bool) -> BTreeSet<EventName> {
        let mut events = self.declarations.snapshot();
        if include_type_level {
            events.extend(self.descriptor.declared_events(true));
        }
        events
    }

    /// Names whose dispatcher has been created
    pub fn created_events(&self) -> BTreeSet<EventName> {
        self.events.iter().map(|e| e.key().clone()).collect()
    }
}

impl<A> fmt::Debug for InstanceEventMap<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceEventMap")
            .field("type", &self.descriptor.name())
            .field("instance_events", &self.declarations.snapshot())
            .field("created", &self.created_events())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::error::ErrorKind;
    use parking_lot::Mutex;
    use std::thread;

    fn widget_type() -> Arc<TypeDescriptor> {
        let mixin = TypeDescriptor::builder("Mixin").events(["one", "two"]).build();
        TypeDescriptor::builder("Widget")
            .with_event_support()
            .compose(&mixin)
            .events(["three", "four"])
            .build()
    }

    #[test]
    fn test_event_is_cached() {
        let map: InstanceEventMap = InstanceEventMap::new(&widget_type());
        let first = map.event("three").unwrap();
        let second = map.event("three").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name().map(|n| n.as_str()), Some("three"));
    }

    #[test]
    fn test_inherited_event_is_available() {
        let map: InstanceEventMap = InstanceEventMap::new(&widget_type());
        assert!(map.event("one").is_ok());
    }

    #[test]
    fn test_instances_do_not_share_events() {
        let t = widget_type();
        let a: InstanceEventMap = InstanceEventMap::new(&t);
        let b: InstanceEventMap = InstanceEventMap::new(&t);

        let ea = a.event("three").unwrap();
        let eb = b.event("three").unwrap();
        assert!(!Arc::ptr_eq(&ea, &eb));

        ea.register_fn(|_| Ok(()));
        assert_eq!(eb.handler_count(), 0);
    }

    #[test]
    fn test_undefined_event() {
        let map: InstanceEventMap = InstanceEventMap::new(&widget_type());
        let err = map.event("undeclared").unwrap_err();
        assert_eq!(err, EventError::UndefinedEvent(EventName::from("undeclared")));
        assert_eq!(err.kind(), ErrorKind::Name);
        assert!(map.created_events().is_empty());
    }

    #[test]
    fn test_slots_are_created_lazily() {
        let map: InstanceEventMap = InstanceEventMap::new(&widget_type());
        assert!(map.created_events().is_empty());

        map.event("four").unwrap();
        let created: Vec<_> = map.created_events().into_iter().collect();
        assert_eq!(created, vec![EventName::from("four")]);
    }

    #[test]
    fn test_instance_event_declaration() {
        let t = widget_type();
        let map: InstanceEventMap = InstanceEventMap::new(&t);
        let other: InstanceEventMap = InstanceEventMap::new(&t);

        assert!(map.declare_instance_event("extra", DeclareOptions::default()));
        assert!(!map.declare_instance_event("extra", DeclareOptions::default()));

        assert!(map.event("extra").is_ok());
        assert!(other.event("extra").is_err());
        assert!(!t.declared_events(true).contains("extra"));
    }

    #[test]
    fn test_instance_event_may_shadow_type_event() {
        let map: InstanceEventMap = InstanceEventMap::new(&widget_type());
        assert!(map.declare_instance_event("three", DeclareOptions::default()));

        let events = map.instance_declared_events(true);
        assert_eq!(events.len(), 4);
        assert!(map.event("three").is_ok());
    }

    #[test]
    fn test_instance_declared_events() {
        let map: InstanceEventMap = InstanceEventMap::new(&widget_type());
        map.declare_instance_events(["five", "six"], DeclareOptions::default());

        let own = map.instance_declared_events(false);
        assert_eq!(own.len(), 2);
        assert!(own.contains("five"));

        let all = map.instance_declared_events(true);
        assert_eq!(all.len(), 6);
        for name in ["one", "two", "three", "four", "five", "six"] {
            assert!(all.contains(name));
        }
    }

    #[test]
    fn test_accessor() {
        let t = TypeDescriptor::builder("Widget")
            .event("with")
            .event_with("without", DeclareOptions::without_accessor())
            .build();
        let map: InstanceEventMap = InstanceEventMap::new(&t);

        assert!(map.accessor("with").is_ok());
        assert_eq!(
            map.accessor("without").unwrap_err(),
            EventError::UndefinedAccessor(EventName::from("without"))
        );
        assert!(map.event("without").is_ok());

        map.declare_instance_event("solo", DeclareOptions::default());
        assert!(map.accessor("solo").is_ok());
    }

    #[test]
    fn test_raise_event() {
        let map: InstanceEventMap = InstanceEventMap::new(&widget_type());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        map.event("three")
            .unwrap()
            .register_fn(move |args: &Args| {
                sink.lock().push(args.clone());
                Ok(())
            });

        map.raise_event("three", &args![1, 2, 3]).unwrap();
        assert_eq!(*seen.lock(), vec![args![1, 2, 3]]);

        assert!(map.raise_event("four", &args![]).is_ok());
        assert!(map.raise_event("bar", &args![1, 2, 3]).is_err());
    }

    #[test]
    fn test_concurrent_first_lookup_yields_one_event() {
        let map: Arc<InstanceEventMap> = Arc::new(InstanceEventMap::new(&widget_type()));

        let events: Vec<Arc<Event>> = (0..8)
            .map(|_| {
                let map = map.clone();
                thread::spawn(move || map.event("one").unwrap())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect();

        for e in &events {
            assert!(Arc::ptr_eq(e, &events[0]));
        }
    }
}

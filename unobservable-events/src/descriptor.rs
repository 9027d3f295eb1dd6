//! Type descriptors and event declarations
//!
//! A [`TypeDescriptor`] stands for a declarable unit (a struct, a trait-like
//! mixin, a base type). It records the events the unit declares itself and
//! the sources it is composed from; [`ancestry`](crate::ancestry) walks that
//! graph to compute the events an instance actually exposes.

use crate::error::EventError;
use crate::name::EventName;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Options accepted when declaring an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclareOptions {
    /// Record an accessor for the event (default `true`)
    pub generate_accessor: bool,
}

impl Default for DeclareOptions {
    fn default() -> Self {
        Self {
            generate_accessor: true,
        }
    }
}

impl DeclareOptions {
    /// Options that skip accessor generation
    pub fn without_accessor() -> Self {
        Self {
            generate_accessor: false,
        }
    }
}

/// Set of declared names plus the names that received an accessor.
///
/// Shared by type-level and instance-level declarations.
#[derive(Debug, Default)]
pub(crate) struct Declarations {
    events: RwLock<BTreeSet<EventName>>,
    accessors: RwLock<BTreeSet<EventName>>,
}

impl Declarations {
    /// Declare `name`; returns `true` if it was not declared before.
    ///
    /// An accessor, once recorded, is never removed.
    pub(crate) fn declare(&self, name: EventName, options: DeclareOptions) -> bool {
        if options.generate_accessor {
            self.accessors.write().insert(name.clone());
        }
        self.events.write().insert(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.events.read().contains(name)
    }

    pub(crate) fn has_accessor(&self, name: &str) -> bool {
        self.accessors.read().contains(name)
    }

    pub(crate) fn snapshot(&self) -> BTreeSet<EventName> {
        self.events.read().clone()
    }

    pub(crate) fn extend_into(&self, out: &mut BTreeSet<EventName>) {
        out.extend(self.events.read().iter().cloned());
    }
}

/// Declarable unit with its own events and composed sources.
pub struct TypeDescriptor {
    name: String,
    supports_events: bool,
    composed: Vec<Arc<TypeDescriptor>>,
    declarations: Declarations,
}

impl TypeDescriptor {
    /// Start building a descriptor
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder::new(name)
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sources this type is composed from, in precedence order
    pub fn composed_sources(&self) -> &[Arc<TypeDescriptor>] {
        &self.composed
    }

    /// Whether the type opted into events itself
    pub fn declares_support(&self) -> bool {
        self.supports_events
    }

    /// Whether the type can declare events: it opted in or composes a
    /// source that did.
    pub fn supports_events(&self) -> bool {
        self.supports_events || self.composed.iter().any(|c| c.supports_events())
    }

    /// Declare a named event on this type.
    ///
    /// Returns `Ok(true)` if the event is new and `Ok(false)` if the type
    /// already declared it.
    pub fn declare_event(
        &self,
        name: impl Into<EventName>,
        options: DeclareOptions,
    ) -> Result<bool, EventError> {
        if !self.supports_events() {
            return Err(EventError::EventsNotSupported(self.name.clone()));
        }

        let name = name.into();
        let created = self.declarations.declare(name.clone(), options);
        if created {
            debug!("Declared event {} on type {}", name, self.name);
        }
        Ok(created)
    }

    /// Declare several events, in order.
    ///
    /// Not atomic: names declared before a failure stay declared. Returns the
    /// names that were newly declared.
    pub fn declare_events<I, N>(
        &self,
        names: I,
        options: DeclareOptions,
    ) -> Result<Vec<EventName>, EventError>
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        let mut created = Vec::new();
        for name in names {
            let name = name.into();
            if self.declare_event(name.clone(), options)? {
                created.push(name);
            }
        }
        Ok(created)
    }

    /// Events declared explicitly by this type
    pub fn own_events(&self) -> BTreeSet<EventName> {
        self.declarations.snapshot()
    }

    /// Whether this type explicitly declares `name`
    pub fn declares(&self, name: &str) -> bool {
        self.declarations.contains(name)
    }

    /// Whether an accessor was generated for `name` on this type or on any
    /// of its sources
    pub fn has_accessor(&self, name: &str) -> bool {
        self.ancestors()
            .iter()
            .any(|t| t.declarations().has_accessor(name))
    }

    pub(crate) fn declarations(&self) -> &Declarations {
        &self.declarations
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("supports_events", &self.supports_events)
            .field(
                "composed",
                &self.composed.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("own_events", &self.own_events())
            .finish()
    }
}

/// Builder for [`TypeDescriptor`]
pub struct TypeDescriptorBuilder {
    name: String,
    supports_events: bool,
    composed: Vec<Arc<TypeDescriptor>>,
    events: Vec<(EventName, DeclareOptions)>,
}

impl TypeDescriptorBuilder {
    /// Create new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supports_events: false,
            composed: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Opt the type into event support
    pub fn with_event_support(mut self) -> Self {
        self.supports_events = true;
        self
    }

    /// Compose (include, extend) another type
    pub fn compose(mut self, source: &Arc<TypeDescriptor>) -> Self {
        self.composed.push(Arc::clone(source));
        self
    }

    /// Declare an event with an accessor
    pub fn event(self, name: impl Into<EventName>) -> Self {
        self.event_with(name, DeclareOptions::default())
    }

    /// Declare an event with explicit options
    pub fn event_with(mut self, name: impl Into<EventName>, options: DeclareOptions) -> Self {
        self.events.push((name.into(), options));
        self
    }

    /// Declare several events with accessors
    pub fn events<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        self.events.extend(
            names
                .into_iter()
                .map(|n| (n.into(), DeclareOptions::default())),
        );
        self
    }

    /// Build the descriptor.
    ///
    /// Declaring events implies event support.
    pub fn build(self) -> Arc<TypeDescriptor> {
        let descriptor = TypeDescriptor {
            name: self.name,
            supports_events: self.supports_events || !self.events.is_empty(),
            composed: self.composed,
            declarations: Declarations::default(),
        };

        for (name, options) in self.events {
            descriptor.declarations.declare(name, options);
        }

        Arc::new(descriptor)
    }
}

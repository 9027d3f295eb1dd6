//! Declared-event discovery across composed types

use crate::descriptor::TypeDescriptor;
use crate::error::EventError;
use crate::name::EventName;
use std::any::{Any, type_name};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

impl TypeDescriptor {
    /// This type followed by every transitive source, depth-first in
    /// precedence order, each type listed once.
    pub fn ancestors(&self) -> Vec<&TypeDescriptor> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        collect(self, &mut seen, &mut out);
        out
    }

    /// Events declared by this type, and by its whole ancestry when
    /// `include_ancestors` is set.
    ///
    /// Types without event support contribute nothing.
    pub fn declared_events(&self, include_ancestors: bool) -> BTreeSet<EventName> {
        if !include_ancestors {
            return self.own_events();
        }

        let mut events = BTreeSet::new();
        for ancestor in self.ancestors() {
            if ancestor.supports_events() {
                ancestor.declarations().extend_into(&mut events);
            }
        }
        events
    }
}

fn collect<'a>(
    descriptor: &'a TypeDescriptor,
    seen: &mut HashSet<*const TypeDescriptor>,
    out: &mut Vec<&'a TypeDescriptor>,
) {
    if !seen.insert(descriptor as *const TypeDescriptor) {
        return;
    }
    out.push(descriptor);
    for source in descriptor.composed_sources() {
        collect(source, seen, out);
    }
}

/// Events declared for instances of `target`.
///
/// `target` must be a [`TypeDescriptor`] (or an `Arc` of one); any other
/// value fails with [`EventError::NotAType`].
///
/// # Examples
///
/// ```rust
/// use unobservable_events::{instance_events_for, TypeDescriptor};
///
/// let mixin = TypeDescriptor::builder("Mixin").events(["one", "two"]).build();
/// let widget = TypeDescriptor::builder("Widget")
///     .compose(&mixin)
///     .events(["three", "four"])
///     .build();
///
/// assert_eq!(instance_events_for(&widget, false).unwrap().len(), 2);
/// assert_eq!(instance_events_for(&widget, true).unwrap().len(), 4);
/// assert!(instance_events_for(&42u32, true).is_err());
/// ```
pub fn instance_events_for<T: Any>(
    target: &T,
    include_ancestors: bool,
) -> Result<BTreeSet<EventName>, EventError> {
    let target: &dyn Any = target;

    if let Some(descriptor) = target.downcast_ref::<Arc<TypeDescriptor>>() {
        return Ok(descriptor.declared_events(include_ancestors));
    }

    if let Some(descriptor) = target.downcast_ref::<TypeDescriptor>() {
        return Ok(descriptor.declared_events(include_ancestors));
    }

    Err(EventError::NotAType(type_name::<T>().to_string()))
}

//! Declarative macros for observable types
//!
//! This crate provides `macro_rules!` sugar for the two halves of declaring
//! an event: recording the name on a [`TypeDescriptor`] and generating a
//! typed accessor method for it.
//!
//! # Observable Types
//!
//! ```ignore
//! observable_type! {
//!     /// Descriptor of [`Button`]
//!     pub static BUTTON for Button {
//!         compose: [WIDGET],
//!         inherit: [resized],
//!         events: [clicked, hovered],
//!     }
//! }
//!
//! let button = Button::new();
//! button.clicked()?.register_fn(|_| Ok(()));
//! ```
//!
//! # Accessors Only
//!
//! ```ignore
//! event_accessors!(Button => clicked, hovered);
//! ```
//!
//! [`TypeDescriptor`]: unobservable_events::TypeDescriptor

#[doc(hidden)]
pub use unobservable_events as __events;

/// Generate accessor methods for already declared events
///
/// Each accessor takes `&self` and returns the instance's dispatcher for the
/// event of the same name. The type must implement `Observable`.
///
/// # Examples
///
/// ```ignore
/// event_accessors!(Document => saved, closed);
///
/// doc.saved()?.register_fn(|_| Ok(()));
/// ```
#[macro_export]
macro_rules! event_accessors {
    ($ty:ty => $($event:ident),* $(,)?) => {
        impl $ty {
            $(
                #[allow(dead_code)]
                pub fn $event(
                    &self,
                ) -> ::std::result::Result<
                    ::std::sync::Arc<
                        $crate::__events::Event<<Self as $crate::__events::Observable>::Args>,
                    >,
                    $crate::__events::EventError,
                > {
                    <Self as $crate::__events::Observable>::event_map(self)
                        .accessor(::std::stringify!($event))
                }
            )*
        }
    };
}

/// Declare a static type descriptor and generate event accessors
///
/// Expands to a lazily built `static` descriptor that supports events,
/// composes the listed descriptors and declares the listed events, plus one
/// accessor method per event on the given type (see [`event_accessors!`]).
///
/// Events declared by composed sources are not redeclared; list them under
/// `inherit` to give the type typed accessors for them too. Those accessors
/// resolve through the composition graph, so a name no source declares with
/// an accessor fails with `UndefinedAccessor` when called.
///
/// # Examples
///
/// ```ignore
/// observable_type! {
///     pub static DOCUMENT for Document {
///         events: [saved, closed],
///     }
/// }
///
/// observable_type! {
///     pub static REPORT for Report {
///         compose: [DOCUMENT],
///         inherit: [saved],
///         events: [published],
///     }
/// }
/// ```
#[macro_export]
macro_rules! observable_type {
    (
        $(#[$meta:meta])*
        $vis:vis static $descriptor:ident for $ty:ty {
            $(compose: [$($source:path),* $(,)?],)?
            $(inherit: [$($inherited:ident),* $(,)?],)?
            events: [$($event:ident),* $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis static $descriptor: $crate::__events::__private::once_cell::sync::Lazy<
            ::std::sync::Arc<$crate::__events::TypeDescriptor>,
        > = $crate::__events::__private::once_cell::sync::Lazy::new(|| {
            $crate::__events::TypeDescriptor::builder(::std::stringify!($ty))
                .with_event_support()
                $($(.compose(&*$source))*)?
                $(.event(::std::stringify!($event)))*
                .build()
        });

        $crate::event_accessors!($ty => $($event),*);
        $($crate::event_accessors!($ty => $($inherited),*);)?
    };
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use unobservable_events::{Args, EventError, InstanceEventMap, Observable, args};

    observable_type! {
        static WIDGET for Widget {
            events: [resized],
        }
    }

    observable_type! {
        /// Button descriptor
        static BUTTON for Button {
            compose: [WIDGET],
            inherit: [resized],
            events: [clicked, hovered],
        }
    }

    struct Widget {
        events: InstanceEventMap,
    }

    impl Observable for Widget {
        type Args = Args;

        fn event_map(&self) -> &InstanceEventMap {
            &self.events
        }
    }

    struct Button {
        events: InstanceEventMap,
    }

    impl Button {
        fn new() -> Self {
            Self {
                events: InstanceEventMap::new(&BUTTON),
            }
        }
    }

    impl Observable for Button {
        type Args = Args;

        fn event_map(&self) -> &InstanceEventMap {
            &self.events
        }
    }

    struct Panel {
        events: InstanceEventMap,
    }

    impl Observable for Panel {
        type Args = Args;

        fn event_map(&self) -> &InstanceEventMap {
            &self.events
        }
    }

    event_accessors!(Panel => opened, resized);

    #[test]
    fn test_descriptor_declares_events() {
        assert_eq!(BUTTON.name(), "Button");
        assert_eq!(BUTTON.own_events().len(), 2);
        assert_eq!(BUTTON.declared_events(true).len(), 3);
        assert!(BUTTON.has_accessor("clicked"));
        assert!(WIDGET.declares("resized"));
    }

    #[test]
    fn test_accessor_returns_instance_event() {
        let button = Button::new();
        let clicked = button.clicked().unwrap();
        assert!(Arc::ptr_eq(&clicked, &button.event("clicked").unwrap()));

        let other = Button::new();
        assert!(!Arc::ptr_eq(&clicked, &other.clicked().unwrap()));
    }

    #[test]
    fn test_accessor_fires_handlers() {
        let button = Button::new();
        let hits = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = hits.clone();
        button.hovered().unwrap().register_fn(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });

        button.raise_event("hovered", &args![]).unwrap();
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_inherited_accessor() {
        let button = Button::new();
        let resized = button.resized().unwrap();
        assert!(Arc::ptr_eq(&resized, &button.event("resized").unwrap()));
        assert!(!BUTTON.declares("resized"));
    }

    #[test]
    fn test_widget_accessor() {
        let widget = Widget {
            events: InstanceEventMap::new(&WIDGET),
        };
        assert!(widget.resized().is_ok());
    }

    #[test]
    fn test_accessor_on_undeclared_event() {
        let panel = Panel {
            events: InstanceEventMap::new(&WIDGET),
        };

        assert!(panel.resized().is_ok());
        assert!(matches!(
            panel.opened(),
            Err(EventError::UndefinedAccessor(_))
        ));
    }
}

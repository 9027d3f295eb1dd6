// Unobservable - named, per-instance events for Rust types
//
// This library lets a type declare its events once and lets every instance
// expose its own multicast dispatchers for them, replacing hand-written
// observer boilerplate.

// Re-export core functionality
pub use unobservable_events::*;

// Re-export declarative macros
#[cfg(feature = "macros")]
pub use unobservable_macros::{event_accessors, observable_type};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Args,
        DeclareOptions,
        Event,
        EventError,
        EventName,
        Handler,
        HandlerError,
        HandlerSpec,
        InstanceEventMap,
        MethodReceiver,
        Observable,
        TypeDescriptor,
        args,
        instance_events_for,
    };

    #[cfg(feature = "macros")]
    pub use crate::{event_accessors, observable_type};
}

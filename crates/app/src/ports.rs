//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod event_bus;
pub mod service_control;
pub mod translation_source;

pub use event_bus::StatusPublisher;
pub use service_control::ServiceControl;
pub use translation_source::TranslationSource;

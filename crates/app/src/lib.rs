//! # svctray-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ServiceControl` — start, stop, restart and observe the managed service
//!   - `StatusPublisher` — broadcast service state changes
//!   - `TranslationSource` — load translation tables
//! - Define **driving/inbound ports** as use-case structs:
//!   - `StatusService` — run lifecycle actions through the state machine
//!   - `Translator` — select a locale and render labels, menus and notices
//! - Provide **in-process infrastructure** (status bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `svctray-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;

//! # svctray-domain
//!
//! Pure domain model for the svctray service tray helper.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **service state machine** (states, actions, settlement, observations)
//! - Define **locales** and **localized strings** (message key + parameters)
//! - Define **templates** (`{identifier}` interpolation)
//! - Define **translation tables** (Qt Linguist contexts/messages) and their audit
//! - Define the **Quick Config** rules (worker validation, field hints, ports)
//! - Define **view models** for the status menu and the Quick Config dialog
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod catalog;
pub mod event;
pub mod locale;
pub mod message;
pub mod quick_config;
pub mod service_state;
pub mod template;
pub mod view;

//! Domain layer containing the relay's value objects and events.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (identifiers, timestamps, errors, state machines)
//! - `realtime` - Signaling events and per-connection lifecycle
pub mod foundation;
pub mod realtime;

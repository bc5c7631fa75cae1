//! Domain models for launch-calendar.
//!
//! # Core Concepts
//!
//! - [`LaunchRecord`]: One fully resolved launch listing (datetime, mission,
//!   location). Produced by the schedule parser, consumed by the publisher.
//! - [`Diagnostic`]: A non-fatal note about a listing that was skipped or had
//!   a field defaulted while parsing.

mod diagnostic;
mod launch;

pub use diagnostic::*;
pub use launch::*;

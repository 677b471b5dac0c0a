//! Domain models for STIG compliance data.
//!
//! This module contains the core entity types parsed from a benchmark
//! document, the severity model that maps DISA severity and weight onto
//! ticket priorities, and the submission configuration.

/// Compliance entities: groups, rules, checks, and their components.
pub mod benchmark;
pub use benchmark::{Check, Fix, FixText, Group, Identifier, Reference, Rule};

mod config;
pub use config::Config;

/// Severity ranking and ticket priority derivation.
pub mod severity;
pub use severity::{derive_ticket_priority, Error as PriorityError, Severity};

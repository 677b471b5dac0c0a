//! STIG benchmark to ticket conversion.
//!
//! Parses DISA-format STIG benchmark documents into a compliance data
//! model and projects each checklist group into a ticket-creation
//! payload for an external issue tracker.

pub mod domain;
pub use domain::{
    derive_ticket_priority, Check, Config, Fix, FixText, Group, Identifier, PriorityError,
    Reference, Rule, Severity,
};

pub mod xccdf;
pub use xccdf::{Benchmark, LoadError, ParseError};

pub mod ticket;
pub use ticket::{ProjectError, TicketPayload};

pub mod report;

pub mod transport;

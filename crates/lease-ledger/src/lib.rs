//! Payment schedule engine for property management contracts.
//!
//! The `billing` module owns the domain core: a pure period partitioner,
//! a persistence port, and the service facade that activates contracts,
//! records payments, and reschedules the unpaid remainder of a schedule.

pub mod billing;
pub mod config;
pub mod error;
pub mod telemetry;

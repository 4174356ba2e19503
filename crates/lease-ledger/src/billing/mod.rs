//! Contract activation, payment-period generation, payment capture, and
//! rescheduling of the unpaid remainder of a schedule.
//!
//! The pure date math lives in `schedule`; everything stateful goes through
//! the `ContractRepository` port so the service can be exercised against an
//! in-memory adapter in tests and against real storage in deployments.

pub mod domain;
pub mod report;
pub mod repository;
pub mod router;
mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ContractId, ContractRecord, ContractStatus, ContractTerms, PaymentFrequency, PaymentPeriod,
    PeriodId, PeriodStatus,
};
pub use report::{schedule_csv, ReportError};
pub use repository::{ContractRepository, RepositoryError};
pub use router::billing_router;
pub use schedule::{
    contract_end, partition, period_amount, PeriodSpan, ScheduleError, MAX_DURATION_MONTHS,
};
pub use service::{
    BillingError, BillingService, ReschedulePlan, RescheduleOutcome, ScheduleView,
};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    ContractId, ContractRecord, ContractStatus, ContractTerms, PaymentFrequency, PaymentPeriod,
    PeriodId, PeriodStatus,
};
use super::repository::{ContractRepository, RepositoryError};
use super::schedule::{
    contract_end, ensure_divisible, ensure_positive_rate, partition, period_amount, PeriodSpan,
    ScheduleError,
};

/// Service composing the period partitioner and the persistence port.
pub struct BillingService<R> {
    repository: Arc<R>,
}

static CONTRACT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_contract_id() -> ContractId {
    let id = CONTRACT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContractId(format!("ct-{id:06}"))
}

fn period_id(contract_id: &ContractId, sequence: u32) -> PeriodId {
    PeriodId(format!("{}-p{sequence:03}", contract_id.0))
}

fn build_periods(
    contract_id: &ContractId,
    spans: Vec<PeriodSpan>,
    amount: u32,
    first_sequence: u32,
) -> Vec<PaymentPeriod> {
    spans
        .into_iter()
        .enumerate()
        .map(|(offset, span)| {
            let sequence = first_sequence + offset as u32;
            PaymentPeriod {
                period_id: period_id(contract_id, sequence),
                sequence,
                start_date: span.start,
                end_date: span.end,
                amount,
                status: PeriodStatus::Pending,
                paid_on: None,
            }
        })
        .collect()
}

/// Replacement terms applied to the unpaid remainder of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReschedulePlan {
    pub new_monthly_rate: u32,
    pub additional_months: u32,
    pub new_frequency: PaymentFrequency,
}

/// Result of a reschedule: what was discarded and what replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RescheduleOutcome {
    pub contract_id: ContractId,
    pub deleted_count: usize,
    pub new_periods: Vec<PaymentPeriod>,
    pub new_end_date: NaiveDate,
}

/// Ordered schedule plus roll-up totals for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    pub contract_id: ContractId,
    pub status: &'static str,
    pub property_code: String,
    pub unit_id: String,
    pub tenant: String,
    pub frequency: PaymentFrequency,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: u64,
    pub outstanding_amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_through: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due: Option<NaiveDate>,
    pub periods: Vec<PaymentPeriod>,
}

fn build_view(record: ContractRecord, periods: Vec<PaymentPeriod>) -> ScheduleView {
    let total_amount = periods.iter().map(|period| u64::from(period.amount)).sum();
    let outstanding_amount = periods
        .iter()
        .filter(|period| !period.is_paid())
        .map(|period| u64::from(period.amount))
        .sum();
    let paid_through = periods
        .iter()
        .filter(|period| period.is_paid())
        .map(|period| period.end_date)
        .max();
    let next_due = periods
        .iter()
        .filter(|period| !period.is_paid())
        .map(|period| period.start_date)
        .min();

    ScheduleView {
        contract_id: record.contract_id,
        status: record.status.label(),
        property_code: record.property_code,
        unit_id: record.unit_id,
        tenant: record.tenant,
        frequency: record.frequency,
        start_date: record.start_date,
        end_date: record.end_date,
        total_amount,
        outstanding_amount,
        paid_through,
        next_due,
        periods,
    }
}

impl<R> BillingService<R>
where
    R: ContractRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Activate a contract: validate the terms, assign an identifier, and
    /// persist the record together with its full period set.
    pub fn activate(&self, terms: ContractTerms) -> Result<ContractRecord, BillingError> {
        ensure_positive_rate(terms.monthly_rate)?;
        let amount = period_amount(terms.monthly_rate, terms.frequency)?;
        let spans = partition(terms.start_date, terms.duration_months, terms.frequency)?;

        let contract_id = next_contract_id();
        let end_date = contract_end(terms.start_date, terms.duration_months);
        let periods = build_periods(&contract_id, spans, amount, 1);

        let record = ContractRecord {
            contract_id: contract_id.clone(),
            property_code: terms.property_code,
            unit_id: terms.unit_id,
            tenant: terms.tenant,
            start_date: terms.start_date,
            monthly_rate: terms.monthly_rate,
            frequency: terms.frequency,
            end_date,
            status: ContractStatus::Active,
        };

        let period_count = periods.len();
        let stored = self.repository.insert(record, periods)?;

        info!(
            contract = %contract_id.0,
            periods = period_count,
            end = %end_date,
            "contract activated"
        );
        Ok(stored)
    }

    /// Fetch the ordered schedule and roll-up totals for a contract.
    pub fn schedule(&self, contract_id: &ContractId) -> Result<ScheduleView, BillingError> {
        let record = self
            .repository
            .fetch(contract_id)?
            .ok_or(RepositoryError::NotFound)?;
        let mut periods = self.repository.list_periods(contract_id)?;
        periods.sort_by_key(|period| period.sequence);
        Ok(build_view(record, periods))
    }

    /// Replace the unpaid remainder of a contract's schedule.
    ///
    /// Paid periods are retained unchanged; unpaid periods are deleted and a
    /// continuation schedule is generated from the day after the latest paid
    /// period's end (or from the contract start when nothing has been paid).
    /// The plan is validated before any read or write, so a rejected plan is
    /// a no-op.
    pub fn reschedule(
        &self,
        contract_id: &ContractId,
        plan: ReschedulePlan,
    ) -> Result<RescheduleOutcome, BillingError> {
        ensure_positive_rate(plan.new_monthly_rate)?;
        ensure_divisible(plan.additional_months, plan.new_frequency)?;
        let amount = period_amount(plan.new_monthly_rate, plan.new_frequency)?;

        let mut record = self
            .repository
            .fetch(contract_id)?
            .ok_or(RepositoryError::NotFound)?;
        let mut periods = self.repository.list_periods(contract_id)?;
        periods.sort_by_key(|period| period.sequence);

        let (paid, unpaid): (Vec<_>, Vec<_>) =
            periods.into_iter().partition(PaymentPeriod::is_paid);

        let new_start = match paid.iter().map(|period| period.end_date).max() {
            Some(anchor) => anchor + Duration::days(1),
            None => record.start_date,
        };

        let spans = partition(new_start, plan.additional_months, plan.new_frequency)?;
        let first_sequence = paid.iter().map(|period| period.sequence).max().unwrap_or(0) + 1;
        let new_periods = build_periods(contract_id, spans, amount, first_sequence);
        let new_end_date = contract_end(new_start, plan.additional_months);

        let remove: Vec<PeriodId> = unpaid
            .iter()
            .map(|period| period.period_id.clone())
            .collect();
        let deleted_count = remove.len();

        self.repository
            .replace_periods(contract_id, remove, new_periods.clone())?;

        record.monthly_rate = plan.new_monthly_rate;
        record.frequency = plan.new_frequency;
        record.end_date = new_end_date;
        record.status = ContractStatus::Active;
        self.repository.update(record)?;

        info!(
            contract = %contract_id.0,
            deleted = deleted_count,
            added = new_periods.len(),
            end = %new_end_date,
            "contract rescheduled"
        );

        Ok(RescheduleOutcome {
            contract_id: contract_id.clone(),
            deleted_count,
            new_periods,
            new_end_date,
        })
    }

    /// Record payment of a single period. Settles the contract once every
    /// period is paid.
    pub fn mark_paid(
        &self,
        contract_id: &ContractId,
        period_id: &PeriodId,
        paid_on: NaiveDate,
    ) -> Result<PaymentPeriod, BillingError> {
        let mut record = self
            .repository
            .fetch(contract_id)?
            .ok_or(RepositoryError::NotFound)?;
        let mut periods = self.repository.list_periods(contract_id)?;

        let period = periods
            .iter_mut()
            .find(|period| &period.period_id == period_id)
            .ok_or(RepositoryError::NotFound)?;

        if period.is_paid() {
            return Err(BillingError::AlreadyPaid {
                period_id: period_id.clone(),
            });
        }

        period.status = PeriodStatus::Paid;
        period.paid_on = Some(paid_on);
        let updated = period.clone();

        self.repository.update_period(contract_id, updated.clone())?;

        if periods.iter().all(PaymentPeriod::is_paid) {
            record.status = ContractStatus::Settled;
            self.repository.update(record)?;
        }

        Ok(updated)
    }
}

/// Error raised by the billing service.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("period {} is already marked paid", .period_id.0)]
    AlreadyPaid { period_id: PeriodId },
}

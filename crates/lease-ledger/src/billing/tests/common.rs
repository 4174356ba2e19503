use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::billing::domain::{
    ContractId, ContractRecord, ContractTerms, PaymentFrequency, PaymentPeriod, PeriodId,
};
use crate::billing::repository::{ContractRepository, RepositoryError};
use crate::billing::service::BillingService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn terms(
    duration_months: u32,
    monthly_rate: u32,
    frequency: PaymentFrequency,
) -> ContractTerms {
    ContractTerms {
        property_code: "MAPLE".to_string(),
        unit_id: "B-104".to_string(),
        tenant: "Jordan Reyes".to_string(),
        start_date: date(2026, 1, 1),
        duration_months,
        monthly_rate,
        frequency,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    contracts: Arc<Mutex<HashMap<ContractId, (ContractRecord, Vec<PaymentPeriod>)>>>,
}

impl MemoryRepository {
    /// Raw period snapshot so tests can assert nothing leaked mid-mutation.
    pub(super) fn periods(&self, id: &ContractId) -> Vec<PaymentPeriod> {
        let guard = self.contracts.lock().expect("repository mutex poisoned");
        guard
            .get(id)
            .map(|(_, periods)| periods.clone())
            .unwrap_or_default()
    }

    pub(super) fn record(&self, id: &ContractId) -> Option<ContractRecord> {
        let guard = self.contracts.lock().expect("repository mutex poisoned");
        guard.get(id).map(|(record, _)| record.clone())
    }
}

impl ContractRepository for MemoryRepository {
    fn insert(
        &self,
        record: ContractRecord,
        periods: Vec<PaymentPeriod>,
    ) -> Result<ContractRecord, RepositoryError> {
        let mut guard = self.contracts.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.contract_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.contract_id.clone(), (record.clone(), periods));
        Ok(record)
    }

    fn update(&self, record: ContractRecord) -> Result<(), RepositoryError> {
        let mut guard = self.contracts.lock().expect("repository mutex poisoned");
        match guard.get_mut(&record.contract_id) {
            Some((stored, _)) => {
                *stored = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError> {
        let guard = self.contracts.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).map(|(record, _)| record.clone()))
    }

    fn list_periods(&self, id: &ContractId) -> Result<Vec<PaymentPeriod>, RepositoryError> {
        let guard = self.contracts.lock().expect("repository mutex poisoned");
        match guard.get(id) {
            Some((_, periods)) => Ok(periods.clone()),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn replace_periods(
        &self,
        id: &ContractId,
        remove: Vec<PeriodId>,
        insert: Vec<PaymentPeriod>,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.contracts.lock().expect("repository mutex poisoned");
        let (_, periods) = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        periods.retain(|period| !remove.contains(&period.period_id));
        periods.extend(insert);
        periods.sort_by_key(|period| period.sequence);
        Ok(())
    }

    fn update_period(
        &self,
        id: &ContractId,
        period: PaymentPeriod,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.contracts.lock().expect("repository mutex poisoned");
        let (_, periods) = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let slot = periods
            .iter_mut()
            .find(|stored| stored.period_id == period.period_id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = period;
        Ok(())
    }
}

/// Repository whose every operation fails, for error-path coverage.
pub(super) struct UnavailableRepository;

impl ContractRepository for UnavailableRepository {
    fn insert(
        &self,
        _record: ContractRecord,
        _periods: Vec<PaymentPeriod>,
    ) -> Result<ContractRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn update(&self, _record: ContractRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn fetch(&self, _id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn list_periods(&self, _id: &ContractId) -> Result<Vec<PaymentPeriod>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn replace_periods(
        &self,
        _id: &ContractId,
        _remove: Vec<PeriodId>,
        _insert: Vec<PaymentPeriod>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    fn update_period(
        &self,
        _id: &ContractId,
        _period: PaymentPeriod,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<BillingService<MemoryRepository>>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = Arc::new(BillingService::new(Arc::new(repository.clone())));
    (service, repository)
}

use chrono::NaiveDate;
use lease_ledger::billing::{
    ContractId, ContractRecord, ContractRepository, PaymentFrequency, PaymentPeriod, PeriodId,
    RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reference adapter for the repository port. One mutex guards each
/// contract's record together with its periods, so `insert` and
/// `replace_periods` land as single units the way the port requires.
#[derive(Default, Clone)]
pub(crate) struct InMemoryContractRepository {
    contracts: Arc<Mutex<HashMap<ContractId, (ContractRecord, Vec<PaymentPeriod>)>>>,
}

impl ContractRepository for InMemoryContractRepository {
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

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_frequency(raw: &str) -> Result<PaymentFrequency, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "monthly" => Ok(PaymentFrequency::Monthly),
        "quarterly" => Ok(PaymentFrequency::Quarterly),
        "semi-annual" | "semi_annual" | "semiannual" => Ok(PaymentFrequency::SemiAnnual),
        "annual" | "yearly" => Ok(PaymentFrequency::Annual),
        other => Err(format!(
            "unknown frequency '{other}'; expected monthly, quarterly, semi-annual, or annual"
        )),
    }
}

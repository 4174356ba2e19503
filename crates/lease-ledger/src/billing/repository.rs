use super::domain::{ContractId, ContractRecord, PaymentPeriod, PeriodId};

/// Storage abstraction so the service facade can be exercised in isolation.
///
/// `insert` and `replace_periods` are the transactional seams: an
/// implementation must land the record with its periods, or the removals
/// with their replacements, as one unit so a partial period set is never
/// visible to readers.
pub trait ContractRepository: Send + Sync {
    /// Persist a new contract together with its initial period set.
    fn insert(
        &self,
        record: ContractRecord,
        periods: Vec<PaymentPeriod>,
    ) -> Result<ContractRecord, RepositoryError>;

    fn update(&self, record: ContractRecord) -> Result<(), RepositoryError>;

    fn fetch(&self, id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError>;

    /// All periods for the contract, ordered by sequence.
    fn list_periods(&self, id: &ContractId) -> Result<Vec<PaymentPeriod>, RepositoryError>;

    /// Atomically delete `remove` and insert `insert` for one contract.
    fn replace_periods(
        &self,
        id: &ContractId,
        remove: Vec<PeriodId>,
        insert: Vec<PaymentPeriod>,
    ) -> Result<(), RepositoryError>;

    fn update_period(
        &self,
        id: &ContractId,
        period: PaymentPeriod,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

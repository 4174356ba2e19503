use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for activated contracts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractId(pub String);

/// Identifier wrapper for individual billing periods.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodId(pub String);

/// Cadence at which a contract is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentFrequency {
    pub const fn ordered() -> [Self; 4] {
        [Self::Monthly, Self::Quarterly, Self::SemiAnnual, Self::Annual]
    }

    /// Months covered by one billing period at this cadence.
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::SemiAnnual => 6,
            Self::Annual => 12,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::SemiAnnual => "semi-annual",
            Self::Annual => "annual",
        }
    }
}

/// Commercial terms captured when a lease or management contract is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub property_code: String,
    pub unit_id: String,
    pub tenant: String,
    pub start_date: NaiveDate,
    pub duration_months: u32,
    /// Rate per month in minor currency units.
    pub monthly_rate: u32,
    pub frequency: PaymentFrequency,
}

/// Payment state of a single billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Pending,
    Paid,
}

impl PeriodStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

/// One billing interval within a contract's duration. The end date is
/// inclusive; the next period starts the following day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPeriod {
    pub period_id: PeriodId,
    pub sequence: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount: u32,
    pub status: PeriodStatus,
    pub paid_on: Option<NaiveDate>,
}

impl PaymentPeriod {
    pub fn is_paid(&self) -> bool {
        self.status == PeriodStatus::Paid
    }
}

/// Lifecycle of a contract's receivables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Settled,
}

impl ContractStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Settled => "settled",
        }
    }
}

/// Repository-backed contract with its assigned identifier and lifecycle
/// status. Rate and frequency reflect the most recent reschedule, and
/// `end_date` always matches the close of the final billing period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub contract_id: ContractId,
    pub property_code: String,
    pub unit_id: String,
    pub tenant: String,
    pub start_date: NaiveDate,
    pub monthly_rate: u32,
    pub frequency: PaymentFrequency,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
}

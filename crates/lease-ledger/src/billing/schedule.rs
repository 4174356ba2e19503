use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::PaymentFrequency;

/// One billing interval as plain dates, before any persistence identity is
/// attached. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Longest contract duration the scheduler accepts. A century of periods is
/// far beyond any real lease and keeps date arithmetic within chrono's range.
pub const MAX_DURATION_MONTHS: u32 = 1200;

/// Validation errors raised before any schedule is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("contract duration must be at least one month")]
    ZeroDuration,
    #[error(
        "duration of {duration_months} month(s) exceeds the supported maximum of {} months",
        MAX_DURATION_MONTHS
    )]
    ExcessiveDuration { duration_months: u32 },
    #[error(
        "duration of {duration_months} month(s) does not divide into {} periods",
        .frequency.label()
    )]
    IndivisibleDuration {
        duration_months: u32,
        frequency: PaymentFrequency,
    },
    #[error("monthly rate must be positive")]
    ZeroRate,
    #[error(
        "monthly rate of {monthly_rate} overflows the period amount at {} cadence",
        .frequency.label()
    )]
    AmountOverflow {
        monthly_rate: u32,
        frequency: PaymentFrequency,
    },
}

/// Inclusive contract end: the day before `start + duration` months.
pub fn contract_end(start: NaiveDate, duration_months: u32) -> NaiveDate {
    start + Months::new(duration_months) - Duration::days(1)
}

/// Amount billed for one period at the given cadence.
///
/// Rejects rates whose per-period amount does not fit in the minor-unit
/// representation, so the stored amount always equals rate times cadence.
pub fn period_amount(monthly_rate: u32, frequency: PaymentFrequency) -> Result<u32, ScheduleError> {
    monthly_rate
        .checked_mul(frequency.months())
        .ok_or(ScheduleError::AmountOverflow {
            monthly_rate,
            frequency,
        })
}

pub(crate) fn ensure_positive_rate(monthly_rate: u32) -> Result<(), ScheduleError> {
    if monthly_rate == 0 {
        return Err(ScheduleError::ZeroRate);
    }
    Ok(())
}

pub(crate) fn ensure_divisible(
    duration_months: u32,
    frequency: PaymentFrequency,
) -> Result<(), ScheduleError> {
    if duration_months == 0 {
        return Err(ScheduleError::ZeroDuration);
    }
    if duration_months > MAX_DURATION_MONTHS {
        return Err(ScheduleError::ExcessiveDuration { duration_months });
    }
    if duration_months % frequency.months() != 0 {
        return Err(ScheduleError::IndivisibleDuration {
            duration_months,
            frequency,
        });
    }
    Ok(())
}

/// Partition a contract duration into consecutive billing spans.
///
/// Every span is anchored on the contract start (`start + i * cadence`
/// months) rather than accumulated from its predecessor, so chrono's
/// month-end clamping cannot open a gap between neighbours and the final
/// span always closes on the contract end date.
pub fn partition(
    start: NaiveDate,
    duration_months: u32,
    frequency: PaymentFrequency,
) -> Result<Vec<PeriodSpan>, ScheduleError> {
    ensure_divisible(duration_months, frequency)?;

    let cadence = frequency.months();
    let count = duration_months / cadence;
    let mut spans = Vec::with_capacity(count as usize);
    for index in 0..count {
        let span_start = start + Months::new(index * cadence);
        let span_end = start + Months::new((index + 1) * cadence) - Duration::days(1);
        spans.push(PeriodSpan {
            start: span_start,
            end: span_end,
        });
    }

    Ok(spans)
}

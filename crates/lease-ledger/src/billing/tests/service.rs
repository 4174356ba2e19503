use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::billing::domain::{ContractStatus, PaymentFrequency, PeriodId, PeriodStatus};
use crate::billing::repository::RepositoryError;
use crate::billing::schedule::ScheduleError;
use crate::billing::service::{BillingError, BillingService};

#[test]
fn activate_persists_record_and_full_period_set() {
    let (service, repository) = build_service();

    let record = service
        .activate(terms(12, 900, PaymentFrequency::Quarterly))
        .expect("contract activates");

    assert_eq!(record.status, ContractStatus::Active);
    assert_eq!(record.end_date, date(2026, 12, 31));

    let periods = repository.periods(&record.contract_id);
    assert_eq!(periods.len(), 4);
    assert_eq!(periods[0].start_date, date(2026, 1, 1));
    assert_eq!(periods[3].end_date, record.end_date);
    for (index, period) in periods.iter().enumerate() {
        assert_eq!(period.sequence as usize, index + 1);
        assert_eq!(period.amount, 2700);
        assert_eq!(period.status, PeriodStatus::Pending);
        assert!(period.paid_on.is_none());
    }
    for window in periods.windows(2) {
        assert_eq!(window[0].end_date + Duration::days(1), window[1].start_date);
    }
}

#[test]
fn activate_rejects_zero_rate_without_touching_storage() {
    let (service, repository) = build_service();

    match service.activate(terms(12, 0, PaymentFrequency::Monthly)) {
        Err(BillingError::Schedule(ScheduleError::ZeroRate)) => {}
        other => panic!("expected zero rate rejection, got {other:?}"),
    }

    let dangling = repository
        .record(&crate::billing::domain::ContractId("ct-none".to_string()));
    assert!(dangling.is_none());
}

#[test]
fn activate_rejects_indivisible_terms() {
    let (service, _) = build_service();

    match service.activate(terms(7, 800, PaymentFrequency::SemiAnnual)) {
        Err(BillingError::Schedule(ScheduleError::IndivisibleDuration { frequency, .. })) => {
            assert_eq!(frequency, PaymentFrequency::SemiAnnual);
        }
        other => panic!("expected indivisible duration rejection, got {other:?}"),
    }
}

#[test]
fn activate_rejects_rates_whose_period_amount_overflows() {
    let (service, repository) = build_service();

    match service.activate(terms(12, 400_000_000, PaymentFrequency::Annual)) {
        Err(BillingError::Schedule(ScheduleError::AmountOverflow { monthly_rate, .. })) => {
            assert_eq!(monthly_rate, 400_000_000);
        }
        other => panic!("expected amount overflow rejection, got {other:?}"),
    }

    // The same rate at a cadence whose product fits goes through with the
    // amount invariant intact.
    let record = service
        .activate(terms(12, 400_000_000, PaymentFrequency::Monthly))
        .expect("contract activates");
    for period in repository.periods(&record.contract_id) {
        assert_eq!(period.amount, 400_000_000);
    }
}

#[test]
fn activate_rejects_absurd_durations_without_touching_storage() {
    let (service, repository) = build_service();

    match service.activate(terms(u32::MAX - 3, 900, PaymentFrequency::Monthly)) {
        Err(BillingError::Schedule(ScheduleError::ExcessiveDuration { duration_months })) => {
            assert_eq!(duration_months, u32::MAX - 3);
        }
        other => panic!("expected excessive duration rejection, got {other:?}"),
    }

    let dangling = repository
        .record(&crate::billing::domain::ContractId("ct-none".to_string()));
    assert!(dangling.is_none());
}

#[test]
fn activate_surfaces_repository_unavailability() {
    let service = BillingService::new(Arc::new(UnavailableRepository));

    match service.activate(terms(6, 700, PaymentFrequency::Monthly)) {
        Err(BillingError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository error, got {other:?}"),
    }
}

#[test]
fn schedule_view_rolls_up_totals_and_next_due() {
    let (service, _) = build_service();
    let record = service
        .activate(terms(6, 1000, PaymentFrequency::Monthly))
        .expect("contract activates");

    let first = PeriodId(format!("{}-p001", record.contract_id.0));
    service
        .mark_paid(&record.contract_id, &first, date(2026, 1, 28))
        .expect("first period paid");

    let view = service
        .schedule(&record.contract_id)
        .expect("schedule view");
    assert_eq!(view.total_amount, 6000);
    assert_eq!(view.outstanding_amount, 5000);
    assert_eq!(view.paid_through, Some(date(2026, 1, 31)));
    assert_eq!(view.next_due, Some(date(2026, 2, 1)));
    assert_eq!(view.status, ContractStatus::Active.label());
    assert_eq!(view.periods.len(), 6);
}

#[test]
fn schedule_for_unknown_contract_is_not_found() {
    let (service, _) = build_service();

    match service.schedule(&crate::billing::domain::ContractId("missing".to_string())) {
        Err(BillingError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found error, got {other:?}"),
    }
}

#[test]
fn mark_paid_records_payment_date() {
    let (service, repository) = build_service();
    let record = service
        .activate(terms(3, 500, PaymentFrequency::Monthly))
        .expect("contract activates");

    let target = PeriodId(format!("{}-p002", record.contract_id.0));
    let paid = service
        .mark_paid(&record.contract_id, &target, date(2026, 2, 14))
        .expect("payment recorded");

    assert_eq!(paid.status, PeriodStatus::Paid);
    assert_eq!(paid.paid_on, Some(date(2026, 2, 14)));

    let stored = repository.periods(&record.contract_id);
    assert!(stored[1].is_paid());
    assert!(!stored[0].is_paid());
}

#[test]
fn mark_paid_rejects_double_payment() {
    let (service, _) = build_service();
    let record = service
        .activate(terms(3, 500, PaymentFrequency::Monthly))
        .expect("contract activates");

    let target = PeriodId(format!("{}-p001", record.contract_id.0));
    service
        .mark_paid(&record.contract_id, &target, date(2026, 1, 30))
        .expect("first payment recorded");

    match service.mark_paid(&record.contract_id, &target, date(2026, 1, 31)) {
        Err(BillingError::AlreadyPaid { period_id }) => assert_eq!(period_id, target),
        other => panic!("expected already paid error, got {other:?}"),
    }
}

#[test]
fn paying_every_period_settles_the_contract() {
    let (service, repository) = build_service();
    let record = service
        .activate(terms(6, 450, PaymentFrequency::SemiAnnual))
        .expect("contract activates");

    let only = PeriodId(format!("{}-p001", record.contract_id.0));
    service
        .mark_paid(&record.contract_id, &only, date(2026, 6, 20))
        .expect("payment recorded");

    let stored = repository
        .record(&record.contract_id)
        .expect("record present");
    assert_eq!(stored.status, ContractStatus::Settled);
}

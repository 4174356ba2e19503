use crate::infra::{parse_date, parse_frequency, InMemoryContractRepository};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use lease_ledger::billing::{
    contract_end, partition, period_amount, schedule_csv, BillingService, ContractTerms,
    PaymentFrequency, ReschedulePlan, ScheduleView,
};
use lease_ledger::config::AppConfig;
use lease_ledger::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Contract start date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: NaiveDate,
    /// Contract duration in months
    #[arg(long)]
    pub(crate) months: u32,
    /// Monthly rate in minor currency units
    #[arg(long)]
    pub(crate) rate: u32,
    /// Billing cadence: monthly, quarterly, semi-annual, or annual
    #[arg(long, value_parser = parse_frequency, default_value = "monthly")]
    pub(crate) frequency: PaymentFrequency,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Contract start date (YYYY-MM-DD). Defaults to the first of this month.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Number of leading periods to mark paid before rescheduling
    #[arg(long, default_value_t = 2)]
    pub(crate) paid_periods: u32,
    /// Print the final schedule as CSV instead of a table
    #[arg(long)]
    pub(crate) csv: bool,
}

/// Print the periods a contract would generate, without touching storage.
pub(crate) fn run_schedule_preview(args: PreviewArgs) -> Result<(), AppError> {
    let PreviewArgs {
        start,
        months,
        rate,
        frequency,
    } = args;

    let spans = partition(start, months, frequency).map_err(lease_ledger::billing::BillingError::from)?;
    let amount =
        period_amount(rate, frequency).map_err(lease_ledger::billing::BillingError::from)?;

    println!(
        "{} schedule, {} month(s) starting {} (ends {})",
        frequency.label(),
        months,
        start,
        contract_end(start, months)
    );
    println!("{:<4} {:<12} {:<12} {:>10}", "#", "start", "end", "amount");
    for (index, span) in spans.iter().enumerate() {
        println!(
            "{:<4} {:<12} {:<12} {:>10}",
            index + 1,
            span.start.to_string(),
            span.end.to_string(),
            amount
        );
    }
    println!(
        "total: {} over {} period(s)",
        u64::from(amount) * spans.len() as u64,
        spans.len()
    );

    Ok(())
}

/// Walk a contract through its whole lifecycle against the in-memory adapter:
/// activation, a few payments, and a reschedule of the unpaid remainder.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let currency = config.billing.currency;

    let start = args.start.unwrap_or_else(|| {
        Local::now()
            .date_naive()
            .with_day(1)
            .unwrap_or_else(|| Local::now().date_naive())
    });

    let repository = Arc::new(InMemoryContractRepository::default());
    let service = BillingService::new(repository);

    let record = service.activate(ContractTerms {
        property_code: "MAPLE".to_string(),
        unit_id: "B-104".to_string(),
        tenant: "Jordan Reyes".to_string(),
        start_date: start,
        duration_months: 12,
        monthly_rate: 1000,
        frequency: PaymentFrequency::Monthly,
    })?;

    println!(
        "activated {} for {} ({} / {}), 12 monthly periods ending {}",
        record.contract_id.0, record.tenant, record.property_code, record.unit_id, record.end_date
    );

    let view = service.schedule(&record.contract_id)?;
    let to_pay: Vec<_> = view
        .periods
        .iter()
        .take(args.paid_periods as usize)
        .map(|period| (period.period_id.clone(), period.end_date))
        .collect();
    for (period_id, end_date) in to_pay {
        let paid = service.mark_paid(&record.contract_id, &period_id, end_date)?;
        println!(
            "  paid period {} ({} - {}) on {}",
            paid.sequence,
            paid.start_date,
            paid.end_date,
            end_date
        );
    }

    let outcome = service.reschedule(
        &record.contract_id,
        ReschedulePlan {
            new_monthly_rate: 1100,
            additional_months: 12,
            new_frequency: PaymentFrequency::Quarterly,
        },
    )?;
    println!(
        "rescheduled: dropped {} unpaid period(s), {} quarterly replacement(s), new end {}",
        outcome.deleted_count,
        outcome.new_periods.len(),
        outcome.new_end_date
    );

    let final_view = service.schedule(&record.contract_id)?;
    if args.csv {
        print!("{}", schedule_csv(&final_view, &currency)?);
    } else {
        render_schedule(&final_view, &currency);
    }

    Ok(())
}

fn render_schedule(view: &ScheduleView, currency: &str) {
    println!(
        "schedule for {} ({}), outstanding {} {}",
        view.contract_id.0, view.status, view.outstanding_amount, currency
    );
    for period in &view.periods {
        let paid_marker = match period.paid_on {
            Some(date) => format!("paid {date}"),
            None => "pending".to_string(),
        };
        println!(
            "  {:<3} {} - {}  {:>8} {}  {}",
            period.sequence, period.start_date, period.end_date, period.amount, currency, paid_marker
        );
    }
}

use super::service::ScheduleView;

/// Errors raised while exporting a schedule.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize schedule row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush schedule export: {0}")]
    Io(#[from] std::io::Error),
    #[error("schedule export was not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render a contract schedule as CSV, one row per billing period, for
/// hand-off to accounting spreadsheets.
pub fn schedule_csv(view: &ScheduleView, currency: &str) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "contract_id",
        "sequence",
        "start_date",
        "end_date",
        "amount",
        "currency",
        "status",
        "paid_on",
    ])?;

    for period in &view.periods {
        writer.write_record([
            view.contract_id.0.clone(),
            period.sequence.to_string(),
            period.start_date.to_string(),
            period.end_date.to_string(),
            period.amount.to_string(),
            currency.to_string(),
            period.status.label().to_string(),
            period
                .paid_on
                .map(|date| date.to_string())
                .unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

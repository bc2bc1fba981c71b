use time::{macros::format_description, Date, Duration};

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_iso_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

/// Render a date the way the store keeps it, so lexical comparison in SQL is chronological.
pub fn to_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// `date` minus `days`, clamped to the earliest representable date.
pub fn days_before(date: Date, days: i64) -> Date {
    date.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};

pub const CURRENCY: &str = "FCFA";

/// Parse the timestamp shapes the backend emits: RFC 3339, compact offsets
/// (`+0000`), naive ISO without offset and bare dates, the last two taken
/// as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%z",
    ] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `1234567.5` -> `1 234 567.50 FCFA`; whole amounts drop the decimals
pub fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if frac == 0 {
        format!("{}{} {}", sign, grouped, CURRENCY)
    } else {
        format!("{}{}.{:02} {}", sign, grouped, frac, CURRENCY)
    }
}

/// Local `dd/mm/yyyy HH:MM`; unparseable input is shown as-is
pub fn format_datetime(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(s) if s.trim().is_empty() => "-".to_string(),
        Some(s) => match parse_timestamp(s) {
            Some(dt) => dt.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string(),
            None => s.to_string(),
        },
    }
}

/// Countdown until `expires_at`, e.g. `12 min 05 s`
pub fn format_time_remaining(expires_at: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(expiry) = expires_at.and_then(parse_timestamp) else {
        return "-".to_string();
    };
    let remaining = expiry - now;
    if remaining.num_seconds() <= 0 {
        return "Expirée".to_string();
    }
    let secs = remaining.num_seconds();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{} h {:02} min", hours, minutes)
    } else {
        format!("{} min {:02} s", minutes, seconds)
    }
}

/// Accepts `YYYY-MM-DD` for date filters and top-up dates
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Date invalide '{}', format attendu AAAA-MM-JJ", raw))
}

/// Positive amount from user input; accepts `1 500`, `1500,50`
pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = cleaned.replace(',', ".");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err("Le montant doit être positif".to_string()),
        Err(_) => Err(format!("Montant invalide: {}", raw)),
    }
}

/// Shorten long identifiers for table cells
pub fn short_id(id: &str) -> String {
    if id.chars().count() > 8 {
        id.chars().take(8).collect()
    } else {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0 FCFA");
        assert_eq!(format_amount(1500.0), "1 500 FCFA");
        assert_eq!(format_amount(1234567.5), "1 234 567.50 FCFA");
        assert_eq!(format_amount(-250.0), "-250 FCFA");
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-10-19T08:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-19T09:30:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-19T08:30:00.000000"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-19T08:30:00.000+0000"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-19 09:30:00+0100"), Some(expected));
        assert_eq!(parse_timestamp("2026-10-19T08:30"), Some(expected));
        assert_eq!(
            parse_timestamp("2026-10-19"),
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("hier"), None);
    }

    #[test]
    fn test_time_remaining() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let later = (now + Duration::seconds(725)).to_rfc3339();
        assert_eq!(format_time_remaining(Some(&later), now), "12 min 05 s");
        let past = (now - Duration::seconds(1)).to_rfc3339();
        assert_eq!(format_time_remaining(Some(&past), now), "Expirée");
        assert_eq!(format_time_remaining(None, now), "-");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1500,50"), Ok(1500.5));
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_unparseable_datetime_is_shown_raw() {
        assert_eq!(format_datetime(Some("n/a")), "n/a");
        assert_eq!(format_datetime(None), "-");
    }
}

//! Display formatting for sizes, dates and rupee amounts.

use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const CRORE: i64 = 10_000_000;
const LAKH: i64 = 100_000;

/// Human-readable file size in base 1024, e.g. `1.5 KB`, `2 MB`, `0 Bytes`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{} {}", trim_decimals(&format!("{:.2}", value)), SIZE_UNITS[unit])
}

fn trim_decimals(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Upload date as shown in document lists, e.g. `05-Mar-2024`.
pub fn format_upload_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d-%b-%Y").to_string()
}

/// Short Indian calendar date, e.g. `5/3/2024`.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

/// Amount with Indian digit grouping, e.g. `7,65,000` or `1,70,00,000`.
/// Fractions are kept to two places and trailing zeros dropped.
pub fn format_indian(amount: Decimal) -> String {
    let rounded = amount.round_dp(2).normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = group_indian(int_part);
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

/// Amount expressed in crores with two decimals, e.g. `1.70`.
pub fn format_crores(amount: Decimal) -> String {
    let crores = (amount / Decimal::from(CRORE)).round_dp(2);
    format!("{:.2}", crores)
}

/// Amount in words at crore/lakh resolution,
/// e.g. `1 Crore 0 Lakh Rupees Only`.
pub fn amount_in_words(total: Decimal) -> String {
    let crore = Decimal::from(CRORE);
    let crores = (total / crore).floor().normalize();
    let lakhs = ((total % crore) / Decimal::from(LAKH)).floor().normalize();
    format!("{} Crore {} Lakh Rupees Only", crores, lakhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_indian_grouping() {
        assert_eq!(format_indian(dec!(765000)), "7,65,000");
        assert_eq!(format_indian(dec!(17000000)), "1,70,00,000");
        assert_eq!(format_indian(dec!(8500000)), "85,00,000");
        assert_eq!(format_indian(dec!(100300000)), "10,03,00,000");
        assert_eq!(format_indian(dec!(999)), "999");
        assert_eq!(format_indian(dec!(1000)), "1,000");
        assert_eq!(format_indian(dec!(1234.50)), "1,234.5");
        assert_eq!(format_indian(dec!(-125000)), "-1,25,000");
    }

    #[test]
    fn test_format_crores() {
        assert_eq!(format_crores(dec!(17000000)), "1.70");
        assert_eq!(format_crores(dec!(8500000)), "0.85");
        assert_eq!(format_crores(dec!(125000000)), "12.50");
    }

    #[test]
    fn test_amount_in_words() {
        assert_eq!(
            amount_in_words(dec!(10030000)),
            "1 Crore 0 Lakh Rupees Only"
        );
        assert_eq!(amount_in_words(dec!(8500000)), "0 Crore 85 Lakh Rupees Only");
        assert_eq!(
            amount_in_words(dec!(123456789)),
            "12 Crore 34 Lakh Rupees Only"
        );
    }

    #[test]
    fn test_format_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_short_date(date), "5/3/2024");

        let at = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(format_upload_date(&at), "15-Mar-2024");
    }
}

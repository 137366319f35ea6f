// 💵 Display Formatters - raw loan values → strings for cards, forms and tables
//
// Every function here is total: bad or missing input degrades to a placeholder
// ("N/A", "Invalid Date", "$0.00", "0%", 0) instead of an error, so a single bad
// field never blanks out a whole screen.

use crate::dates::{DateValue, ParsedDate};
use crate::decimal;
use crate::loan::LoanLike;
use crate::locale::LocaleProfile;
use chrono::{NaiveDateTime, TimeZone, Utc};

pub use crate::locale::DEFAULT_LOCALE;

pub const DEFAULT_PERCENTAGE_DECIMALS: u32 = 1;
pub const DEFAULT_TRUNCATE_LENGTH: usize = 100;

const ZERO_CURRENCY: &str = "$0.00";
const NOT_AVAILABLE: &str = "N/A";
const INVALID_DATE: &str = "Invalid Date";

const TIER_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

// ============================================================================
// CURRENCY
// ============================================================================

/// Format a USD amount for `locale`, always with two decimals.
///
/// ```
/// use loan_display::format_currency;
/// assert_eq!(format_currency(Some(1234.5), "en-US"), "$1,234.50");
/// assert_eq!(format_currency(None, "en-US"), "$0.00");
/// ```
pub fn format_currency(amount: Option<f64>, locale: &str) -> String {
    let amount = match amount {
        Some(a) if a.is_finite() => a,
        _ => return ZERO_CURRENCY.to_string(),
    };

    let profile = LocaleProfile::resolve(locale);
    let fixed = decimal::to_fixed(amount, 2);
    let (negative, number) = profile.localize_fixed(&fixed);
    profile.wrap_currency(negative, &number)
}

// ============================================================================
// DATES
// ============================================================================

/// Abbreviated month, day and year ("Jan 5, 2024" in en-US).
pub fn format_date(date: Option<DateValue<'_>>, locale: &str) -> String {
    with_parsed(date, |dt| {
        let profile = LocaleProfile::resolve(locale);
        localized(&dt, profile.date_pattern, profile)
    })
}

/// Date as in [`format_date`] plus two-digit hour and minute in the locale's clock.
pub fn format_date_time(date: Option<DateValue<'_>>, locale: &str) -> String {
    with_parsed(date, |dt| {
        let profile = LocaleProfile::resolve(locale);
        format!(
            "{}{}{}",
            localized(&dt, profile.date_pattern, profile),
            profile.date_time_joiner,
            localized(&dt, profile.time_pattern, profile),
        )
    })
}

fn with_parsed<F>(date: Option<DateValue<'_>>, render: F) -> String
where
    F: FnOnce(NaiveDateTime) -> String,
{
    match date.map(|d| d.parse()) {
        None | Some(ParsedDate::Absent) => NOT_AVAILABLE.to_string(),
        Some(ParsedDate::Invalid) => INVALID_DATE.to_string(),
        Some(ParsedDate::Valid(dt)) => render(dt),
    }
}

fn localized(dt: &NaiveDateTime, pattern: &str, profile: &LocaleProfile) -> String {
    Utc.from_utc_datetime(dt)
        .format_localized(pattern, profile.chrono_locale)
        .to_string()
}

// ============================================================================
// PERCENTAGES
// ============================================================================

/// Append `%` to an already-scaled percentage, rounded to `decimals` places.
pub fn format_percentage(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}%", decimal::to_fixed(v, decimals)),
        _ => "0%".to_string(),
    }
}

// ============================================================================
// TEXT
// ============================================================================

/// Cut `text` to `max_length` characters and mark the cut with "...".
pub fn truncate_text(text: Option<&str>, max_length: usize) -> String {
    let text = match text {
        Some(t) if !t.is_empty() => t,
        _ => return String::new(),
    };

    match text.char_indices().nth(max_length) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

// ============================================================================
// LOAN PROGRESS
// ============================================================================

/// Share of a loan already repaid, in percent with one decimal.
///
/// Capped at 100 for overpaid loans. There is no lower cap: a negative amount
/// paid yields a negative progress.
pub fn calculate_loan_progress<L: LoanLike + ?Sized>(loan: Option<&L>) -> f64 {
    let Some(loan) = loan else {
        return 0.0;
    };

    let total = loan.total_amount();
    if !total.is_finite() || total <= 0.0 {
        return 0.0;
    }

    let paid = loan.amount_paid();
    let paid = if paid.is_finite() { paid } else { 0.0 };

    decimal::round_to_f64(paid / total * 100.0, 1).min(100.0)
}

// ============================================================================
// NUMBER SHORTENING
// ============================================================================

/// Compact a number with a K/M/B/T suffix ("1.5K", "-2M").
///
/// Values of a quadrillion and beyond stay in trillions ("1500T").
pub fn shorten_number(num: Option<f64>) -> String {
    let num = match num {
        Some(n) if n.is_finite() && n != 0.0 => n,
        _ => return "0".to_string(),
    };

    let sign = if num < 0.0 { "-" } else { "" };
    let abs = num.abs();

    if abs < 1000.0 {
        return format!("{}{}", sign, abs);
    }

    let mut tier = 0;
    while tier + 1 < TIER_SUFFIXES.len() && abs >= 1000f64.powi(tier as i32 + 1) {
        tier += 1;
    }

    let scaled = abs / 1000f64.powi(tier as i32);
    let fixed = decimal::to_fixed(scaled, 1);
    let trimmed = fixed.strip_suffix(".0").unwrap_or(&fixed);

    format!("{}{}{}", sign, trimmed, TIER_SUFFIXES[tier])
}

// ============================================================================
// STATUS BADGES
// ============================================================================

/// Bootstrap background class for a loan status badge.
pub fn loan_status_class(status: Option<&str>) -> &'static str {
    match status.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("active") => "bg-success",
        Some("pending") => "bg-warning",
        Some("repaid") => "bg-info",
        Some("defaulted") => "bg-danger",
        _ => "bg-secondary",
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanBalance;
    use chrono::NaiveDate;

    fn balance(total_amount: f64, amount_paid: f64) -> LoanBalance {
        LoanBalance {
            total_amount,
            amount_paid,
        }
    }

    // ------------------------------------------------------------------------
    // currency
    // ------------------------------------------------------------------------

    #[test]
    fn test_currency_absent_is_zero_dollars() {
        assert_eq!(format_currency(None, DEFAULT_LOCALE), "$0.00");
        assert_eq!(format_currency(None, "de-DE"), "$0.00");
    }

    #[test]
    fn test_currency_grouping_and_decimals() {
        assert_eq!(format_currency(Some(1234.5), "en-US"), "$1,234.50");
        assert_eq!(format_currency(Some(0.0), "en-US"), "$0.00");
        assert_eq!(format_currency(Some(1_000_000.0), "en-US"), "$1,000,000.00");
        assert_eq!(format_currency(Some(12.345), "en-US"), "$12.35");
        assert_eq!(format_currency(Some(99.999), "en-US"), "$100.00");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(Some(-5.0), "en-US"), "-$5.00");
        assert_eq!(format_currency(Some(-1234.5), "en-US"), "-$1,234.50");
        assert_eq!(format_currency(Some(-0.001), "en-US"), "$0.00");
    }

    #[test]
    fn test_currency_non_finite_is_zero_dollars() {
        assert_eq!(format_currency(Some(f64::NAN), "en-US"), "$0.00");
        assert_eq!(format_currency(Some(f64::INFINITY), "en-US"), "$0.00");
    }

    #[test]
    fn test_currency_other_locales() {
        assert_eq!(format_currency(Some(1234.5), "de-DE"), "1.234,50\u{a0}$");
        assert_eq!(format_currency(Some(1234.5), "en-GB"), "US$1,234.50");
        assert_eq!(format_currency(Some(1234.5), "fr-FR"), "1\u{202f}234,50\u{a0}$US");
        assert_eq!(format_currency(Some(1234.5), "es-ES"), "1234,50\u{a0}US$");
        assert_eq!(format_currency(Some(-1234.5), "pt-BR"), "-US$\u{a0}1.234,50");
    }

    #[test]
    fn test_currency_keeps_two_decimals_at_huge_magnitudes() {
        let groups = ",000".repeat(9);
        assert_eq!(format_currency(Some(1e27), "en-US"), format!("$1{}.00", groups));
        assert_eq!(format_currency(Some(5e28), "en-US"), format!("$50{}.00", groups));
        assert_eq!(format_currency(Some(-1e-30), "en-US"), "$0.00");
    }

    #[test]
    fn test_currency_unknown_locale_uses_en_us() {
        assert_eq!(format_currency(Some(42.0), "tlh-KX"), "$42.00");
    }

    // ------------------------------------------------------------------------
    // dates
    // ------------------------------------------------------------------------

    #[test]
    fn test_date_absent() {
        assert_eq!(format_date(None, DEFAULT_LOCALE), "N/A");
        assert_eq!(format_date(Some("".into()), DEFAULT_LOCALE), "N/A");
    }

    #[test]
    fn test_date_invalid() {
        assert_eq!(format_date(Some("not-a-date".into()), DEFAULT_LOCALE), "Invalid Date");
        assert_eq!(format_date(Some("2023-02-29".into()), DEFAULT_LOCALE), "Invalid Date");
    }

    #[test]
    fn test_date_en_us() {
        assert_eq!(format_date(Some("2024-01-05".into()), "en-US"), "Jan 5, 2024");
        assert_eq!(format_date(Some("2024-12-31T23:59:00Z".into()), "en-US"), "Dec 31, 2024");
    }

    #[test]
    fn test_date_from_chrono_value() {
        let d = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        assert_eq!(format_date(Some(d.into()), "en-US"), "Jul 14, 2023");
    }

    #[test]
    fn test_date_other_locales_order_day_first() {
        let gb = format_date(Some("2024-01-05".into()), "en-GB");
        assert_eq!(gb, "5 Jan 2024");

        let de = format_date(Some("2024-01-05".into()), "de-DE");
        assert!(de.starts_with("5. "));
        assert!(de.ends_with("2024"));
    }

    #[test]
    fn test_date_time_en_us_uses_twelve_hour_clock() {
        let s = format_date_time(Some("2024-01-05T14:30:00".into()), "en-US");
        assert_eq!(s, "Jan 5, 2024, 02:30 PM");

        let morning = format_date_time(Some("2024-01-05T09:05:00".into()), "en-US");
        assert_eq!(morning, "Jan 5, 2024, 09:05 AM");
    }

    #[test]
    fn test_date_time_en_gb_uses_twenty_four_hour_clock() {
        let s = format_date_time(Some("2024-01-05T14:30:00".into()), "en-GB");
        assert_eq!(s, "5 Jan 2024, 14:30");
    }

    #[test]
    fn test_date_time_de_de_uses_twenty_four_hour_clock() {
        let s = format_date_time(Some("2024-01-05T14:30:00".into()), "de-DE");
        assert!(s.starts_with("5. "));
        assert!(s.ends_with("2024, 14:30"));

        let morning = format_date_time(Some("2024-01-05T09:05:00".into()), "de-DE");
        assert!(morning.ends_with(", 09:05"));
    }

    #[test]
    fn test_date_time_absent_and_invalid() {
        assert_eq!(format_date_time(None, DEFAULT_LOCALE), "N/A");
        assert_eq!(format_date_time(Some("yesterday".into()), DEFAULT_LOCALE), "Invalid Date");
    }

    // ------------------------------------------------------------------------
    // percentages
    // ------------------------------------------------------------------------

    #[test]
    fn test_percentage_absent() {
        assert_eq!(format_percentage(None, DEFAULT_PERCENTAGE_DECIMALS), "0%");
    }

    #[test]
    fn test_percentage_is_not_rescaled() {
        assert_eq!(format_percentage(Some(42.5), 1), "42.5%");
        assert_eq!(format_percentage(Some(5.0), 0), "5%");
        assert_eq!(format_percentage(Some(7.25), 2), "7.25%");
    }

    #[test]
    fn test_percentage_honours_every_decimal_place() {
        assert_eq!(format_percentage(Some(1.5), 30), format!("1.5{}%", "0".repeat(29)));
        assert_eq!(
            format_percentage(Some(1e20), 10),
            format!("1{}.{}%", "0".repeat(20), "0".repeat(10))
        );
        assert_eq!(format_percentage(Some(-1e-30), 2), "0.00%");
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(format_percentage(Some(42.449), 1), "42.4%");
        assert_eq!(format_percentage(Some(42.45), 1), "42.5%");
        assert_eq!(format_percentage(Some(1.005), 2), "1.01%");
        assert_eq!(format_percentage(Some(-2.55), 1), "-2.6%");
    }

    // ------------------------------------------------------------------------
    // truncation
    // ------------------------------------------------------------------------

    #[test]
    fn test_truncate_empty_and_absent() {
        assert_eq!(truncate_text(Some(""), 10), "");
        assert_eq!(truncate_text(None, 10), "");
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_text(Some("hello"), 10), "hello");
        assert_eq!(truncate_text(Some("hello"), 5), "hello");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate_text(Some("abcdefghij"), 5), "abcde...");
        assert_eq!(truncate_text(Some("abc"), 0), "...");
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_text(Some("préstamo"), 3), "pré...");
    }

    // ------------------------------------------------------------------------
    // loan progress
    // ------------------------------------------------------------------------

    #[test]
    fn test_progress_basic() {
        assert_eq!(calculate_loan_progress(Some(&balance(1000.0, 500.0))), 50.0);
        assert_eq!(calculate_loan_progress(Some(&balance(3000.0, 1000.0))), 33.3);
        assert_eq!(calculate_loan_progress(Some(&balance(3000.0, 2000.0))), 66.7);
    }

    #[test]
    fn test_progress_clamped_to_hundred() {
        assert_eq!(calculate_loan_progress(Some(&balance(1000.0, 1200.0))), 100.0);
    }

    #[test]
    fn test_progress_zero_cases() {
        assert_eq!(calculate_loan_progress(Some(&balance(0.0, 100.0))), 0.0);
        assert_eq!(calculate_loan_progress(Some(&balance(-50.0, 100.0))), 0.0);
        assert_eq!(calculate_loan_progress(None::<&LoanBalance>), 0.0);
    }

    #[test]
    fn test_progress_negative_paid_is_not_clamped() {
        assert_eq!(calculate_loan_progress(Some(&balance(1000.0, -100.0))), -10.0);
    }

    #[test]
    fn test_progress_non_finite_paid_counts_as_zero() {
        assert_eq!(calculate_loan_progress(Some(&balance(1000.0, f64::NAN))), 0.0);
    }

    // ------------------------------------------------------------------------
    // number shortening
    // ------------------------------------------------------------------------

    #[test]
    fn test_shorten_zero_and_absent() {
        assert_eq!(shorten_number(Some(0.0)), "0");
        assert_eq!(shorten_number(None), "0");
    }

    #[test]
    fn test_shorten_small_numbers_unchanged() {
        assert_eq!(shorten_number(Some(999.0)), "999");
        assert_eq!(shorten_number(Some(12.5)), "12.5");
        assert_eq!(shorten_number(Some(-42.0)), "-42");
    }

    #[test]
    fn test_shorten_tiers() {
        assert_eq!(shorten_number(Some(1000.0)), "1K");
        assert_eq!(shorten_number(Some(1500.0)), "1.5K");
        assert_eq!(shorten_number(Some(2000.0)), "2K");
        assert_eq!(shorten_number(Some(2_500_000.0)), "2.5M");
        assert_eq!(shorten_number(Some(7_250_000_000.0)), "7.3B");
        assert_eq!(shorten_number(Some(3e12)), "3T");
    }

    #[test]
    fn test_shorten_negative() {
        assert_eq!(shorten_number(Some(-2_000_000.0)), "-2M");
        assert_eq!(shorten_number(Some(-1500.0)), "-1.5K");
    }

    #[test]
    fn test_shorten_rounding_can_reach_next_tier_value() {
        // the tier is chosen before rounding
        assert_eq!(shorten_number(Some(999_950.0)), "1000K");
        assert_eq!(shorten_number(Some(999_940.0)), "999.9K");
    }

    #[test]
    fn test_shorten_beyond_trillions_stays_in_trillions() {
        assert_eq!(shorten_number(Some(1.5e15)), "1500T");
    }

    // ------------------------------------------------------------------------
    // status badge
    // ------------------------------------------------------------------------

    #[test]
    fn test_loan_status_class() {
        assert_eq!(loan_status_class(Some("Active")), "bg-success");
        assert_eq!(loan_status_class(Some("PENDING")), "bg-warning");
        assert_eq!(loan_status_class(Some("repaid")), "bg-info");
        assert_eq!(loan_status_class(Some("Defaulted")), "bg-danger");
        assert_eq!(loan_status_class(Some("Frozen")), "bg-secondary");
        assert_eq!(loan_status_class(None), "bg-secondary");
    }
}

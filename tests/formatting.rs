#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use loan_display::{
    calculate_loan_progress, format_currency, format_date, format_date_time, format_percentage,
    shorten_number, truncate_text, LoanBalance, LoanLike, DEFAULT_LOCALE,
};

/// Any record with a total and a paid amount can report progress
struct Mortgage {
    principal: f64,
    repaid: f64,
}

impl LoanLike for Mortgage {
    fn total_amount(&self) -> f64 {
        self.principal
    }

    fn amount_paid(&self) -> f64 {
        self.repaid
    }
}

#[test]
fn currency_placeholders_and_grouping() {
    assert_eq!(format_currency(None, DEFAULT_LOCALE), "$0.00");
    assert_eq!(format_currency(Some(1234.5), DEFAULT_LOCALE), "$1,234.50");
    assert_eq!(format_currency(Some(-5.0), DEFAULT_LOCALE), "-$5.00");
}

#[test]
fn dates_from_text_and_chrono() {
    assert_eq!(format_date(None, DEFAULT_LOCALE), "N/A");
    assert_eq!(format_date(Some("not-a-date".into()), DEFAULT_LOCALE), "Invalid Date");
    assert_eq!(format_date(Some("2024-01-05".into()), DEFAULT_LOCALE), "Jan 5, 2024");

    let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    assert_eq!(format_date(Some(d.into()), DEFAULT_LOCALE), "Jan 5, 2024");

    let owned = String::from("2024-01-05T14:30:00");
    assert_eq!(
        format_date_time(Some((&owned).into()), DEFAULT_LOCALE),
        "Jan 5, 2024, 02:30 PM"
    );
}

#[test]
fn percentage_rounds_half_up() {
    assert_eq!(format_percentage(None, 1), "0%");
    assert_eq!(format_percentage(Some(42.449), 1), "42.4%");
    assert_eq!(format_percentage(Some(42.45), 1), "42.5%");
    assert_eq!(format_percentage(Some(42.5), 0), "43%");
}

#[test]
fn truncation() {
    assert_eq!(truncate_text(Some(""), 10), "");
    assert_eq!(truncate_text(Some("hello"), 10), "hello");
    assert_eq!(truncate_text(Some("abcdefghij"), 5), "abcde...");
}

#[test]
fn progress_accepts_any_loan_like() {
    let half = LoanBalance {
        total_amount: 1000.0,
        amount_paid: 500.0,
    };
    assert_eq!(calculate_loan_progress(Some(&half)), 50.0);

    let overpaid = Mortgage {
        principal: 1000.0,
        repaid: 1200.0,
    };
    assert_eq!(calculate_loan_progress(Some(&overpaid)), 100.0);

    let empty = Mortgage {
        principal: 0.0,
        repaid: 100.0,
    };
    assert_eq!(calculate_loan_progress(Some(&empty)), 0.0);
    assert_eq!(calculate_loan_progress(None::<&Mortgage>), 0.0);
}

#[test]
fn shortening() {
    assert_eq!(shorten_number(Some(0.0)), "0");
    assert_eq!(shorten_number(Some(999.0)), "999");
    assert_eq!(shorten_number(Some(1500.0)), "1.5K");
    assert_eq!(shorten_number(Some(-2_000_000.0)), "-2M");
}

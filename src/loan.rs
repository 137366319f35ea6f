// 🏦 Loan records and the loan card view
//
// `LoanLike` is the minimal shape the progress calculation needs. `Loan` is the
// full record as the servicing API delivers it (camelCase JSON). `LoanCardView`
// is everything a loan card shows, already formatted.

use crate::config::DisplayConfig;
use crate::formatters::{
    calculate_loan_progress, format_currency, format_date, format_percentage,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// LOAN-LIKE
// ============================================================================

/// Anything with a total amount and an amount already paid
pub trait LoanLike {
    fn total_amount(&self) -> f64;
    fn amount_paid(&self) -> f64;
}

/// Bare two-field loan shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanBalance {
    pub total_amount: f64,
    pub amount_paid: f64,
}

impl LoanLike for LoanBalance {
    fn total_amount(&self) -> f64 {
        self.total_amount
    }

    fn amount_paid(&self) -> f64 {
        self.amount_paid
    }
}

// ============================================================================
// LOAN STATUS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanStatus {
    Active,
    Pending,
    Repaid,
    Defaulted,

    /// Anything the servicing API sends that we don't know about
    Other(String),
}

impl LoanStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Pending => "Pending",
            LoanStatus::Repaid => "Repaid",
            LoanStatus::Defaulted => "Defaulted",
            LoanStatus::Other(s) => s,
        }
    }

    /// Bootstrap badge class
    pub fn badge_class(&self) -> &'static str {
        crate::formatters::loan_status_class(Some(self.as_str()))
    }

    pub fn is_active(&self) -> bool {
        *self == LoanStatus::Active
    }
}

impl From<String> for LoanStatus {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => LoanStatus::Active,
            "pending" => LoanStatus::Pending,
            "repaid" => LoanStatus::Repaid,
            "defaulted" => LoanStatus::Defaulted,
            _ => LoanStatus::Other(s),
        }
    }
}

impl From<LoanStatus> for String {
    fn from(status: LoanStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// LOAN
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: String,

    /// Product name, e.g. "Personal Loan"
    #[serde(rename = "type", default)]
    pub loan_type: String,

    pub status: LoanStatus,

    #[serde(default)]
    pub total_amount: f64,

    #[serde(default)]
    pub amount_paid: f64,

    #[serde(default)]
    pub monthly_payment: f64,

    /// Annual rate, already in percent (5.5 means 5.5%)
    #[serde(default)]
    pub interest_rate: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,

    /// Balance as reported by the servicer, when it differs from total - paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_balance: Option<f64>,

    /// Remaining term in months, used by top-up estimates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<u32>,
}

impl LoanLike for Loan {
    fn total_amount(&self) -> f64 {
        self.total_amount
    }

    fn amount_paid(&self) -> f64 {
        self.amount_paid
    }
}

impl Loan {
    /// What is still owed.
    ///
    /// The servicer's `remainingBalance` wins when present and non-zero;
    /// otherwise it's total minus paid.
    pub fn outstanding_balance(&self) -> f64 {
        match self.remaining_balance {
            Some(balance) if balance != 0.0 && balance.is_finite() => balance,
            _ => self.total_amount - self.amount_paid,
        }
    }

    pub fn progress(&self) -> f64 {
        calculate_loan_progress(Some(self))
    }

    /// Unrounded share repaid in percent, capped at 100
    fn raw_progress(&self) -> f64 {
        if !self.total_amount.is_finite() || self.total_amount <= 0.0 || !self.amount_paid.is_finite() {
            return 0.0;
        }
        (self.amount_paid / self.total_amount * 100.0).min(100.0)
    }

    pub fn can_make_payment(&self) -> bool {
        self.status.is_active()
    }
}

// ============================================================================
// LOAN CARD VIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanCardView {
    pub id: String,
    pub title: String,
    pub id_label: String,
    pub status: String,
    pub badge_class: &'static str,
    pub total_amount: String,
    pub amount_paid: String,
    pub remaining: String,
    pub progress_label: String,
    /// Progress bar width, 0..=100
    pub progress_width: f64,
    pub monthly_payment: String,
    pub interest_rate: String,
    pub start_date: String,
    pub duration: String,
    pub can_make_payment: bool,
}

impl LoanCardView {
    pub fn build(loan: &Loan, config: &DisplayConfig) -> Self {
        let locale = config.locale.as_str();
        let progress = loan.progress();

        LoanCardView {
            id: loan.id.clone(),
            title: loan.loan_type.clone(),
            id_label: format!("#{}", loan.id),
            status: loan.status.to_string(),
            badge_class: loan.status.badge_class(),
            total_amount: format_currency(Some(loan.total_amount), locale),
            amount_paid: format_currency(Some(loan.amount_paid), locale),
            remaining: format_currency(Some(loan.total_amount - loan.amount_paid), locale),
            progress_label: format_percentage(Some(loan.raw_progress()), 0),
            progress_width: progress.clamp(0.0, 100.0),
            monthly_payment: format_currency(Some(loan.monthly_payment), locale),
            interest_rate: format!("{}%", loan.interest_rate),
            start_date: format_date(loan.start_date.as_ref().map(Into::into), locale),
            duration: match loan.duration_months {
                Some(months) => format!("{} months", months),
                None => "N/A".to_string(),
            },
            can_make_payment: loan.can_make_payment(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

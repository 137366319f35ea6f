// ➕ Loan top-ups - amount rules and the new monthly payment estimate
//
// The estimate is a flat-interest approximation, not an amortization schedule:
//   new_monthly = monthly + amount * (1 + rate/100) / term

use crate::formatters::format_currency;
use crate::loan::Loan;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const MIN_TOP_UP: f64 = 100.0;
pub const MAX_TOP_UP: f64 = 50_000.0;

/// Used when the loan carries no interest rate
pub const DEFAULT_INTEREST_RATE: f64 = 5.0;
/// Used when the loan carries no remaining term
pub const DEFAULT_TERM_MONTHS: u32 = 12;

// ============================================================================
// PURPOSE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopUpPurpose {
    #[serde(rename = "Home Improvement")]
    HomeImprovement,
    #[serde(rename = "Business Expansion")]
    BusinessExpansion,
    Education,
    #[serde(rename = "Medical Expenses")]
    MedicalExpenses,
    #[serde(rename = "Debt Consolidation")]
    DebtConsolidation,
    Other,
}

impl TopUpPurpose {
    pub const ALL: [TopUpPurpose; 6] = [
        TopUpPurpose::HomeImprovement,
        TopUpPurpose::BusinessExpansion,
        TopUpPurpose::Education,
        TopUpPurpose::MedicalExpenses,
        TopUpPurpose::DebtConsolidation,
        TopUpPurpose::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TopUpPurpose::HomeImprovement => "Home Improvement",
            TopUpPurpose::BusinessExpansion => "Business Expansion",
            TopUpPurpose::Education => "Education",
            TopUpPurpose::MedicalExpenses => "Medical Expenses",
            TopUpPurpose::DebtConsolidation => "Debt Consolidation",
            TopUpPurpose::Other => "Other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for TopUpPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopUpError {
    #[error("Top up amount is required")]
    AmountRequired,

    #[error("Enter a valid amount")]
    InvalidAmount,

    #[error("Minimum top up amount is $100")]
    BelowMinimum,

    #[error("Maximum top up amount is $50,000")]
    AboveMaximum,

    #[error("Please select a purpose for the top up")]
    PurposeRequired,

    #[error("You must agree to terms and conditions")]
    TermsNotAccepted,
}

/// Digits with at most two decimals: "1500", "1500.5", "1500.50"
fn is_plain_amount(s: &str) -> bool {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());

    digits(int_part) && frac_part.map_or(true, |f| f.len() <= 2 && digits(f))
}

/// Parse what the borrower typed into the amount field
pub fn parse_top_up_amount(raw: &str) -> Result<f64, TopUpError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TopUpError::AmountRequired);
    }
    if !is_plain_amount(raw) {
        return Err(TopUpError::InvalidAmount);
    }

    let amount: f64 = raw.parse().map_err(|_| TopUpError::InvalidAmount)?;
    if amount < MIN_TOP_UP {
        return Err(TopUpError::BelowMinimum);
    }
    if amount > MAX_TOP_UP {
        return Err(TopUpError::AboveMaximum);
    }
    Ok(amount)
}

// ============================================================================
// ESTIMATE
// ============================================================================

/// Monthly payment after adding `amount` to the loan.
///
/// A missing, non-numeric or non-positive amount leaves the current payment as is.
pub fn estimate_new_monthly_payment(loan: &Loan, amount: Option<f64>) -> f64 {
    let current = loan.monthly_payment;

    let amount = match amount {
        Some(a) if a.is_finite() && a > 0.0 => a,
        _ => return current,
    };

    let rate = if loan.interest_rate != 0.0 && loan.interest_rate.is_finite() {
        loan.interest_rate
    } else {
        DEFAULT_INTEREST_RATE
    };
    let term = match loan.term {
        Some(t) if t > 0 => t,
        _ => DEFAULT_TERM_MONTHS,
    };

    current + amount * (1.0 + rate / 100.0) / f64::from(term)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopUpSummary {
    pub current_total: f64,
    pub top_up_amount: f64,
    pub new_total: f64,
    pub new_monthly_payment: f64,
    pub lines: Vec<(&'static str, String)>,
}

impl TopUpSummary {
    pub fn compute(loan: &Loan, amount: f64, locale: &str) -> Self {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let new_total = loan.total_amount + amount;
        let new_monthly_payment = estimate_new_monthly_payment(loan, Some(amount));

        let lines = vec![
            ("Current loan amount", format_currency(Some(loan.total_amount), locale)),
            ("Top up amount", format_currency(Some(amount), locale)),
            ("New total amount", format_currency(Some(new_total), locale)),
            ("New est. monthly payment", format_currency(Some(new_monthly_payment), locale)),
        ];

        TopUpSummary {
            current_total: loan.total_amount,
            top_up_amount: amount,
            new_total,
            new_monthly_payment,
            lines,
        }
    }
}

// ============================================================================
// REQUEST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequest {
    pub loan_id: String,
    pub top_up_amount: f64,
    pub purpose: TopUpPurpose,
}

impl TopUpRequest {
    pub fn new(
        loan: &Loan,
        raw_amount: &str,
        purpose: Option<TopUpPurpose>,
        agreed_to_terms: bool,
    ) -> Result<Self, TopUpError> {
        let top_up_amount = parse_top_up_amount(raw_amount)?;
        let purpose = purpose.ok_or(TopUpError::PurposeRequired)?;
        if !agreed_to_terms {
            return Err(TopUpError::TermsNotAccepted);
        }

        Ok(TopUpRequest {
            loan_id: loan.id.clone(),
            top_up_amount,
            purpose,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

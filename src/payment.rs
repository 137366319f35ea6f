// 💳 Payments - presets, balance preview and validation for the payment form
//
// Submission itself belongs to the servicing backend. This module stops at a
// validated `PaymentRequest` value.

use crate::formatters::{format_currency, DEFAULT_LOCALE};
use crate::loan::Loan;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINIMUM_PAYMENT: f64 = 5.0;

/// Shown instead of card fields when paying by bank transfer
pub const BANK_TRANSFER_DETAILS: [(&str, &str); 3] = [
    ("Account Name", "Loan Company Inc."),
    ("Account Number", "123456789"),
    ("Routing Number", "987654321"),
];

// ============================================================================
// PAYMENT TYPE / METHOD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// The scheduled monthly payment
    #[default]
    Minimum,
    /// Everything still owed
    Full,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Bank,
}

/// Amount pre-filled for a payment type. `Custom` has none: the borrower types it.
pub fn preset_amount(loan: &Loan, payment_type: PaymentType) -> Option<f64> {
    match payment_type {
        PaymentType::Minimum => Some(loan.monthly_payment),
        PaymentType::Full => Some(loan.outstanding_balance()),
        PaymentType::Custom => None,
    }
}

/// Reference line for bank transfers
pub fn bank_transfer_reference(loan: &Loan) -> String {
    format!("Loan #{}", loan.id)
}

// ============================================================================
// PAYMENT SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub current_balance: f64,
    pub payment_amount: f64,
    /// Never below zero
    pub balance_after_payment: f64,
}

impl PaymentSummary {
    pub fn compute(loan: &Loan, amount: f64) -> Self {
        let current_balance = loan.outstanding_balance();
        let payment_amount = if amount.is_finite() { amount } else { 0.0 };

        PaymentSummary {
            current_balance,
            payment_amount,
            balance_after_payment: (current_balance - payment_amount).max(0.0),
        }
    }

    /// (label, formatted value) rows in display order
    pub fn rows(&self, locale: &str) -> Vec<(&'static str, String)> {
        vec![
            ("Current Balance", format_currency(Some(self.current_balance), locale)),
            ("Payment Amount", format_currency(Some(self.payment_amount), locale)),
            (
                "Balance After Payment",
                format_currency(Some(self.balance_after_payment), locale),
            ),
        ]
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    #[error("Amount is required")]
    AmountRequired,

    #[error("Payment amount must be greater than zero")]
    NotPositive,

    #[error("Minimum payment amount is $5")]
    BelowMinimum,

    #[error("Maximum payment amount is {max}")]
    AboveBalance { max: String },

    #[error("{0}")]
    Card(#[from] CardError),
}

pub fn validate_payment_amount(loan: &Loan, amount: Option<f64>) -> Result<f64, PaymentError> {
    let amount = match amount {
        Some(a) if a.is_finite() => a,
        _ => return Err(PaymentError::AmountRequired),
    };

    if amount <= 0.0 {
        return Err(PaymentError::NotPositive);
    }
    if amount < MINIMUM_PAYMENT {
        return Err(PaymentError::BelowMinimum);
    }

    let outstanding = loan.outstanding_balance();
    if amount > outstanding {
        return Err(PaymentError::AboveBalance {
            max: format_currency(Some(outstanding), DEFAULT_LOCALE),
        });
    }

    Ok(amount)
}

// ============================================================================
// CARD DETAILS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardError {
    #[error("Card number is required")]
    NumberRequired,
    #[error("Please enter a valid 16-digit card number")]
    InvalidNumber,
    #[error("Cardholder name is required")]
    NameRequired,
    #[error("Expiry date is required")]
    ExpiryRequired,
    #[error("Please use MM/YY format")]
    InvalidExpiry,
    #[error("CVV is required")]
    CvvRequired,
    #[error("CVV must be 3 or 4 digits")]
    InvalidCvv,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub card_name: String,
    pub expiry_date: String,
    pub cvv: String,
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

impl CardDetails {
    /// Every problem with the card fields, in form order
    pub fn validate(&self) -> Vec<CardError> {
        let mut errors = Vec::new();

        if self.card_number.is_empty() {
            errors.push(CardError::NumberRequired);
        } else if self.card_number.len() != 16 || !all_digits(&self.card_number) {
            errors.push(CardError::InvalidNumber);
        }

        if self.card_name.trim().is_empty() {
            errors.push(CardError::NameRequired);
        }

        if self.expiry_date.is_empty() {
            errors.push(CardError::ExpiryRequired);
        } else if !valid_expiry(&self.expiry_date) {
            errors.push(CardError::InvalidExpiry);
        }

        if self.cvv.is_empty() {
            errors.push(CardError::CvvRequired);
        } else if !(3..=4).contains(&self.cvv.len()) || !all_digits(&self.cvv) {
            errors.push(CardError::InvalidCvv);
        }

        errors
    }
}

/// MM/YY with a month of 01-12
fn valid_expiry(s: &str) -> bool {
    let Some((month, year)) = s.split_once('/') else {
        return false;
    };
    if month.len() != 2 || year.len() != 2 || !all_digits(month) || !all_digits(year) {
        return false;
    }
    matches!(month.parse::<u8>(), Ok(1..=12))
}

// ============================================================================
// PAYMENT REQUEST
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub amount: f64,
    pub payment_method: PaymentMethod,
    /// Card fields for card payments, empty for bank transfers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<CardDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub loan_id: String,
    pub payment_data: PaymentData,
}

impl PaymentRequest {
    /// Build a request, or the first problem that blocks it
    pub fn new(
        loan: &Loan,
        amount: Option<f64>,
        method: PaymentMethod,
        card: Option<CardDetails>,
    ) -> Result<Self, PaymentError> {
        let amount = validate_payment_amount(loan, amount)?;

        let payment_details = match method {
            PaymentMethod::Card => {
                let card = card.unwrap_or_default();
                if let Some(err) = card.validate().into_iter().next() {
                    return Err(err.into());
                }
                Some(card)
            }
            PaymentMethod::Bank => None,
        };

        Ok(PaymentRequest {
            loan_id: loan.id.clone(),
            payment_data: PaymentData {
                amount,
                payment_method: method,
                payment_details,
            },
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

// 🧾 Loan transactions - what the transactions table shows
//
// CSV columns: id, loanId, date, type, amount, status
// Rows are shown newest first; rows with unreadable dates sink to the bottom.

use crate::dates;
use crate::formatters::{format_currency, format_date};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

// ============================================================================
// TRANSACTION TYPE / STATUS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Payment,
    Withdrawal,
    Disbursement,
    Fee,
    Interest,
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Payment => "Payment",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Disbursement => "Disbursement",
            TransactionType::Fee => "Fee",
            TransactionType::Interest => "Interest",
            TransactionType::Other(s) => s,
        }
    }

    /// Bootstrap contextual color for the type badge
    pub fn style(&self) -> &'static str {
        match self {
            TransactionType::Payment => "success",
            TransactionType::Withdrawal => "danger",
            TransactionType::Disbursement => "primary",
            TransactionType::Fee => "warning",
            TransactionType::Interest => "info",
            TransactionType::Other(_) => "secondary",
        }
    }
}

impl From<String> for TransactionType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Payment" => TransactionType::Payment,
            "Withdrawal" => TransactionType::Withdrawal,
            "Disbursement" => TransactionType::Disbursement,
            "Fee" => TransactionType::Fee,
            "Interest" => TransactionType::Interest,
            _ => TransactionType::Other(s),
        }
    }
}

impl From<TransactionType> for String {
    fn from(t: TransactionType) -> Self {
        t.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
    Refunded,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Refunded => "Refunded",
            TransactionStatus::Other(s) => s,
        }
    }

    pub fn style(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "success",
            TransactionStatus::Pending => "warning",
            TransactionStatus::Failed => "danger",
            TransactionStatus::Refunded => "info",
            TransactionStatus::Other(_) => "secondary",
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Completed" => TransactionStatus::Completed,
            "Pending" => TransactionStatus::Pending,
            "Failed" => TransactionStatus::Failed,
            "Refunded" => TransactionStatus::Refunded,
            _ => TransactionStatus::Other(s),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(s: TransactionStatus) -> Self {
        s.as_str().to_string()
    }
}

// ============================================================================
// TRANSACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTransaction {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,

    pub date: String,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub amount: Option<f64>,

    pub status: TransactionStatus,
}

/// Newest first. Stable, so same-day rows keep their input order.
/// Each date is parsed once.
pub fn sort_newest_first(transactions: &mut [LoanTransaction]) {
    transactions.sort_by_cached_key(|tx| {
        let key = dates::sort_key(&tx.date);
        (key.is_none(), Reverse(key))
    });
}

/// Transactions belonging to one loan
pub fn for_loan<'a>(
    transactions: &'a [LoanTransaction],
    loan_id: &'a str,
) -> impl Iterator<Item = &'a LoanTransaction> + 'a {
    transactions
        .iter()
        .filter(move |tx| tx.loan_id.as_deref() == Some(loan_id))
}

// ============================================================================
// TABLE ROW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub transaction_type: String,
    pub type_style: &'static str,
    pub amount: String,
    /// Payments are highlighted in the amount column
    pub amount_class: &'static str,
    pub status: String,
    pub status_style: &'static str,
}

impl TransactionRow {
    pub fn build(tx: &LoanTransaction, locale: &str) -> Self {
        TransactionRow {
            id: tx.id.clone(),
            date: format_date(Some((&tx.date).into()), locale),
            transaction_type: tx.transaction_type.as_str().to_string(),
            type_style: tx.transaction_type.style(),
            amount: format_currency(tx.amount, locale),
            amount_class: if tx.transaction_type == TransactionType::Payment {
                "text-success"
            } else {
                ""
            },
            status: tx.status.as_str().to_string(),
            status_style: tx.status.style(),
        }
    }
}

/// Sorted, formatted rows ready for a table
pub fn table_rows(transactions: &[LoanTransaction], locale: &str) -> Vec<TransactionRow> {
    let mut sorted = transactions.to_vec();
    sort_newest_first(&mut sorted);
    sorted.iter().map(|tx| TransactionRow::build(tx, locale)).collect()
}

// ============================================================================
// TESTS
// ============================================================================

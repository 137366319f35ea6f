// 📊 Portfolio summary - totals across all of a borrower's loans

use crate::formatters::format_currency;
use crate::loan::Loan;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_loan_amount: f64,
    pub total_outstanding: f64,
    /// Only Active loans are being paid
    pub total_monthly_payment: f64,
    pub active_loans: usize,
}

/// One tile of the summary row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    /// Bootstrap contextual color name
    pub tone: &'static str,
}

impl PortfolioSummary {
    pub fn from_loans(loans: &[Loan]) -> Self {
        loans.iter().fold(PortfolioSummary::default(), |mut acc, loan| {
            acc.total_loan_amount += loan.total_amount;
            acc.total_outstanding += loan.total_amount - loan.amount_paid;
            if loan.status.is_active() {
                acc.total_monthly_payment += loan.monthly_payment;
                acc.active_loans += 1;
            }
            acc
        })
    }

    pub fn stat_cards(&self, locale: &str) -> Vec<StatCard> {
        vec![
            StatCard {
                title: "Total Loan Amount",
                value: format_currency(Some(self.total_loan_amount), locale),
                tone: "primary",
            },
            StatCard {
                title: "Outstanding Balance",
                value: format_currency(Some(self.total_outstanding), locale),
                tone: "warning",
            },
            StatCard {
                title: "Monthly Payment",
                value: format_currency(Some(self.total_monthly_payment), locale),
                tone: "info",
            },
            StatCard {
                title: "Active Loans",
                value: self.active_loans.to_string(),
                tone: "success",
            },
        ]
    }
}

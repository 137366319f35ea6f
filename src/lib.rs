// Loan Display - Core Library
// Display formatting and view-models for the loan-servicing front end.
// Used by the CLI, the terminal dashboard and the API server.

pub mod config;
pub mod data;
pub mod dates;
pub mod decimal;
pub mod error;
pub mod formatters;     // The seven display formatters
pub mod loan;
pub mod locale;
pub mod payment;
pub mod summary;
pub mod top_up;
pub mod transactions;

// Re-export commonly used types
pub use formatters::{
    calculate_loan_progress, format_currency, format_date, format_date_time,
    format_percentage, loan_status_class, shorten_number, truncate_text,
    DEFAULT_LOCALE, DEFAULT_PERCENTAGE_DECIMALS, DEFAULT_TRUNCATE_LENGTH,
};
pub use dates::{DateValue, ParsedDate};
pub use locale::LocaleProfile;
pub use loan::{Loan, LoanBalance, LoanCardView, LoanLike, LoanStatus};
pub use summary::{PortfolioSummary, StatCard};
pub use payment::{
    CardDetails, CardError, PaymentError, PaymentMethod, PaymentRequest, PaymentSummary,
    PaymentType,
};
pub use top_up::{TopUpError, TopUpPurpose, TopUpRequest, TopUpSummary};
pub use transactions::{LoanTransaction, TransactionRow, TransactionStatus, TransactionType};
pub use config::{AppConfig, DisplayConfig};
pub use error::DisplayError;
pub use data::{load_loans, load_transactions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

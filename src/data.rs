// 📂 Data loading - loans (JSON array) and transactions (CSV)

use crate::loan::Loan;
use crate::transactions::LoanTransaction;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub fn load_loans(json_path: &Path) -> Result<Vec<Loan>> {
    let file = File::open(json_path)
        .with_context(|| format!("Failed to open loans file {}", json_path.display()))?;

    let loans: Vec<Loan> = serde_json::from_reader(BufReader::new(file))
        .context("Failed to deserialize loans")?;

    tracing::debug!(count = loans.len(), path = %json_path.display(), "loaded loans");
    Ok(loans)
}

pub fn load_transactions(csv_path: &Path) -> Result<Vec<LoanTransaction>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut transactions = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let tx: LoanTransaction = result
            .with_context(|| format!("Failed to deserialize transaction on row {}", line + 1))?;
        transactions.push(tx);
    }

    tracing::debug!(count = transactions.len(), path = %csv_path.display(), "loaded transactions");
    Ok(transactions)
}

pub fn find_loan<'a>(loans: &'a [Loan], id: &str) -> Option<&'a Loan> {
    loans.iter().find(|loan| loan.id == id)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("loan-display-{}-{}", std::process::id(), name));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_loans() {
        let path = temp_file(
            "loans.json",
            r#"[{"id":"L-1","type":"Personal Loan","status":"Active","totalAmount":1000,"amountPaid":500}]"#,
        );

        let loans = load_loans(&path).unwrap();
        assert_eq!(loans.len(), 1);
        assert!(find_loan(&loans, "L-1").is_some());
        assert!(find_loan(&loans, "L-2").is_none());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_transactions() {
        let path = temp_file(
            "transactions.csv",
            "id,loanId,date,type,amount,status\nT-1,L-1,2024-01-05,Payment,450,Completed\n",
        );

        let txs = load_transactions(&path).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].loan_id.as_deref(), Some("L-1"));

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_files_are_errors() {
        assert!(load_loans(Path::new("/no/such/loans.json")).is_err());
        assert!(load_transactions(Path::new("/no/such/transactions.csv")).is_err());
    }

    #[test]
    fn test_malformed_loans_json() {
        let path = temp_file("bad.json", r#"{"not": "an array"}"#);
        let err = load_loans(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize loans"));
        std::fs::remove_file(path).ok();
    }
}

// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use loan_display::config::{self, AppConfig};
use loan_display::transactions::{self, table_rows};
use loan_display::{
    calculate_loan_progress, format_currency, format_date, format_date_time, format_percentage,
    load_loans, load_transactions, shorten_number, truncate_text, LoanBalance, LoanCardView,
    PortfolioSummary,
};

#[derive(Parser)]
#[command(name = "loan-display", version, about = "Loan servicing display tools")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override display.locale (e.g. en-US, de-DE)
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Portfolio totals across all loans
    Summary {
        #[arg(long)]
        loans: Option<PathBuf>,
    },
    /// One card per loan
    Loans {
        #[arg(long)]
        loans: Option<PathBuf>,
    },
    /// Transactions table, newest first
    Transactions {
        #[arg(long)]
        file: Option<PathBuf>,
        /// Only transactions for this loan id
        #[arg(long)]
        loan: Option<String>,
    },
    /// Run a single formatter on a raw value
    Format {
        kind: FormatKind,
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Decimal places for `percentage`
        #[arg(long)]
        decimals: Option<u32>,
        /// Maximum length for `truncate`
        #[arg(long)]
        max_length: Option<usize>,
    },
    /// Interactive dashboard (needs the `tui` feature)
    Tui {
        #[arg(long)]
        loans: Option<PathBuf>,
        #[arg(long)]
        transactions: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatKind {
    Currency,
    Date,
    DateTime,
    Percentage,
    Truncate,
    /// VALUE is "paid/total"
    Progress,
    Shorten,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(locale) = cli.locale {
        cfg.display.locale = locale;
    }

    match cli.command {
        Command::Summary { loans } => run_summary(&cfg, loans),
        Command::Loans { loans } => run_loans(&cfg, loans),
        Command::Transactions { file, loan } => run_transactions(&cfg, file, loan),
        Command::Format {
            kind,
            value,
            decimals,
            max_length,
        } => {
            println!("{}", run_format(&cfg, kind, &value, decimals, max_length));
            Ok(())
        }
        Command::Tui { loans, transactions } => run_ui_mode(&cfg, loans, transactions),
    }
}

fn run_summary(cfg: &AppConfig, loans_path: Option<PathBuf>) -> Result<()> {
    let path = loans_path.unwrap_or_else(|| cfg.data.loans_path.clone());
    let loans = load_loans(&path)?;

    let summary = PortfolioSummary::from_loans(&loans);

    println!("📊 Loan Portfolio ({} loans)", loans.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for card in summary.stat_cards(&cfg.display.locale) {
        println!("{:<22} {:>16}", card.title, card.value);
    }

    Ok(())
}

fn run_loans(cfg: &AppConfig, loans_path: Option<PathBuf>) -> Result<()> {
    let path = loans_path.unwrap_or_else(|| cfg.data.loans_path.clone());
    let loans = load_loans(&path)?;

    for loan in &loans {
        let card = LoanCardView::build(loan, &cfg.display);

        println!("\n🏦 {} {}  [{}]", card.title, card.id_label, card.status);
        println!("   Total Amount:    {}", card.total_amount);
        println!("   Paid:            {}", card.amount_paid);
        println!("   Remaining:       {}", card.remaining);
        println!("   Progress:        {}", card.progress_label);
        println!("   Monthly Payment: {}", card.monthly_payment);
        println!("   Interest Rate:   {}", card.interest_rate);
        println!("   Start Date:      {}", card.start_date);
        println!("   Duration:        {}", card.duration);
        if card.can_make_payment {
            println!("   ✓ Payments open");
        }
    }

    if loans.is_empty() {
        println!("No loans found.");
    }

    Ok(())
}

fn run_transactions(cfg: &AppConfig, file: Option<PathBuf>, loan: Option<String>) -> Result<()> {
    let path = file.unwrap_or_else(|| cfg.data.transactions_path.clone());
    let mut txs = load_transactions(&path)?;

    if let Some(loan_id) = loan.as_deref() {
        txs = transactions::for_loan(&txs, loan_id).cloned().collect();
    }

    let rows = table_rows(&txs, &cfg.display.locale);

    println!(
        "{:<14} {:<14} {:<14} {:>16} {:<10}",
        "Date", "Transaction ID", "Type", "Amount", "Status"
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for row in &rows {
        println!(
            "{:<14} {:<14} {:<14} {:>16} {:<10}",
            row.date,
            truncate_text(Some(row.id.as_str()), 14),
            row.transaction_type,
            row.amount,
            row.status
        );
    }

    if rows.is_empty() {
        println!("No transactions found.");
    }

    Ok(())
}

fn run_format(
    cfg: &AppConfig,
    kind: FormatKind,
    value: &str,
    decimals: Option<u32>,
    max_length: Option<usize>,
) -> String {
    let locale = cfg.display.locale.as_str();
    let number = value.trim().parse::<f64>().ok();

    match kind {
        FormatKind::Currency => format_currency(number, locale),
        FormatKind::Date => format_date(Some(value.into()), locale),
        FormatKind::DateTime => format_date_time(Some(value.into()), locale),
        FormatKind::Percentage => {
            format_percentage(number, decimals.unwrap_or(cfg.display.percentage_decimals))
        }
        FormatKind::Truncate => {
            truncate_text(Some(value), max_length.unwrap_or(cfg.display.truncate_length))
        }
        FormatKind::Progress => {
            let balance = value.split_once('/').and_then(|(paid, total)| {
                Some(LoanBalance {
                    amount_paid: paid.trim().parse().ok()?,
                    total_amount: total.trim().parse().ok()?,
                })
            });
            format_percentage(Some(calculate_loan_progress(balance.as_ref())), 1)
        }
        FormatKind::Shorten => shorten_number(number),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(
    cfg: &AppConfig,
    loans_path: Option<PathBuf>,
    transactions_path: Option<PathBuf>,
) -> Result<()> {
    let loans_path = loans_path.unwrap_or_else(|| cfg.data.loans_path.clone());
    let transactions_path = transactions_path.unwrap_or_else(|| cfg.data.transactions_path.clone());

    println!("🖥️  Loading loan dashboard...\n");

    let loans = load_loans(&loans_path)?;
    let txs = if transactions_path.exists() {
        load_transactions(&transactions_path)?
    } else {
        tracing::warn!(path = %transactions_path.display(), "transactions file not found, showing loans only");
        Vec::new()
    };

    println!("✓ Loaded {} loans, {} transactions\n", loans.len(), txs.len());

    let mut app = ui::App::new(loans, txs, cfg.display.clone());
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(
    _cfg: &AppConfig,
    _loans_path: Option<PathBuf>,
    _transactions_path: Option<PathBuf>,
) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin loan-server --features server");
    std::process::exit(1);
}

// Loan Display - Web Server
// JSON API serving formatted loan view-models

use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use clap::Parser;
use loan_display::config::{self, AppConfig};
use loan_display::data::find_loan;
use loan_display::payment::{preset_amount, validate_payment_amount};
use loan_display::top_up::parse_top_up_amount;
use loan_display::transactions::{self, TransactionRow};
use loan_display::{
    load_loans, load_transactions, DisplayConfig, Loan, LoanCardView, LoanTransaction,
    PaymentSummary, PaymentType, PortfolioSummary, StatCard, TopUpSummary,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "LOAN_DISPLAY_CONFIG";

#[derive(Parser)]
#[command(name = "loan-server", version, about = "Loan display JSON API")]
struct Args {
    /// YAML config file (falls back to $LOAN_DISPLAY_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override server.listen
    #[arg(long)]
    listen: Option<String>,
}

/// Shared application state
#[derive(Clone)]
struct AppState {
    loans: Arc<Vec<Loan>>,
    transactions: Arc<Vec<LoanTransaction>>,
    display: Arc<DisplayConfig>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: (),
            error: Some(message.into()),
        }
    }
}

fn not_found(loan_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::fail(format!("Loan {} not found", loan_id))),
    )
        .into_response()
}

/// Summary response
#[derive(Serialize)]
struct SummaryResponse {
    totals: PortfolioSummary,
    cards: Vec<StatCard>,
}

#[derive(Debug, Deserialize)]
struct PaymentPreviewQuery {
    #[serde(rename = "type", default)]
    payment_type: PaymentType,
    amount: Option<f64>,
}

#[derive(Debug, Serialize)]
struct PaymentPreview {
    payment_type: PaymentType,
    summary: PaymentSummary,
    rows: Vec<(&'static str, String)>,
}

#[derive(Debug, Deserialize)]
struct TopUpPreviewQuery {
    #[serde(default)]
    amount: String,
}

// ============================================================================
// Previews (pure, so handlers stay thin)
// ============================================================================

fn payment_preview(loan: &Loan, query: &PaymentPreviewQuery, locale: &str) -> Result<PaymentPreview, String> {
    let requested = preset_amount(loan, query.payment_type).or(query.amount);
    let amount = validate_payment_amount(loan, requested).map_err(|e| e.to_string())?;

    let summary = PaymentSummary::compute(loan, amount);
    let rows = summary.rows(locale);

    Ok(PaymentPreview {
        payment_type: query.payment_type,
        summary,
        rows,
    })
}

fn top_up_preview(loan: &Loan, query: &TopUpPreviewQuery, locale: &str) -> Result<TopUpSummary, String> {
    let amount = parse_top_up_amount(&query.amount).map_err(|e| e.to_string())?;
    Ok(TopUpSummary::compute(loan, amount, locale))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/summary - Portfolio totals and stat cards
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    let totals = PortfolioSummary::from_loans(&state.loans);
    let cards = totals.stat_cards(&state.display.locale);

    Json(ApiResponse::ok(SummaryResponse { totals, cards }))
}

/// GET /api/loans - One card per loan
async fn get_loans(State(state): State<AppState>) -> impl IntoResponse {
    let cards: Vec<LoanCardView> = state
        .loans
        .iter()
        .map(|loan| LoanCardView::build(loan, &state.display))
        .collect();

    Json(ApiResponse::ok(cards))
}

/// GET /api/loans/:id - A single loan card
async fn get_loan(State(state): State<AppState>, Path(loan_id): Path<String>) -> Response {
    match find_loan(&state.loans, &loan_id) {
        Some(loan) => Json(ApiResponse::ok(LoanCardView::build(loan, &state.display))).into_response(),
        None => not_found(&loan_id),
    }
}

/// GET /api/loans/:id/transactions - Transactions table for a loan, newest first
async fn get_loan_transactions(
    State(state): State<AppState>,
    Path(loan_id): Path<String>,
) -> Response {
    if find_loan(&state.loans, &loan_id).is_none() {
        return not_found(&loan_id);
    }

    let selected: Vec<LoanTransaction> = transactions::for_loan(&state.transactions, &loan_id)
        .cloned()
        .collect();
    let rows: Vec<TransactionRow> = transactions::table_rows(&selected, &state.display.locale);

    Json(ApiResponse::ok(rows)).into_response()
}

/// GET /api/loans/:id/payment-preview?type=minimum|full|custom&amount=
async fn get_payment_preview(
    State(state): State<AppState>,
    Path(loan_id): Path<String>,
    Query(query): Query<PaymentPreviewQuery>,
) -> Response {
    let Some(loan) = find_loan(&state.loans, &loan_id) else {
        return not_found(&loan_id);
    };

    match payment_preview(loan, &query, &state.display.locale) {
        Ok(preview) => Json(ApiResponse::ok(preview)).into_response(),
        Err(message) => {
            tracing::debug!(loan = %loan_id, %message, "payment preview rejected");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::fail(message))).into_response()
        }
    }
}

/// GET /api/loans/:id/top-up-preview?amount=
async fn get_top_up_preview(
    State(state): State<AppState>,
    Path(loan_id): Path<String>,
    Query(query): Query<TopUpPreviewQuery>,
) -> Response {
    let Some(loan) = find_loan(&state.loans, &loan_id) else {
        return not_found(&loan_id);
    };

    match top_up_preview(loan, &query, &state.display.locale) {
        Ok(summary) => Json(ApiResponse::ok(summary)).into_response(),
        Err(message) => {
            tracing::debug!(loan = %loan_id, %message, "top-up preview rejected");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::fail(message))).into_response()
        }
    }
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/summary", get(get_summary))
        .route("/loans", get(get_loans))
        .route("/loans/:id", get(get_loan))
        .route("/loans/:id/transactions", get(get_loan_transactions))
        .route("/loans/:id/payment-preview", get(get_payment_preview))
        .route("/loans/:id/top-up-preview", get(get_top_up_preview))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let mut cfg = config::load_or_default(path.as_deref()).context("Failed to load config")?;
    if let Some(listen) = &args.listen {
        cfg.server.listen = listen.clone();
    }
    cfg.validate().context("Invalid config")?;
    Ok(cfg)
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = load_config(&args)?;

    let loans = load_loans(&cfg.data.loans_path)?;
    let txs = if cfg.data.transactions_path.exists() {
        load_transactions(&cfg.data.transactions_path)?
    } else {
        tracing::warn!(path = %cfg.data.transactions_path.display(), "transactions file not found");
        Vec::new()
    };
    tracing::info!(loans = loans.len(), transactions = txs.len(), locale = %cfg.display.locale, "data loaded");

    // Create shared state
    let state = AppState {
        loans: Arc::new(loans),
        transactions: Arc::new(txs),
        display: Arc::new(cfg.display.clone()),
    };

    let listener = tokio::net::TcpListener::bind(&cfg.server.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", cfg.server.listen))?;

    tracing::info!(addr = %cfg.server.listen, "loan-server listening");

    axum::serve(listener, router(state))
        .await
        .context("Server stopped")?;

    Ok(())
}

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use loan_display::payment::{preset_amount, PaymentSummary, PaymentType};
use loan_display::top_up::estimate_new_monthly_payment;
use loan_display::transactions::{self, TransactionRow, TransactionType};
use loan_display::{
    format_currency, shorten_number, truncate_text, DisplayConfig, Loan, LoanCardView,
    LoanTransaction, LocaleProfile, PortfolioSummary,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

/// Example top-up used for the estimate in the detail panel
const PREVIEW_TOP_UP: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Portfolio,
    Loans,
    Transactions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterType {
    None,
    ByLoan(String),
    Payments,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Portfolio => Page::Loans,
            Page::Loans => Page::Transactions,
            Page::Transactions => Page::Portfolio,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Portfolio => Page::Transactions,
            Page::Loans => Page::Portfolio,
            Page::Transactions => Page::Loans,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Portfolio => "Portfolio",
            Page::Loans => "Loans",
            Page::Transactions => "Transactions",
        }
    }
}

pub struct App {
    pub loans: Vec<Loan>,
    pub transactions: Vec<LoanTransaction>,
    pub rows: Vec<TransactionRow>,
    pub display: DisplayConfig,
    pub loan_state: TableState,
    pub tx_state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub filter: FilterType,
}

impl App {
    pub fn new(loans: Vec<Loan>, transactions: Vec<LoanTransaction>, display: DisplayConfig) -> Self {
        let mut loan_state = TableState::default();
        if !loans.is_empty() {
            loan_state.select(Some(0));
        }

        let mut app = Self {
            loans,
            transactions,
            rows: Vec::new(),
            display,
            loan_state,
            tx_state: TableState::default(),
            current_page: Page::Loans,
            show_detail: false,
            filter: FilterType::None,
        };
        app.apply_filter(FilterType::None);
        app
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_loan(&self) -> Option<&Loan> {
        self.loan_state.selected().and_then(|i| self.loans.get(i))
    }

    pub fn apply_filter(&mut self, filter: FilterType) {
        let selected: Vec<LoanTransaction> = match &filter {
            FilterType::None => self.transactions.clone(),
            FilterType::ByLoan(id) => transactions::for_loan(&self.transactions, id).cloned().collect(),
            FilterType::Payments => self
                .transactions
                .iter()
                .filter(|tx| tx.transaction_type == TransactionType::Payment)
                .cloned()
                .collect(),
        };

        self.rows = transactions::table_rows(&selected, &self.display.locale);
        self.filter = filter;

        // Reset selection to first row
        if self.rows.is_empty() {
            self.tx_state.select(None);
        } else {
            self.tx_state.select(Some(0));
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    fn active_len(&self) -> usize {
        match self.current_page {
            Page::Loans => self.loans.len(),
            Page::Transactions => self.rows.len(),
            Page::Portfolio => 0,
        }
    }

    fn active_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::Transactions => &mut self.tx_state,
            _ => &mut self.loan_state,
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = match state.selected() {
            Some(i) => (i as isize + delta).rem_euclid(len as isize) as usize,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.active_len();
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let i = state.selected().map_or(0, |i| (i + 20).min(len - 1));
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let state = self.active_state();
        let i = state.selected().map_or(0, |i| i.saturating_sub(20));
        state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "dashboard stopped");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('t') if app.current_page == Page::Loans => {
                    if let Some(id) = app.selected_loan().map(|l| l.id.clone()) {
                        app.apply_filter(FilterType::ByLoan(id));
                        app.current_page = Page::Transactions;
                    }
                }
                KeyCode::Char('p') => {
                    app.apply_filter(FilterType::Payments);
                    app.current_page = Page::Transactions;
                }
                KeyCode::Char('c') => app.apply_filter(FilterType::None),
                KeyCode::Down | KeyCode::Char('j') => app.move_by(1),
                KeyCode::Up | KeyCode::Char('k') => app.move_by(-1),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.active_state().select(Some(0)),
                KeyCode::End => {
                    let len = app.active_len();
                    if len > 0 {
                        app.active_state().select(Some(len - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::Loans {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_loans(f, content_chunks[0], app);
        render_loan_detail(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Portfolio => render_portfolio(f, chunks[1], app),
            Page::Loans => render_loans(f, chunks[1], app),
            Page::Transactions => render_transactions(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Portfolio, Page::Loans, Page::Transactions];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    let summary = PortfolioSummary::from_loans(&app.loans);
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Loans: {}", app.loans.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Active: {}", summary.active_loans),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Owed: {}", short_currency(summary.total_outstanding, &app.display.locale)),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

/// Compact amount with the locale's symbol placement ("$1.5K", "-$2M", "2M $")
fn short_currency(amount: f64, locale: &str) -> String {
    let profile = LocaleProfile::resolve(locale);
    profile.wrap_currency(amount < 0.0, &shorten_number(Some(amount.abs())))
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

/// Badge class → terminal color
fn tone_color(tone: &str) -> Color {
    match tone.trim_start_matches("bg-") {
        "success" => Color::Green,
        "warning" => Color::Yellow,
        "info" => Color::Cyan,
        "danger" => Color::Red,
        "primary" => Color::Blue,
        _ => Color::Gray,
    }
}

fn render_portfolio(f: &mut Frame, area: Rect, app: &App) {
    let summary = PortfolioSummary::from_loans(&app.loans);

    let mut content = vec![Line::from("")];
    for card in summary.stat_cards(&app.display.locale) {
        content.push(Line::from(vec![
            Span::styled(
                format!("  {:<22}", card.title),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(card.value, Style::default().fg(tone_color(card.tone))),
        ]));
        content.push(Line::from(""));
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Portfolio Summary "),
    );

    f.render_widget(paragraph, area);
}

fn render_loans(f: &mut Frame, area: Rect, app: &mut App) {
    let header = header_row(&["Loan", "Type", "Status", "Total", "Paid", "Remaining", "Progress"]);

    let rows: Vec<Row> = app
        .loans
        .iter()
        .map(|loan| {
            let card = LoanCardView::build(loan, &app.display);
            let color = tone_color(card.badge_class);

            Row::new(vec![
                Cell::from(card.id_label),
                Cell::from(truncate_text(Some(card.title.as_str()), 20)),
                Cell::from(card.status).style(Style::default().fg(color)),
                Cell::from(card.total_amount),
                Cell::from(card.amount_paid),
                Cell::from(card.remaining),
                Cell::from(card.progress_label),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(22),
            Constraint::Length(11),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Loans "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.loan_state);
}

fn render_transactions(f: &mut Frame, area: Rect, app: &mut App) {
    let header = header_row(&["Date", "Transaction ID", "Type", "Amount", "Status"]);

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|row| {
            let amount_style = if row.amount_class == "text-success" {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(row.date.clone()),
                Cell::from(truncate_text(Some(row.id.as_str()), 16)),
                Cell::from(row.transaction_type.clone())
                    .style(Style::default().fg(tone_color(row.type_style))),
                Cell::from(row.amount.clone()).style(amount_style),
                Cell::from(row.status.clone()).style(Style::default().fg(tone_color(row.status_style))),
            ])
            .height(1)
        })
        .collect();

    let title = match &app.filter {
        FilterType::None => " Transactions ".to_string(),
        FilterType::ByLoan(id) => format!(" Transactions - Loan #{} ", id),
        FilterType::Payments => " Transactions - Payments ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(22),
            Constraint::Length(14),
            Constraint::Length(16),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.tx_state);
}

fn render_loan_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Loan Details ");

    let Some(loan) = app.selected_loan() else {
        f.render_widget(Paragraph::new("No loan selected").block(block), area);
        return;
    };

    let locale = app.display.locale.as_str();
    let card = LoanCardView::build(loan, &app.display);
    let label = |text: &'static str| {
        Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    };
    let section = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![label("  Loan: "), Span::raw(format!("{} {}", card.title, card.id_label))]),
        Line::from(vec![
            label("  Status: "),
            Span::styled(card.status.clone(), Style::default().fg(tone_color(card.badge_class))),
        ]),
        Line::from(vec![label("  Total: "), Span::raw(card.total_amount.clone())]),
        Line::from(vec![label("  Paid: "), Span::raw(card.amount_paid.clone())]),
        Line::from(vec![label("  Remaining: "), Span::raw(card.remaining.clone())]),
        Line::from(vec![label("  Progress: "), Span::raw(card.progress_label.clone())]),
        Line::from(vec![label("  Monthly: "), Span::raw(card.monthly_payment.clone())]),
        Line::from(vec![label("  Rate: "), Span::raw(card.interest_rate.clone())]),
        Line::from(vec![label("  Start: "), Span::raw(card.start_date.clone())]),
        Line::from(vec![label("  Duration: "), Span::raw(card.duration.clone())]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
    ];

    if card.can_make_payment {
        content.push(section("  PAYMENT PREVIEW"));
        content.push(Line::from(""));
        let minimum = preset_amount(loan, PaymentType::Minimum).unwrap_or_default();
        for (name, value) in PaymentSummary::compute(loan, minimum).rows(locale) {
            content.push(Line::from(vec![Span::raw(format!("  {}: ", name)), Span::raw(value)]));
        }
        content.push(Line::from(""));

        content.push(section("  TOP-UP ESTIMATE"));
        content.push(Line::from(""));
        let estimate = estimate_new_monthly_payment(loan, Some(PREVIEW_TOP_UP));
        content.push(Line::from(format!(
            "  +{} → {} / month",
            format_currency(Some(PREVIEW_TOP_UP), locale),
            format_currency(Some(estimate), locale)
        )));
    } else {
        content.push(Line::from(Span::styled(
            "  Payments closed for this loan",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Press Enter to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = match app.current_page {
        Page::Transactions => app.tx_state.selected(),
        _ => app.loan_state.selected(),
    }
    .map(|i| i + 1)
    .unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.active_len()),
        Style::default().fg(Color::Cyan),
    )];

    if app.filter != FilterType::None {
        let filter_name = match &app.filter {
            FilterType::ByLoan(id) => format!("Loan #{}", id),
            FilterType::Payments => "Payments".to_string(),
            FilterType::None => String::new(),
        };
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", filter_name),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    for (key, what) in [
        ("Enter", " Details | "),
        ("t", " Loan txs | "),
        ("p", " Payments | "),
        ("Tab", " Page | "),
        ("↑/↓", " Nav | "),
    ] {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(what));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_display::{LoanStatus, TransactionStatus};

    fn loan(id: &str) -> Loan {
        Loan {
            id: id.to_string(),
            loan_type: "Personal Loan".to_string(),
            status: LoanStatus::Active,
            total_amount: 1_000.0,
            amount_paid: 250.0,
            monthly_payment: 100.0,
            interest_rate: 5.0,
            start_date: None,
            duration_months: Some(12),
            remaining_balance: None,
            term: None,
        }
    }

    fn tx(id: &str, loan_id: &str, kind: TransactionType) -> LoanTransaction {
        LoanTransaction {
            id: id.to_string(),
            loan_id: Some(loan_id.to_string()),
            date: "2024-01-05".to_string(),
            transaction_type: kind,
            amount: Some(100.0),
            status: TransactionStatus::Completed,
        }
    }

    fn app() -> App {
        App::new(
            vec![loan("L-1"), loan("L-2")],
            vec![
                tx("T-1", "L-1", TransactionType::Payment),
                tx("T-2", "L-2", TransactionType::Fee),
                tx("T-3", "L-2", TransactionType::Payment),
            ],
            DisplayConfig::default(),
        )
    }

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::Portfolio.next(), Page::Loans);
        assert_eq!(Page::Transactions.next(), Page::Portfolio);
        assert_eq!(Page::Portfolio.previous(), Page::Transactions);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        assert_eq!(app.selected_loan().unwrap().id, "L-1");
        app.move_by(1);
        assert_eq!(app.selected_loan().unwrap().id, "L-2");
        app.move_by(1);
        assert_eq!(app.selected_loan().unwrap().id, "L-1");
        app.move_by(-1);
        assert_eq!(app.selected_loan().unwrap().id, "L-2");
    }

    #[test]
    fn test_filters() {
        let mut app = app();
        assert_eq!(app.rows.len(), 3);

        app.apply_filter(FilterType::ByLoan("L-2".to_string()));
        assert_eq!(app.rows.len(), 2);

        app.apply_filter(FilterType::Payments);
        assert_eq!(app.rows.len(), 2);
        assert!(app.rows.iter().all(|r| r.transaction_type == "Payment"));

        app.apply_filter(FilterType::ByLoan("nope".to_string()));
        assert!(app.rows.is_empty());
        assert_eq!(app.tx_state.selected(), None);
    }

    #[test]
    fn test_short_currency_puts_sign_first() {
        assert_eq!(short_currency(1_500.0, "en-US"), "$1.5K");
        assert_eq!(short_currency(-2_000_000.0, "en-US"), "-$2M");
        assert_eq!(short_currency(2_000_000.0, "de-DE"), "2M\u{a0}$");
    }

    #[test]
    fn test_tone_color() {
        assert_eq!(tone_color("bg-success"), Color::Green);
        assert_eq!(tone_color("danger"), Color::Red);
        assert_eq!(tone_color("bg-secondary"), Color::Gray);
    }
}

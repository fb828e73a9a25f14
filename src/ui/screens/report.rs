use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::aggregate::Balance;
use crate::models::Transaction;
use crate::store::COLUMNS;
use crate::ui::app::{App, Focus, ReportView, NO_RECORDS};
use crate::ui::screens::{render_empty_state, titled_block};
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let (balance, transactions) = match &app.report {
        ReportView::Empty => {
            render_empty_state(f, area, "Financial Report", NO_RECORDS);
            return;
        }
        ReportView::Records {
            balance,
            transactions,
        } => (balance, transactions),
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Totals
            Constraint::Min(5),    // All records
        ])
        .split(area);

    render_totals(f, chunks[0], balance);
    render_records(f, chunks[1], app, transactions);
}

fn render_totals(f: &mut Frame, area: Rect, balance: &Balance) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let net_color = if balance.net >= Decimal::ZERO {
        theme::GREEN
    } else {
        theme::RED
    };
    render_card(f, cards[0], "Balance", balance.net, net_color);
    render_card(f, cards[1], "Total Income", balance.total_income, theme::GREEN);
    render_card(f, cards[2], "Total Expenses", balance.total_expense, theme::RED);
}

fn render_card(f: &mut Frame, area: Rect, title: &str, amount: Decimal, color: Color) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .centered()
    .block(titled_block(title, false));

    f.render_widget(text, area);
}

fn render_records(f: &mut Frame, area: Rect, app: &App, transactions: &[Transaction]) {
    let header_cells = COLUMNS
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let focused = app.focus == Focus::Content;

    let rows: Vec<Row> = transactions
        .iter()
        .enumerate()
        .skip(app.report_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let amount_style = if txn.is_expense() {
                theme::expense_style()
            } else {
                theme::income_style()
            };

            let style = if focused && i == app.report_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(txn.date.to_string()),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(Span::styled(format_amount(txn.amount), amount_style)),
                Cell::from(txn.kind.as_str()),
                Cell::from(truncate(&txn.category, 20)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(20),
    ];

    let title = format!("All Records ({})", transactions.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(titled_block(&title, focused));

    f.render_widget(table, area);
}

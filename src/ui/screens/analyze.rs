use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Bar, BarChart, BarGroup, Paragraph,
    },
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate::Analysis;
use crate::ui::app::{
    AnalyzeView, App, Focus, RangeField, NO_RECORDS_FOR_ANALYSIS, NO_RECORDS_IN_RANGE, NO_SERIES,
};
use crate::ui::screens::{render_empty_state, titled_block};
use crate::ui::theme;
use crate::ui::util::{cents, format_amount, format_percent};

const BAR_WIDTH: u16 = 5;
const GROUP_GAP: u16 = 2;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Range inputs
            Constraint::Min(8),    // Charts
        ])
        .split(area);

    render_range_inputs(f, chunks[0], app);

    let title = "Data Analysis";
    match &app.analyze.view {
        AnalyzeView::NoRecords => render_empty_state(f, chunks[1], title, NO_RECORDS_FOR_ANALYSIS),
        AnalyzeView::NoneInRange => render_empty_state(f, chunks[1], title, NO_RECORDS_IN_RANGE),
        AnalyzeView::NoSeries => render_empty_state(f, chunks[1], title, NO_SERIES),
        AnalyzeView::Charts(analysis) => {
            let charts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);
            render_bar_chart(f, charts[0], analysis);
            render_pie(f, charts[1], analysis);
        }
    }
}

fn render_range_inputs(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Min(10),
        ])
        .split(area);

    let focused = app.focus == Focus::Content;
    let inputs = [
        (RangeField::Start, "Start Date", &app.analyze.start, cols[0]),
        (RangeField::End, "End Date", &app.analyze.end, cols[1]),
    ];
    for (field, label, value, rect) in inputs {
        let editing = focused && app.analyze.field == field;
        f.render_widget(
            Paragraph::new(Span::styled(value.clone(), theme::normal_style()))
                .block(titled_block(label, editing)),
            rect,
        );
        if editing {
            let x = (rect.x + 1 + value.chars().count() as u16).min(rect.right().saturating_sub(2));
            f.set_cursor_position((x, rect.y + 1));
        }
    }

    let hint = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Tab", Style::default().fg(theme::ACCENT)),
            Span::styled(" switch date  ", theme::dim_style()),
            Span::styled("Enter", Style::default().fg(theme::ACCENT)),
            Span::styled(" apply range  ", theme::dim_style()),
            Span::styled("Esc", Style::default().fg(theme::ACCENT)),
            Span::styled(" menu", theme::dim_style()),
        ]),
    ]);
    f.render_widget(hint, cols[2]);
}

fn render_bar_chart(f: &mut Frame, area: Rect, analysis: &Analysis) {
    let grouped = analysis.grouped();
    let group_width = BAR_WIDTH * 2 + GROUP_GAP;
    let capacity = (area.width.saturating_sub(2) / group_width).max(1) as usize;
    let shown = &grouped[grouped.len().saturating_sub(capacity)..];

    let title = if shown.len() < grouped.len() {
        format!(
            "Income vs Expenses (last {} of {} dates)",
            shown.len(),
            grouped.len()
        )
    } else {
        "Income vs Expenses".to_string()
    };

    let mut chart = BarChart::default()
        .block(titled_block(&title, false))
        .bar_width(BAR_WIDTH)
        .bar_gap(0)
        .group_gap(GROUP_GAP)
        .label_style(theme::dim_style())
        .value_style(
            Style::default()
                .fg(theme::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        );

    for (date, income, expense) in shown {
        let bars = [
            Bar::default()
                .value(cents(*income))
                .text_value(compact_amount(*income))
                .style(theme::income_style()),
            Bar::default()
                .value(cents(*expense))
                .text_value(compact_amount(*expense))
                .style(theme::expense_style()),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(date.format("%m-%d").to_string()))
                .bars(&bars),
        );
    }

    f.render_widget(chart, area);
}

fn render_pie(f: &mut Frame, area: Rect, analysis: &Analysis) {
    let block = titled_block("Share of Total", false);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some((income_share, expense_share)) = analysis.shares() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    let fraction = (income_share / Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0);
    let (income_pts, expense_pts) = pie_points(fraction, 80);

    // Braille dots are roughly square, so widen whichever axis is longer on screen
    let aspect = f64::from(rows[0].width.max(1)) / (2.0 * f64::from(rows[0].height.max(1)));
    let (x_bounds, y_bounds) = if aspect >= 1.0 {
        ([-1.05 * aspect, 1.05 * aspect], [-1.05, 1.05])
    } else {
        ([-1.05, 1.05], [-1.05 / aspect, 1.05 / aspect])
    };

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &income_pts,
                color: theme::GREEN,
            });
            ctx.draw(&Points {
                coords: &expense_pts,
                color: theme::RED,
            });
        });
    f.render_widget(canvas, rows[0]);

    let legend = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("■ ", theme::income_style()),
            Span::styled(
                format!(
                    "Total Income {} ({})",
                    format_percent(income_share),
                    format_amount(analysis.total_income())
                ),
                theme::normal_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled("■ ", theme::expense_style()),
            Span::styled(
                format!(
                    "Total Expenses {} ({})",
                    format_percent(expense_share),
                    format_amount(analysis.total_expense())
                ),
                theme::normal_style(),
            ),
        ]),
    ]);
    f.render_widget(legend, rows[1]);
}

/// Sample a unit disc on a `steps` x `steps` grid and split it into the
/// income wedge (clockwise from 12 o'clock, covering `income_fraction` of the
/// turn) and the expense remainder.
pub(crate) fn pie_points(income_fraction: f64, steps: usize) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut income = Vec::new();
    let mut expense = Vec::new();
    if steps < 2 {
        return (income, expense);
    }
    let step = 2.0 / (steps - 1) as f64;
    for i in 0..steps {
        for j in 0..steps {
            let x = -1.0 + i as f64 * step;
            let y = -1.0 + j as f64 * step;
            if x * x + y * y > 1.0 {
                continue;
            }
            let mut angle = x.atan2(y);
            if angle < 0.0 {
                angle += std::f64::consts::TAU;
            }
            if angle / std::f64::consts::TAU < income_fraction {
                income.push((x, y));
            } else {
                expense.push((x, y));
            }
        }
    }
    (income, expense)
}

/// Short label that fits on a bar, e.g. `950`, `1.2k`, `3.4M`.
pub(crate) fn compact_amount(val: Decimal) -> String {
    let v = val.abs().to_f64().unwrap_or(0.0);
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else if v == 0.0 {
        String::new()
    } else {
        format!("{v:.0}")
    }
}

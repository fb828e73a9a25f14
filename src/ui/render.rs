use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::app::{App, Focus, Mode};
use super::screens;
use super::theme;

const MENU_WIDTH: u16 = 20;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(5),    // Menu + content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Notice bar
        ])
        .split(f.area());

    render_title_bar(f, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(MENU_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);
    render_menu(f, body[0], app);
    render_screen(f, body[1], app);

    render_status_bar(f, chunks[2], app);
    render_notice_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_title_bar(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " Income and Expense Tracker",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(title, area);
}

fn render_menu(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = Mode::all()
        .iter()
        .enumerate()
        .map(|(i, mode)| {
            let style = if app.focus == Focus::Menu && i == app.menu_index {
                theme::selected_style()
            } else if *mode == app.mode {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {}:", i + 1), theme::dim_style()),
                Span::styled(format!("{mode}"), style),
            ]))
        })
        .collect();

    let menu = List::new(items).block(screens::titled_block(
        "Select an option",
        app.focus == Focus::Menu,
    ));
    f.render_widget(menu, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.mode {
        Mode::AddIncome | Mode::AddExpense => screens::entry::render(f, area, app),
        Mode::ViewReport => screens::report::render(f, area, app),
        Mode::Analyze => screens::analyze::render(f, area, app),
        Mode::Exit => screens::exit::render(f, area),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (label, label_bg) = match app.focus {
        Focus::Menu => (" MENU ", theme::ACCENT),
        Focus::Content => (" INPUT ", theme::GREEN),
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(label_bg)
        .add_modifier(Modifier::BOLD);

    let info = format!(" {} | {}", app.mode, app.table_path);

    let right = match (app.focus, app.mode) {
        (Focus::Menu, _) => " 1-5 select | Enter open | ? help | Ctrl-q quit ",
        (Focus::Content, Mode::ViewReport) => " j/k scroll | r reload | Esc menu ",
        (Focus::Content, Mode::Exit) => " any key to close ",
        (Focus::Content, _) => " Tab field | Enter submit | Esc menu ",
    };

    let available = area.width as usize;
    let used = label.len() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(label, mode_style),
        Span::styled(info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_notice_bar(f: &mut Frame, area: Rect, app: &App) {
    let content = match &app.notice {
        Some(notice) => Line::from(Span::styled(
            format!(" {}", notice.text),
            theme::notice_style(notice.severity),
        )),
        None => Line::from(Span::styled(
            " Pick an option from the menu, ? for help",
            theme::dim_style(),
        )),
    };
    let bar = Paragraph::new(content).style(theme::notice_bar_style());
    f.render_widget(bar, area);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let row = |text: &'static str| Line::from(Span::styled(text, theme::normal_style()));

    let help_text = vec![
        Line::from(Span::styled(
            " Tally Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Menu"),
        row("  1-5              Open option        j/k or Up/Down  Move"),
        row("  Enter / l        Open highlighted   Tab             Focus content"),
        row("  Ctrl-q / Ctrl-c  Quit               ?               This help"),
        Line::from(""),
        section(" Add Income / Add Expense"),
        row("  Tab / Down       Next field         Shift-Tab / Up  Previous field"),
        row("  Enter            Next / submit      Ctrl-s          Submit"),
        row("  Ctrl-u           Clear field        Esc             Back to menu"),
        Line::from(""),
        section(" View Report"),
        row("  j/k              Scroll             g/G             Top/Bottom"),
        row("  r                Reload             Esc             Back to menu"),
        Line::from(""),
        section(" Analyze"),
        row("  Tab              Start/End date     Enter           Apply range"),
        row("  Esc              Back to menu"),
        Line::from(""),
        Line::from(Span::styled(
            " Press any key to close ",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

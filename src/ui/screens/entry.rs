use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::app::{App, Focus};
use crate::ui::form::FormField;
use crate::ui::screens::titled_block;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let outer = titled_block(&app.mode.to_string(), app.focus == Focus::Content);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = FormField::all()
        .iter()
        .map(|_| Constraint::Length(3))
        .collect();
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in FormField::all().iter().enumerate() {
        render_input(f, rows[i], app, *field);
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled(" Tab", Style::default().fg(theme::ACCENT)),
        Span::styled(" next field  ", theme::dim_style()),
        Span::styled("Enter", Style::default().fg(theme::ACCENT)),
        Span::styled(format!(" add {}  ", kind_label(app)), theme::dim_style()),
        Span::styled("Ctrl-u", Style::default().fg(theme::ACCENT)),
        Span::styled(" clear field  ", theme::dim_style()),
        Span::styled("Esc", Style::default().fg(theme::ACCENT)),
        Span::styled(" menu", theme::dim_style()),
    ]));
    f.render_widget(hint, rows[FormField::all().len()]);
}

fn kind_label(app: &App) -> &'static str {
    app.mode.kind().map(|k| k.as_str()).unwrap_or("entry")
}

fn render_input(f: &mut Frame, area: Rect, app: &App, field: FormField) {
    let editing = app.focus == Focus::Content && app.form.field == field;
    let value = app.form.value(field);

    let label = match field {
        FormField::Date => "Date (YYYY-MM-DD)",
        FormField::Amount => "Amount (>= 0.00)",
        other => other.label(),
    };
    let style = if editing {
        Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
    } else {
        theme::normal_style()
    };

    let input = Paragraph::new(Span::styled(value.to_string(), style))
        .block(titled_block(label, editing));
    f.render_widget(input, area);

    if editing {
        let offset = value.chars().count() as u16;
        let x = (area.x + 1 + offset).min(area.right().saturating_sub(2));
        f.set_cursor_position((x, area.y + 1));
    }
}

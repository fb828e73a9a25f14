pub(crate) mod analyze;
pub(crate) mod entry;
pub(crate) mod exit;
pub(crate) mod report;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

pub(crate) fn titled_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused))
        .title(Span::styled(format!(" {title} "), theme::title_style()))
}

/// Centered dim message in a bordered box, used for every empty state.
pub(crate) fn render_empty_state(f: &mut Frame, area: Rect, title: &str, msg: &str) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(msg.to_string(), theme::dim_style())),
    ];
    f.render_widget(
        Paragraph::new(text).centered().block(titled_block(title, false)),
        area,
    );
}

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::app::FAREWELL;
use crate::ui::screens::titled_block;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            FAREWELL,
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", theme::dim_style())),
    ];
    f.render_widget(
        Paragraph::new(text).centered().block(titled_block("Exit", false)),
        area,
    );
}

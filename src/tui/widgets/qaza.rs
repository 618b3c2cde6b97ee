use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::QazaSet;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, qaza: &QazaSet, focused_idx: usize, focused: bool) {
    let block = Block::default()
        .title(Span::styled(" Qaza ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    let total = qaza.total();
    let mut content = vec![Line::from("")];
    if total == 0 {
        content.push(Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled("0 prayers owed  ✓", theme::green()),
        ]));
    } else {
        content.push(Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(
                format!("{} owed from {}", total, qaza.source_date.as_deref().unwrap_or("yesterday")),
                theme::amber().add_modifier(Modifier::BOLD),
            ),
        ]));
        content.push(Line::from(""));
        for (i, name) in qaza.outstanding().enumerate() {
            let style = if focused && i == focused_idx {
                theme::gold().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };
            content.push(Line::from(vec![
                Span::styled("  ○ ", theme::amber()),
                Span::styled(name.display_name(), style),
            ]));
        }
    }

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, date: NaiveDate, hijri_str: &str, name: &str) {
    let gregorian_str = date.format("%A, %b %d, %Y").to_string();

    let mut title = vec![
        Span::styled("  مُحاسَبة  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("muhasaba", theme::gold()),
    ];
    if !name.is_empty() {
        title.push(Span::styled(format!("  ·  {}", name), theme::dim()));
    }

    let mut date_spans = Vec::new();
    if !hijri_str.is_empty() {
        date_spans.push(Span::styled(hijri_str, theme::amber()));
        date_spans.push(Span::styled("  ·  ", theme::dim()));
    }
    date_spans.push(Span::styled(gregorian_str, theme::dim()));

    let text = vec![Line::from(title), Line::from(""), Line::from(date_spans)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

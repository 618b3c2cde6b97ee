use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::models::DailyPrayers;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, prayers: &DailyPrayers, focused_idx: usize, focused: bool) {
    let stats = prayers.stats();
    let block = Block::default()
        .title(Span::styled(
            format!(" Prayers {}/5 ", stats.total_prayed),
            theme::gold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    let items: Vec<ListItem> = prayers
        .iter()
        .enumerate()
        .map(|(i, (name, slot))| {
            let is_focused = focused && i == focused_idx;

            let (icon, status_style, label) = match (slot.prayed, slot.jamat) {
                (true, true) => ("●", theme::green().add_modifier(Modifier::BOLD), "jamat"),
                (true, false) => ("●", theme::green(), "prayed"),
                _ => ("○", theme::dim(), ""),
            };

            let name_style = if is_focused {
                theme::gold().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            let line = Line::from(vec![
                Span::styled(format!("  {:<9}", name.display_name()), name_style),
                Span::styled(icon, status_style),
                Span::styled(format!("  {}", label), theme::dim()),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::engine::TaskRollover;
use crate::models::{TaskBucket, TaskSection};
use crate::tui::theme;
use crate::utils::format::{check, truncate};

/// Every task row in display order: today's tasks, then missed ones.
pub fn items(tasks: &TaskRollover) -> Vec<(TaskBucket, i64)> {
    tasks
        .today
        .iter()
        .map(|(_, t)| (TaskBucket::Today, t.id))
        .chain(tasks.missed.iter().map(|(_, t)| (TaskBucket::Missed, t.id)))
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, tasks: &TaskRollover, focused_idx: usize, focused: bool) {
    let block = Block::default()
        .title(Span::styled(" Tasks ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    let width = area.width.saturating_sub(12) as usize;
    let mut lines = Vec::new();
    let mut idx = 0;
    for (title, lists, title_style) in [
        ("Today", &tasks.today, theme::bold()),
        ("Missed", &tasks.missed, theme::amber()),
    ] {
        if title == "Missed" && lists.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(format!("  {}", title), title_style)));
        if lists.is_empty() {
            lines.push(Line::from(Span::styled("    nothing yet, [a] to add", theme::dim())));
        }
        for (section, task) in lists.iter() {
            let marker = match section {
                TaskSection::MustDo => "!",
                TaskSection::GoodToDo => "·",
            };
            let text_style = if focused && idx == focused_idx {
                theme::gold().add_modifier(Modifier::BOLD)
            } else if task.completed {
                theme::dim().add_modifier(Modifier::CROSSED_OUT)
            } else {
                theme::text()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("    {} ", check(task.completed)), theme::green()),
                Span::styled(format!("{} ", marker), theme::amber()),
                Span::styled(truncate(&task.text, width), text_style),
            ]));
            idx += 1;
        }
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{DailyGrowth, GrowthCategory, GrowthScores};
use crate::tui::theme;
use crate::utils::format::{check, progress_bar};

/// Every checklist row in display order: iman items, then the role's life items.
pub fn items(growth: &DailyGrowth) -> Vec<(GrowthCategory, &'static str)> {
    crate::models::IMAN_KEYS
        .iter()
        .map(|k| (GrowthCategory::Iman, *k))
        .chain(growth.user_type.life_keys().iter().map(|k| (GrowthCategory::Life, *k)))
        .collect()
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    growth: &DailyGrowth,
    scores: &GrowthScores,
    focused_idx: usize,
    focused: bool,
) {
    let block = Block::default()
        .title(Span::styled(
            format!(" Growth · {} · {}% ", growth.user_type.display_name(), scores.overall_score),
            theme::gold(),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(focused))
        .style(theme::surface());

    let mut lines = Vec::new();
    let mut last_category = None;
    for (i, (category, key)) in items(growth).into_iter().enumerate() {
        if last_category != Some(category) {
            let (title, score) = match category {
                GrowthCategory::Iman => ("Iman", scores.iman_score),
                GrowthCategory::Life => ("Life", scores.life_score),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<6}", title), theme::bold()),
                Span::styled(progress_bar(score, 10), theme::score(score)),
                Span::styled(format!(" {:>3}%", score), theme::dim()),
            ]));
            last_category = Some(category);
        }

        let done = growth.data.is_checked(category, key);
        let key_style = if focused && i == focused_idx {
            theme::gold().add_modifier(Modifier::BOLD)
        } else if done {
            theme::text()
        } else {
            theme::dim()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("    {} ", check(done)), if done { theme::green() } else { theme::dim() }),
            Span::styled(key, key_style),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

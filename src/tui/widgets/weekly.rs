use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::report::WeeklyReport;
use crate::tui::theme;
use crate::utils::format::progress_bar;

const DAY_LETTERS: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

pub fn render(frame: &mut Frame, area: Rect, week: Option<&WeeklyReport>) {
    let block = Block::default()
        .title(Span::styled(" This Week ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let Some(week) = week else {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  No records yet", theme::dim())),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let mut letters = vec![Span::styled("  ", theme::dim())];
    let mut dots = vec![Span::styled("  ", theme::dim())];
    let start = week.start.as_str();
    for (i, letter) in DAY_LETTERS.iter().enumerate() {
        letters.push(Span::styled(format!("{}  ", letter), theme::dim()));
        let prayed = week
            .prayers
            .iter()
            .find(|p| day_index(start, &p.date) == Some(i))
            .map(|p| p.prayed);
        let (dot, style) = match prayed {
            Some(5) => ("●", theme::green().add_modifier(Modifier::BOLD)),
            Some(3) | Some(4) => ("●", theme::amber()),
            Some(1) | Some(2) => ("◑", theme::amber()),
            Some(_) => ("○", theme::dim()),
            None => ("·", theme::dim()),
        };
        dots.push(Span::styled(format!("{}  ", dot), style));
    }

    let growth_line = Line::from(vec![
        Span::styled("  Growth ", theme::dim()),
        Span::styled(progress_bar(week.averages.overall, 10), theme::score(week.averages.overall)),
        Span::styled(format!(" {}%", week.averages.overall), theme::dim()),
    ]);

    let meta_line = Line::from(Span::styled(
        format!(
            "  Prayed {}  ·  Jamat {}  ·  Tracked {}/7",
            week.totals.total, week.totals.jamat, week.tracked_days
        ),
        theme::dim(),
    ));

    let text = vec![
        Line::from(""),
        Line::from(letters),
        Line::from(dots),
        Line::from(""),
        growth_line,
        meta_line,
    ];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}

/// Position of `date` within the week starting at `start`, both `YYYY-MM-DD`.
fn day_index(start: &str, date: &str) -> Option<usize> {
    let start = crate::utils::dates::parse_date_key(start).ok()?;
    let date = crate::utils::dates::parse_date_key(date).ok()?;
    usize::try_from((date - start).num_days()).ok().filter(|i| *i < 7)
}

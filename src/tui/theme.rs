use ratatui::style::{Color, Modifier, Style};

// Night palette: deep teal ground, parchment text, gold accents.
const NIGHT: Color = Color::Rgb(12, 20, 24);
const PANEL: Color = Color::Rgb(19, 30, 35);
const RULE: Color = Color::Rgb(44, 62, 66);
const PARCHMENT: Color = Color::Rgb(226, 220, 200);
const FADED: Color = Color::Rgb(118, 132, 128);
const GOLD: Color = Color::Rgb(212, 175, 85);
const OLIVE: Color = Color::Rgb(110, 160, 100);
const SAFFRON: Color = Color::Rgb(222, 150, 64);
const CLAY: Color = Color::Rgb(190, 90, 70);

pub fn base() -> Style {
    Style::default().fg(PARCHMENT).bg(NIGHT)
}

pub fn surface() -> Style {
    Style::default().fg(PARCHMENT).bg(PANEL)
}

pub fn text() -> Style {
    Style::default().fg(PARCHMENT)
}

pub fn bold() -> Style {
    text().add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().fg(FADED)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(OLIVE)
}

pub fn amber() -> Style {
    Style::default().fg(SAFFRON)
}

pub fn red() -> Style {
    Style::default().fg(CLAY)
}

/// Panel border, highlighted when the panel has focus.
pub fn border(focused: bool) -> Style {
    Style::default().fg(if focused { GOLD } else { RULE })
}

/// Colour for a 0..=100 score: green from 80, amber from 50.
pub fn score(percent: u8) -> Style {
    match percent {
        80.. => green(),
        50..=79 => amber(),
        _ => dim(),
    }
}

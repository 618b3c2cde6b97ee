use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::repository::SettingsRepo;
use crate::db::DocumentStore;
use crate::engine::{growth_scores, Clock, DayWatcher, SystemClock};
use crate::models::{PrayerField, PrayerName, TaskBucket, TaskSection, UserType};
use crate::report::{weekly_report, WeeklyReport};
use crate::session::DaySession;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{growth, header, prayers, qaza, statusbar, tasks, weekly};
use crate::utils::format::progress_bar;
use crate::utils::hijri::hijri_string;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Week,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusSection {
    Prayers,
    Qaza,
    Growth,
    Tasks,
}

impl FocusSection {
    fn next(self) -> Self {
        match self {
            FocusSection::Prayers => FocusSection::Qaza,
            FocusSection::Qaza => FocusSection::Growth,
            FocusSection::Growth => FocusSection::Tasks,
            FocusSection::Tasks => FocusSection::Prayers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    NewTask(TaskSection),
}

pub struct App<C: Clock> {
    pub view: View,
    pub config: AppConfig,
    pub focus_section: FocusSection,
    pub focus_idx: usize,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    pub message: Option<String>,

    pub session: DaySession,
    pub watcher: DayWatcher<C>,
    pub name: String,
    pub hijri_str: String,
    pub week: Option<WeeklyReport>,
}

impl<C: Clock> App<C> {
    pub fn new(store: &dyn DocumentStore, config: AppConfig, clock: C) -> Self {
        let watcher = DayWatcher::new(clock);
        let session = DaySession::load(store, &config.user.id, watcher.today());
        let name = match SettingsRepo::load_or_init(store, &config.user.id, config.initial_profile()) {
            Ok(settings) => settings.profile.name,
            Err(e) => {
                log::warn!("Could not load settings: {}", e);
                config.user.name.clone()
            }
        };

        let mut app = App {
            view: View::Dashboard,
            config,
            focus_section: FocusSection::Prayers,
            focus_idx: 0,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            message: None,
            session,
            watcher,
            name,
            hijri_str: String::new(),
            week: None,
        };
        app.refresh(store);
        app
    }

    /// Recomputes what is derived from the session rather than stored in it.
    fn refresh(&mut self, store: &dyn DocumentStore) {
        self.hijri_str = hijri_string(self.session.date, self.config.dashboard.hijri_offset).unwrap_or_default();
        self.week = match weekly_report(store, &self.session.user_id, self.session.date) {
            Ok(week) => Some(week),
            Err(e) => {
                log::warn!("Could not build weekly summary: {}", e);
                None
            }
        };
    }

    pub fn tick(&mut self, store: &dyn DocumentStore) {
        if self.watcher.on_tick() {
            self.roll_over(store);
        } else if self.session.unreadable.any() {
            self.session.reload(store);
            if !self.session.unreadable.any() {
                self.refresh(store);
                self.message = Some("Storage is reachable again".to_string());
            }
        }
    }

    pub fn focus_gained(&mut self, store: &dyn DocumentStore) {
        if self.watcher.on_focus_regain() {
            self.roll_over(store);
        }
    }

    fn roll_over(&mut self, store: &dyn DocumentStore) {
        if self.session.reload_if_new_day(store, &self.watcher) {
            self.focus_idx = 0;
            self.refresh(store);
            self.message = Some(format!("New day: {}", self.session.today));
        }
    }

    fn section_len(&self) -> usize {
        match self.focus_section {
            FocusSection::Prayers => PrayerName::all().len(),
            FocusSection::Qaza => self.session.qaza.total(),
            FocusSection::Growth => growth::items(&self.session.growth).len(),
            FocusSection::Tasks => tasks::items(&self.session.tasks).len(),
        }
    }

    fn clamp_focus(&mut self) {
        self.focus_idx = self.focus_idx.min(self.section_len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent, store: &dyn DocumentStore) {
        // Ignore release/repeat events some terminals send
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::NewTask(section) => self.handle_task_input(key, section, store),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, store),
                View::Week => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('w')) {
                        self.view = View::Dashboard;
                    }
                }
                View::Help => {
                    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                        self.view = View::Dashboard;
                    }
                }
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, store: &dyn DocumentStore) {
        self.message = None;
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('w') => {
                self.refresh(store);
                self.view = View::Week;
            }
            KeyCode::Up => {
                self.focus_idx = self.focus_idx.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < self.section_len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Tab => {
                self.focus_section = self.focus_section.next();
                self.focus_idx = 0;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.activate_focused(store);
            }
            KeyCode::Char('j') => {
                if self.focus_section == FocusSection::Prayers {
                    if let Some(name) = PrayerName::all().get(self.focus_idx) {
                        self.session.toggle_prayer(store, *name, PrayerField::Jamat);
                        self.refresh(store);
                    }
                }
            }
            KeyCode::Char('a') => self.start_task_input(TaskSection::MustDo),
            KeyCode::Char('A') => self.start_task_input(TaskSection::GoodToDo),
            KeyCode::Char('x') => {
                if let Some((bucket, id)) = self.focused_task() {
                    if let Err(e) = self.session.delete_task(store, bucket, id) {
                        self.message = Some(e.to_string());
                    }
                    self.clamp_focus();
                }
            }
            KeyCode::Char('t') => {
                if let Some((TaskBucket::Missed, id)) = self.focused_task() {
                    if let Err(e) = self.session.move_task_to_today(store, id) {
                        self.message = Some(e.to_string());
                    }
                }
            }
            KeyCode::Char('u') => {
                let types = UserType::all();
                let pos = types.iter().position(|t| *t == self.session.growth.user_type).unwrap_or(0);
                let next = types[(pos + 1) % types.len()];
                self.session.set_user_type(store, next);
                self.message = Some(format!("Life checklist: {}", next.display_name()));
                self.clamp_focus();
            }
            _ => {}
        }
    }

    fn focused_task(&self) -> Option<(TaskBucket, i64)> {
        if self.focus_section != FocusSection::Tasks {
            return None;
        }
        tasks::items(&self.session.tasks).get(self.focus_idx).copied()
    }

    fn activate_focused(&mut self, store: &dyn DocumentStore) {
        match self.focus_section {
            FocusSection::Prayers => {
                if let Some(name) = PrayerName::all().get(self.focus_idx) {
                    self.session.toggle_prayer(store, *name, PrayerField::Prayed);
                    self.refresh(store);
                }
            }
            FocusSection::Qaza => {
                let owed: Vec<PrayerName> = self.session.qaza.outstanding().collect();
                if let Some(name) = owed.get(self.focus_idx) {
                    self.session.pray_qaza(store, *name);
                    self.clamp_focus();
                }
            }
            FocusSection::Growth => {
                if let Some((category, key)) = growth::items(&self.session.growth).get(self.focus_idx).copied() {
                    if let Err(e) = self.session.toggle_growth(store, category, key) {
                        self.message = Some(e.to_string());
                    }
                    self.refresh(store);
                }
            }
            FocusSection::Tasks => {
                if let Some((bucket, id)) = self.focused_task() {
                    if let Err(e) = self.session.toggle_task(store, bucket, id) {
                        self.message = Some(e.to_string());
                    }
                }
            }
        }
    }

    fn start_task_input(&mut self, section: TaskSection) {
        self.input_mode = InputMode::NewTask(section);
        self.input_buffer.clear();
        self.input_error = None;
    }

    fn handle_task_input(&mut self, key: KeyEvent, section: TaskSection, store: &dyn DocumentStore) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => match self.session.add_task(store, section, &self.input_buffer) {
                Ok(_) => {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                    self.input_error = None;
                }
                Err(_) => {
                    self.input_error = Some("Type something first".to_string());
                }
            },
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Week => self.draw_week(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }

        if let InputMode::NewTask(section) = self.input_mode {
            self.draw_task_input(frame, section);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], self.session.date, &self.hijri_str, &self.name);
        statusbar::render(frame, outer_chunks[2], self.message.as_deref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer_chunks[1]);

        // Left column: prayers, qaza, week
        let qaza_height = if self.session.qaza.total() == 0 { 4 } else { 5 + self.session.qaza.total() as u16 };
        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(qaza_height),
                Constraint::Min(0),
            ])
            .split(columns[0]);

        let focus = |s: FocusSection| self.focus_section == s;
        prayers::render(frame, left_chunks[0], &self.session.prayers, self.focus_idx, focus(FocusSection::Prayers));
        qaza::render(frame, left_chunks[1], &self.session.qaza, self.focus_idx, focus(FocusSection::Qaza));
        weekly::render(frame, left_chunks[2], self.week.as_ref());

        // Right column: growth, tasks
        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(14), Constraint::Min(0)])
            .split(columns[1]);

        let scores = growth_scores(&self.session.growth);
        growth::render(
            frame,
            right_chunks[0],
            &self.session.growth,
            &scores,
            self.focus_idx,
            focus(FocusSection::Growth),
        );
        tasks::render(frame, right_chunks[1], &self.session.tasks, self.focus_idx, focus(FocusSection::Tasks));
    }

    fn draw_week(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  This Week  ", theme::gold().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let Some(week) = &self.week else {
            frame.render_widget(Paragraph::new(Span::styled("  No records yet", theme::dim())), chunks[1]);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(format!("  {} to {}", week.start, week.end), theme::dim())),
            Line::from(""),
            Line::from(Span::styled("  Prayers", theme::gold())),
        ];
        for p in &week.prayers {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}  ", progress_bar(p.percentage, 12)), theme::score(p.percentage)),
                Span::styled(format!("{}  {}/5  jamat {}", p.date, p.prayed, p.jamat), theme::dim()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Growth", theme::gold())));
        for g in &week.growth {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}  ", progress_bar(g.scores.overall_score, 12)),
                    theme::score(g.scores.overall_score),
                ),
                Span::styled(
                    format!(
                        "{}  iman {}%  life {}%",
                        g.date, g.scores.iman_score, g.scores.life_score
                    ),
                    theme::dim(),
                ),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Tracked days:  ", theme::dim()),
            Span::styled(format!("{}/7", week.tracked_days), theme::bold()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Prayers:       ", theme::dim()),
            Span::styled(
                format!(
                    "{} prayed, {} jamat, {} missed",
                    week.totals.total, week.totals.jamat, week.totals.missed
                ),
                theme::bold(),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Growth:        ", theme::dim()),
            Span::styled(
                format!(
                    "iman {}%, life {}%, overall {}%",
                    week.averages.iman, week.averages.life, week.averages.overall
                ),
                theme::bold(),
            ),
        ]));

        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let bindings = [
            ("[Enter]/Space", "Toggle prayer, qaza, checklist item or task"),
            ("[j]", "Toggle jamat on the focused prayer"),
            ("[a] / [A]", "Add a must-do / good-to-do task"),
            ("[t]", "Move missed task to today"),
            ("[x]", "Delete task"),
            ("[u]", "Switch life checklist role"),
            ("[w]", "Week view"),
            ("[Tab]", "Switch focus section"),
            ("[↑ ↓]", "Navigate items"),
            ("[?]", "Toggle help"),
            ("[Esc]", "Quit"),
        ];
        let mut help_text = vec![
            Line::from(Span::styled("  Keybindings", theme::gold().add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        for (key, label) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<15}", key), theme::gold()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_task_input(&self, frame: &mut Frame, section: TaskSection) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Task: ", theme::dim()),
                Span::styled(self.input_buffer.as_str(), theme::gold().add_modifier(Modifier::BOLD)),
                Span::styled("█", theme::amber()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  [Enter] add  ·  [Esc] cancel", theme::dim())),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::amber()
        };

        let block = Block::default()
            .title(Span::styled(format!(" New {} task ", section.display_name().to_lowercase()), theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the dashboard until the user quits.
pub fn run(store: &dyn DocumentStore, config: AppConfig) -> Result<()> {
    let tick_rate = Duration::from_secs(config.dashboard.tick_seconds.max(1));
    let mut app = App::new(store, config, SystemClock);

    let mut terminal = ratatui::init();
    crossterm::execute!(std::io::stdout(), crossterm::event::EnableFocusChange)?;
    let events = EventHandler::new(tick_rate);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key, store);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Tick) => app.tick(store),
            Ok(Event::FocusGained) => app.focus_gained(store),
            Err(e) => break Err(e.into()),
        }
    };

    let _ = crossterm::execute!(std::io::stdout(), crossterm::event::DisableFocusChange);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::engine::clock::FixedClock;
    use chrono::NaiveDate;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use serde_json::json;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn tick_after_midnight_reloads_the_day() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(d(9));
        let mut app = App::new(&store, AppConfig::default(), &clock);

        app.handle_key(press(KeyCode::Enter), &store);
        assert!(app.session.prayers.fajr.prayed);

        app.tick(&store);
        assert_eq!(app.session.today, "2024-03-09");

        clock.set(d(10));
        app.tick(&store);
        assert_eq!(app.session.today, "2024-03-10");
        assert!(!app.session.prayers.fajr.prayed);
        assert_eq!(app.session.qaza.total(), 4);
        assert!(app.message.is_some());
    }

    #[test]
    fn tick_reloads_once_the_store_is_readable_again() {
        let store = MemoryStore::new();
        store.insert(
            crate::db::DocPath::daily_prayers("local", "2024-03-09"),
            json!({"prayers": {"asr": {"prayed": true, "jamat": false}}}),
        );
        store.fail_reads.set(true);
        let clock = FixedClock::new(d(9));
        let mut app = App::new(&store, AppConfig::default(), &clock);
        assert!(app.session.unreadable.prayers);
        assert!(!app.session.prayers.asr.prayed);

        store.fail_reads.set(false);
        app.tick(&store);
        assert!(!app.session.unreadable.any());
        assert!(app.session.prayers.asr.prayed);
        assert!(app.message.is_some());
    }

    #[test]
    fn focus_regain_also_detects_the_new_day() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(d(9));
        let mut app = App::new(&store, AppConfig::default(), &clock);
        clock.set(d(10));
        app.focus_gained(&store);
        assert_eq!(app.session.today, "2024-03-10");
    }

    #[test]
    fn typing_a_task_adds_it_to_today() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(d(9));
        let mut app = App::new(&store, AppConfig::default(), &clock);

        app.handle_key(press(KeyCode::Char('A')), &store);
        app.handle_key(press(KeyCode::Enter), &store);
        assert!(app.input_error.is_some());
        for c in "sadaqah".chars() {
            app.handle_key(press(KeyCode::Char(c)), &store);
        }
        app.handle_key(press(KeyCode::Enter), &store);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.session.tasks.today.good_to_do[0].text, "sadaqah");
    }

    #[test]
    fn tab_cycles_sections_and_resets_focus() {
        let store = MemoryStore::new();
        let clock = FixedClock::new(d(9));
        let mut app = App::new(&store, AppConfig::default(), &clock);
        app.handle_key(press(KeyCode::Down), &store);
        assert_eq!(app.focus_idx, 1);
        app.handle_key(press(KeyCode::Tab), &store);
        assert_eq!(app.focus_section, FocusSection::Qaza);
        assert_eq!(app.focus_idx, 0);
        app.handle_key(press(KeyCode::Tab), &store);
        app.handle_key(press(KeyCode::Enter), &store);
        assert!(app.session.growth.data.is_checked(crate::models::GrowthCategory::Iman, "istigfar"));
    }
}

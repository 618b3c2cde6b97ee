use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use crate::cli::args::{
    ContactCommands, GrowthCommands, PrayerCommands, QazaCommands, ReportCommands, SettingsCommands,
    TaskCommands,
};
use crate::config::AppConfig;
use crate::db::repository::{wipe_user, SettingsRepo};
use crate::db::DocumentStore;
use crate::engine::growth_scores;
use crate::migration::import_legacy;
use crate::models::{
    ContactKind, GrowthCategory, PrayerField, PrayerName, TaskBucket, TaskLists, TaskSection, UserType,
    IMAN_KEYS,
};
use crate::report::{daily_report, monthly_report, weekly_report, DailyReport, MonthlyReport, WeeklyReport};
use crate::session::DaySession;
use crate::utils::dates::{parse_date_key, parse_month};
use crate::utils::format::{check, progress_bar};
use crate::utils::hijri::hijri_string;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn session(store: &dyn DocumentStore, config: &AppConfig) -> DaySession {
    let s = DaySession::load(store, &config.user.id, today());
    if s.unreadable.any() {
        println_colored!(RED, "Some data could not be read; changes to it will not be saved this run.");
    }
    s
}

fn parse_prayer(name: &str) -> Result<PrayerName> {
    PrayerName::from_str(name)
        .map_err(|_| anyhow!("Unknown prayer '{}'. Use: fajr, dhuhr, asr, maghrib, isha", name))
}

// ─── Prayers ─────────────────────────────────────────────────────────────────

pub fn handle_prayer(store: &dyn DocumentStore, config: &AppConfig, action: Option<&PrayerCommands>) -> Result<()> {
    let mut s = session(store, config);
    match action {
        None | Some(PrayerCommands::Show) => {
            println!();
            let hijri = hijri_string(s.date, config.dashboard.hijri_offset).unwrap_or_default();
            println_colored!(GOLD, "  Prayers  {}  {}", s.today, hijri);
            println!();
            for (name, slot) in s.prayers.iter() {
                let jamat = if slot.jamat { "  jamat" } else { "" };
                if slot.prayed {
                    println_colored!(GREEN, "  {} {:<8}{}", check(true), name.display_name(), jamat);
                } else {
                    println_colored!(DIM, "  {} {:<8}", check(false), name.display_name());
                }
            }
            let stats = s.prayers.stats();
            println!();
            println!(
                "  {}/5 prayed, {} in jamat  {} {}%",
                stats.total_prayed,
                stats.total_jamat,
                progress_bar(stats.percentage(), 10),
                stats.percentage()
            );
            println!();
        }
        Some(PrayerCommands::Toggle { name, jamat }) => {
            let name = parse_prayer(name)?;
            let field = if *jamat { PrayerField::Jamat } else { PrayerField::Prayed };
            let slot = s.toggle_prayer(store, name, field);
            match (slot.prayed, slot.jamat) {
                (true, true) => println_colored!(GREEN, "  ✓ {} prayed in jamat", name.display_name()),
                (true, false) => println_colored!(GREEN, "  ✓ {} prayed", name.display_name()),
                _ => println_colored!(DIM, "  ○ {} unmarked", name.display_name()),
            }
        }
    }
    Ok(())
}

// ─── Qaza ────────────────────────────────────────────────────────────────────

pub fn handle_qaza(store: &dyn DocumentStore, config: &AppConfig, action: Option<&QazaCommands>) -> Result<()> {
    let mut s = session(store, config);
    match action {
        None | Some(QazaCommands::List) => {
            let total = s.qaza.total();
            println!();
            if total == 0 {
                println_colored!(GREEN, "  ✓ No qaza prayers outstanding");
            } else {
                let source = s.qaza.source_date.clone().unwrap_or_default();
                println_colored!(AMBER, "  Qaza from {} ({} prayers)", source, total);
                println!();
                for name in s.qaza.outstanding() {
                    println!("  {}", name.display_name());
                }
            }
            println!();
        }
        Some(QazaCommands::Pray { name }) => {
            let name = parse_prayer(name)?;
            if s.pray_qaza(store, name) {
                println_colored!(GREEN, "  ✓ {} qaza prayed", name.display_name());
            } else {
                println_colored!(DIM, "  {} is not owed", name.display_name());
            }
        }
    }
    Ok(())
}

// ─── Growth ──────────────────────────────────────────────────────────────────

fn print_checklist(title: &str, keys: &[&str], checked: impl Fn(&str) -> bool, score: u8) {
    println_colored!(BOLD, "  {:<6} {} {}%", title, progress_bar(score, 10), score);
    for key in keys {
        if checked(*key) {
            println_colored!(GREEN, "    {} {}", check(true), key);
        } else {
            println_colored!(DIM, "    {} {}", check(false), key);
        }
    }
}

pub fn handle_growth(store: &dyn DocumentStore, config: &AppConfig, action: Option<&GrowthCommands>) -> Result<()> {
    let mut s = session(store, config);
    match action {
        None | Some(GrowthCommands::Show) => {
            let scores = growth_scores(&s.growth);
            let data = &s.growth.data;
            println!();
            println_colored!(GOLD, "  Growth  {}  ({})", s.today, s.growth.user_type.display_name());
            println!();
            print_checklist("Iman", IMAN_KEYS, |k| data.is_checked(GrowthCategory::Iman, k), scores.iman_score);
            println!();
            print_checklist(
                "Life",
                s.growth.user_type.life_keys(),
                |k| data.is_checked(GrowthCategory::Life, k),
                scores.life_score,
            );
            println!();
            println!("  Overall {}%", scores.overall_score);
            println!();
        }
        Some(GrowthCommands::Role { user_type }) => {
            let user_type = UserType::from_str(user_type)?;
            s.set_user_type(store, user_type);
            println_colored!(GREEN, "  ✓ Life checklist set to {}", user_type.display_name());
        }
        Some(GrowthCommands::Toggle { category, key }) => {
            let category = GrowthCategory::from_str(category)?;
            if s.toggle_growth(store, category, key)? {
                println_colored!(GREEN, "  ✓ {} done", key);
            } else {
                println_colored!(DIM, "  ○ {} unmarked", key);
            }
        }
    }
    Ok(())
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

fn print_tasks(title: &str, lists: &TaskLists) {
    println_colored!(BOLD, "  {}", title);
    if lists.is_empty() {
        println_colored!(DIM, "    nothing here");
        return;
    }
    for section in TaskSection::all() {
        for task in lists.section(section) {
            let line = format!("    {} [{}] {}  ({})", check(task.completed), task.id, task.text, section.display_name());
            if task.completed {
                println_colored!(DIM, "{}", line);
            } else {
                println!("{}", line);
            }
        }
    }
}

pub fn handle_task(store: &dyn DocumentStore, config: &AppConfig, action: Option<&TaskCommands>) -> Result<()> {
    let mut s = session(store, config);
    let bucket = |missed: bool| if missed { TaskBucket::Missed } else { TaskBucket::Today };
    match action {
        None | Some(TaskCommands::List) => {
            println!();
            print_tasks("Today", &s.tasks.today);
            println!();
            if !s.tasks.missed.is_empty() {
                println_colored!(AMBER, "  {} missed", s.tasks.missed.len());
                print_tasks("Missed", &s.tasks.missed);
                println!();
            }
        }
        Some(TaskCommands::Add { text, good }) => {
            let section = if *good { TaskSection::GoodToDo } else { TaskSection::MustDo };
            let id = s.add_task(store, section, text)?;
            println_colored!(GREEN, "  ✓ Added [{}] to {}", id, section.display_name());
        }
        Some(TaskCommands::Toggle { id, missed }) => {
            if s.toggle_task(store, bucket(*missed), *id)? {
                println_colored!(GREEN, "  ✓ Task {} done", id);
            } else {
                println_colored!(DIM, "  ○ Task {} reopened", id);
            }
        }
        Some(TaskCommands::Delete { id, missed }) => {
            let task = s.delete_task(store, bucket(*missed), *id)?;
            println_colored!(RED, "  ✗ Deleted: {}", task.text);
        }
        Some(TaskCommands::Move { id }) => {
            s.move_task_to_today(store, *id)?;
            println_colored!(GREEN, "  ✓ Task {} moved to today", id);
        }
    }
    Ok(())
}

// ─── Contacts ────────────────────────────────────────────────────────────────

pub fn handle_contact(store: &dyn DocumentStore, config: &AppConfig, action: Option<&ContactCommands>) -> Result<()> {
    let mut s = session(store, config);
    match action {
        None | Some(ContactCommands::List) => {
            println!();
            for kind in [ContactKind::Message, ContactKind::Call] {
                println_colored!(BOLD, "  {}", kind.display_name());
                let list = s.contacts.list(kind);
                if list.is_empty() {
                    println_colored!(DIM, "    nobody yet");
                }
                for c in list {
                    println!("    [{}] {}", c.id, c.name);
                }
                println!();
            }
        }
        Some(ContactCommands::Add { kind, name }) => {
            let kind = ContactKind::from_str(kind)?;
            let id = s.add_contact(store, kind, name)?;
            println_colored!(GREEN, "  ✓ Added [{}] to {}", id, kind.display_name());
        }
        Some(ContactCommands::Delete { id }) => {
            let contact = s.delete_contact(store, *id)?;
            println_colored!(RED, "  ✗ Removed {}", contact.name);
        }
    }
    Ok(())
}

// ─── Reports ─────────────────────────────────────────────────────────────────

fn optional_date(date: Option<&String>) -> Result<NaiveDate> {
    date.map(|d| parse_date_key(d)).transpose().map(|d| d.unwrap_or_else(today))
}

pub fn handle_report(store: &dyn DocumentStore, config: &AppConfig, period: &ReportCommands) -> Result<()> {
    let uid = &config.user.id;
    match period {
        ReportCommands::Daily { date, json } => {
            let report = daily_report(store, uid, optional_date(date.as_ref())?)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_daily(&report);
            }
        }
        ReportCommands::Weekly { date, json } => {
            let report = weekly_report(store, uid, optional_date(date.as_ref())?)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_weekly(&report);
            }
        }
        ReportCommands::Monthly { month, json } => {
            let (year, month) = match month {
                Some(m) => parse_month(m)?,
                None => (today().year(), today().month()),
            };
            let report = monthly_report(store, uid, year, month)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_monthly(&report);
            }
        }
    }
    Ok(())
}

fn print_daily(report: &DailyReport) {
    println!("# Muhasaba Daily Report");
    println!("# {}", report.date);
    println!();
    if !report.has_data() {
        println!("No prayer or growth records for this day.");
        return;
    }
    if let Some(p) = &report.prayers {
        println!("## Prayers");
        println!("  Prayed: {}/5  Jamat: {}  Missed: {}  {}", p.prayed, p.jamat, p.missed, progress_bar(p.percentage, 5));
        println!();
    }
    if let Some(g) = &report.growth {
        println!("## Growth ({})", g.user_type.display_name());
        println!("  Iman:    {:>3}%", g.scores.iman_score);
        println!("  Life:    {:>3}%", g.scores.life_score);
        println!("  Overall: {:>3}%", g.scores.overall_score);
        println!();
    }
    print_insights(&report.insights);
}

fn print_weekly(report: &WeeklyReport) {
    println!("# Muhasaba Weekly Report");
    println!("# {} to {}", report.start, report.end);
    println!();
    println!("## Prayer Completion");
    for p in &report.prayers {
        println!("  {}  {}/5  {}  jamat {}", p.date, p.prayed, progress_bar(p.percentage, 5), p.jamat);
    }
    println!();
    println!("## Growth");
    for g in &report.growth {
        println!(
            "  {}  iman {:>3}%  life {:>3}%  overall {:>3}%",
            g.date, g.scores.iman_score, g.scores.life_score, g.scores.overall_score
        );
    }
    println!();
    println!("## Summary");
    println!("  Tracked days: {}/7", report.tracked_days);
    println!(
        "  Prayers:      {} prayed, {} jamat, {} missed",
        report.totals.total, report.totals.jamat, report.totals.missed
    );
    println!(
        "  Growth:       iman {}%, life {}%, overall {}%",
        report.averages.iman, report.averages.life, report.averages.overall
    );
}

fn print_monthly(report: &MonthlyReport) {
    let month_name = NaiveDate::from_ymd_opt(report.year, report.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();
    let s = &report.summary;
    println!("# Muhasaba Monthly Report");
    println!("# {}", month_name);
    println!();
    if !report.has_data() {
        println!("No prayer or growth records for this month.");
        println!();
    }
    println!("## Summary");
    println!("  Tracked days:    {}/{}", s.tracked_days, s.total_days);
    println!("  Prayer average:  {}%", s.prayer_average);
    println!(
        "  Prayers:         {} prayed, {} jamat, {} missed",
        s.prayers.total, s.prayers.jamat, s.prayers.missed
    );
    println!("  Growth average:  {}% (iman {}%, life {}%)", s.growth.overall, s.growth.iman, s.growth.life);
    println!();
    print_insights(&report.insights);
}

fn print_insights(insights: &[String]) {
    if insights.is_empty() {
        return;
    }
    println!("## Insights");
    for line in insights {
        println!("  - {}", line);
    }
}

// ─── Settings ────────────────────────────────────────────────────────────────

pub fn handle_settings(store: &dyn DocumentStore, config: &AppConfig, action: Option<&SettingsCommands>) -> Result<()> {
    let uid = &config.user.id;
    let mut settings = SettingsRepo::load_or_init(store, uid, config.initial_profile())?;
    match action {
        None | Some(SettingsCommands::Show) => {
            println!();
            println_colored!(GOLD, "  Settings");
            println!();
            println!("  User:   {}", uid);
            println!("  Name:   {}", settings.profile.name);
            println!("  Email:  {}", settings.profile.email);
            println!();
            let n = &settings.notifications;
            for (label, on) in [("prayer", n.prayer), ("tasks", n.tasks), ("growth", n.growth)] {
                println!("  Notify {:<7} {}", label, if on { "on" } else { "off" });
            }
            println!();
        }
        Some(SettingsCommands::Name { name }) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(anyhow!("Name is empty"));
            }
            settings.profile.name = name.to_string();
            SettingsRepo::save(store, uid, &settings)?;
            println_colored!(GREEN, "  ✓ Name set to {}", name);
        }
        Some(SettingsCommands::Notify { kind, state }) => {
            let on = match state.to_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                _ => return Err(anyhow!("Use on or off, not '{}'", state)),
            };
            let n = &mut settings.notifications;
            match kind.to_lowercase().as_str() {
                "prayer" => n.prayer = on,
                "tasks" => n.tasks = on,
                "growth" => n.growth = on,
                _ => return Err(anyhow!("Unknown notification '{}'. Use: prayer, tasks, growth", kind)),
            }
            SettingsRepo::save(store, uid, &settings)?;
            println_colored!(GREEN, "  ✓ {} notifications {}", kind, if on { "on" } else { "off" });
        }
    }
    Ok(())
}

// ─── Import and wipe ─────────────────────────────────────────────────────────

pub fn handle_import(store: &dyn DocumentStore, config: &AppConfig, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file).with_context(|| format!("Reading {:?}", file))?;
    let value: serde_json::Value = serde_json::from_str(&content).with_context(|| format!("Parsing {:?}", file))?;
    let dump = value
        .as_object()
        .ok_or_else(|| anyhow!("{:?} must contain a JSON object", file))?;

    let report = import_legacy(store, &config.user.id, dump, today())?;
    if report.is_empty() {
        println_colored!(DIM, "  Nothing to import");
    } else {
        println_colored!(GREEN, "  ✓ Imported");
        println!("    Tasks:        {}", report.tasks);
        println!("    Contacts:     {}", report.contacts);
        println!("    Settings:     {}", if report.settings { "yes" } else { "no" });
        println!("    Prayer days:  {}", report.prayer_days);
        println!("    Growth days:  {}", report.growth_days);
    }
    for kind in &report.skipped {
        println_colored!(AMBER, "  Skipped {}: already stored", kind);
    }
    for kind in &report.invalid {
        println_colored!(RED, "  Skipped {}: could not be parsed", kind);
    }
    Ok(())
}

pub fn handle_wipe(store: &dyn DocumentStore, config: &AppConfig, yes: bool) -> Result<()> {
    if !yes {
        let answer = prompt(&format!(
            "Clear tasks, contacts and settings for '{}'? Type 'yes' to confirm: ",
            config.user.id
        ))?;
        if answer.trim() != "yes" {
            println!("Aborted.");
            return Ok(());
        }
    }
    let flagged = wipe_user(store, &config.user.id)?;
    println_colored!(RED, "  ✗ Cleared {} documents", flagged);
    println_colored!(DIM, "  Day-by-day prayer, growth and qaza history was kept");
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').to_string())
}

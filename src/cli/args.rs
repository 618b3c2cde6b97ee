use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "muhasaba", version, author, about = "Daily self-accounting: prayers, qaza, growth, tasks and contacts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Today's prayers
    Prayer {
        #[command(subcommand)]
        action: Option<PrayerCommands>,
    },
    /// Prayers owed from yesterday
    Qaza {
        #[command(subcommand)]
        action: Option<QazaCommands>,
    },
    /// Iman and life checklists
    Growth {
        #[command(subcommand)]
        action: Option<GrowthCommands>,
    },
    /// Must-do and good-to-do tasks
    Task {
        #[command(subcommand)]
        action: Option<TaskCommands>,
    },
    /// People to message or call
    Contact {
        #[command(subcommand)]
        action: Option<ContactCommands>,
    },
    /// Daily, weekly or monthly report
    Report {
        #[command(subcommand)]
        period: ReportCommands,
    },
    /// Profile and notification settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsCommands>,
    },
    /// Import a local storage dump from the browser version
    Import {
        /// Path to a JSON file of local storage keys
        file: std::path::PathBuf,
    },
    /// Clear this user's tasks, contacts, settings and role
    ///
    /// Per-day prayer, growth and qaza records are kept, so past days still
    /// show up on the dashboard and in reports.
    Wipe {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrayerCommands {
    /// Show today's prayers
    Show,
    /// Toggle a prayer as prayed, or as prayed in congregation
    Toggle {
        /// Prayer name (fajr, dhuhr, asr, maghrib, isha)
        name: String,
        /// Toggle jamat instead of prayed
        #[arg(long)]
        jamat: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum QazaCommands {
    /// Show outstanding qaza prayers
    List,
    /// Mark a qaza prayer as made up
    Pray {
        /// Prayer name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GrowthCommands {
    /// Show today's checklists and scores
    Show,
    /// Change the life checklist role (student, professional, homemaker)
    Role {
        user_type: String,
    },
    /// Toggle a checklist item
    Toggle {
        /// iman or life
        category: String,
        /// Item key, e.g. quran or deepStudy
        key: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Show today's and missed tasks
    List,
    /// Add a task to today's list
    Add {
        text: String,
        /// Add to good-to-do instead of must-do
        #[arg(long)]
        good: bool,
    },
    /// Toggle a task's completion
    Toggle {
        id: i64,
        /// The task is in the missed list
        #[arg(long)]
        missed: bool,
    },
    /// Delete a task
    Delete {
        id: i64,
        /// The task is in the missed list
        #[arg(long)]
        missed: bool,
    },
    /// Move a missed task back to today
    Move {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactCommands {
    /// Show contacts
    List,
    /// Add a contact
    Add {
        /// message or call
        kind: String,
        name: String,
    },
    /// Delete a contact
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// One day's prayers and growth
    Daily {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// The Sunday to Saturday week containing a date
    Weekly {
        /// Any date in the week (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// A calendar month with insights
    Monthly {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show profile and notification settings
    Show,
    /// Set the display name
    Name {
        name: String,
    },
    /// Turn a notification kind on or off
    Notify {
        /// prayer, tasks or growth
        kind: String,
        /// on or off
        state: String,
    },
}

use chrono::Weekday;
use clap::{Args, Parser, Subcommand};
use pumapal_storage::Campus;

use crate::filter::TimeOfDay;

#[derive(Parser)]
#[command(name = "pumapal")]
#[command(about = "Find and organise study groups from the terminal")]
pub struct Cli {
    /// Server address (defaults to the profile's server, then http://localhost:3000)
    #[arg(long, global = true, env = "PUMAPAL_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search upcoming groups by course code
    Search {
        /// Course code, e.g. "COP 2800" (spacing and case are ignored)
        course: String,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List every upcoming group
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show one group
    Show {
        /// Group ID
        id: String,
    },
    /// Create a group; you become its owner
    Create(CreateArgs),
    /// Join a group
    Join {
        /// Group ID
        id: String,

        #[command(flatten)]
        identity: IdentityArgs,
    },
    /// Leave a group
    Leave {
        /// Group ID
        id: String,

        /// Your email (defaults to the profile)
        #[arg(long)]
        email: Option<String>,
    },
    /// Edit a group you own
    Edit(EditArgs),
    /// Delete a group you own
    Delete {
        /// Group ID
        id: String,

        /// Your email (defaults to the profile)
        #[arg(long)]
        email: Option<String>,
    },
    /// Profile commands
    Profile {
        #[command(subcommand)]
        profile_cmd: ProfileCommand,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Save your name, email and preferred server
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        server: Option<String>,
    },
    /// Print the saved profile
    Show,
}

/// Client-side narrowing of a result list.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only groups meeting at this campus
    #[arg(long, value_parser = parse_campus)]
    pub campus: Option<Campus>,

    /// Only groups meeting in this part of the day
    #[arg(long, value_enum)]
    pub time: Option<TimeOfDay>,

    /// Only groups meeting on this weekday (e.g. monday, tue)
    #[arg(long, value_parser = parse_weekday)]
    pub day: Option<Weekday>,
}

/// Name and email, each falling back to the profile.
#[derive(Args, Debug, Clone, Default)]
pub struct IdentityArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Course code, e.g. "CHM 1045C"
    #[arg(long)]
    pub course: String,

    /// Campus name, e.g. "West" or "Winter Park"
    #[arg(long)]
    pub campus: String,

    /// Meeting date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Meeting time, e.g. 18:30 or "6:30 PM"
    #[arg(long)]
    pub time: String,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Display title (defaults to "<COURSE> Study Group <n>")
    #[arg(long)]
    pub title: Option<String>,

    /// Keep your email hidden from people who join
    #[arg(long)]
    pub hide_email: bool,

    #[command(flatten)]
    pub identity: IdentityArgs,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Group ID
    pub id: String,

    /// Your email (defaults to the profile)
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub campus: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub time: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Whether members who are not the owner can see the owner's email
    #[arg(long)]
    pub show_email: Option<bool>,
}

fn parse_campus(raw: &str) -> Result<Campus, String> {
    raw.parse::<Campus>().map_err(|e| e.to_string())
}

fn parse_weekday(raw: &str) -> Result<Weekday, String> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("unknown weekday '{}'", raw))
}

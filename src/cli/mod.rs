use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod cities;
pub mod contacts;
pub mod home;
pub mod inbox;
pub mod people;
pub mod trips;
pub mod ui;

pub use cities::run_cities;
pub use contacts::run_contacts;
pub use home::run_home;
pub use inbox::run_inbox;
pub use people::run_people;
pub use trips::run_trips;

#[derive(Parser)]
#[command(name = "touchdown")]
#[command(about = "Remember who you know in the cities you travel to")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides TOUCHDOWN_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the next upcoming trip
    Home,
    /// List people missing a name or a city
    Inbox,
    /// Manage people
    #[command(subcommand)]
    People(PeopleCommand),
    /// Manage cities
    #[command(subcommand)]
    Cities(CitiesCommand),
    /// Manage a person's contact methods
    #[command(subcommand)]
    Contacts(ContactsCommand),
    /// Manage trips
    #[command(subcommand)]
    Trips(TripsCommand),
}

#[derive(Subcommand)]
pub enum PeopleCommand {
    /// List people, optionally filtered by a name substring
    List { query: Option<String> },
    Add(PersonArgs),
    /// Show a person with their cities and contact methods
    Show { identifier: String },
    Update {
        /// Name or UUID
        identifier: String,
        #[command(flatten)]
        fields: PersonArgs,
        /// Remove the primary city
        #[arg(long)]
        clear_city: bool,
        /// Record that you were in touch today
        #[arg(long)]
        contacted: bool,
    },
    Delete { identifier: String },
}

#[derive(Args, Default)]
pub struct PersonArgs {
    #[arg(short, long)]
    pub name: Option<String>,
    /// Primary city (name or UUID)
    #[arg(short, long)]
    pub city: Option<String>,
    /// Create a city with this name and make it the primary city
    #[arg(long = "new-city", value_name = "NAME", conflicts_with = "city")]
    pub new_city: Option<String>,
    /// Additional city (name or UUID); repeatable
    #[arg(long = "also-city", value_name = "CITY")]
    pub also_city: Vec<String>,
    /// green, yellow or archive
    #[arg(short, long)]
    pub tier: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum CitiesCommand {
    List,
    Add {
        name: String,
        #[arg(short, long)]
        state: Option<String>,
        #[arg(short, long)]
        country: Option<String>,
    },
    /// Show a city and the people in it
    Show { identifier: String },
    Update {
        identifier: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        state: Option<String>,
        #[arg(short, long)]
        country: Option<String>,
    },
    Delete { identifier: String },
}

#[derive(Subcommand)]
pub enum ContactsCommand {
    Add {
        /// Person name or UUID
        person: String,
        /// phone, sms, email, instagram, whatsapp, telegram, linkedin, tiktok
        platform: String,
        value: String,
    },
    Update {
        id: String,
        #[arg(short, long)]
        platform: Option<String>,
        #[arg(short, long)]
        value: Option<String>,
    },
    Delete { id: String },
    /// Open a contact method in its app
    Open { id: String },
}

#[derive(Subcommand)]
pub enum TripsCommand {
    List,
    Add {
        /// City name or UUID
        city: String,
        /// YYYY-MM-DD
        start: String,
        /// YYYY-MM-DD
        end: String,
    },
    Update {
        id: String,
        #[arg(short, long)]
        city: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        end: Option<String>,
    },
    Delete { id: String },
}

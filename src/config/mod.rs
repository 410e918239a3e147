pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::migrate::MigrationDirection;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "contact-normalizer")]
#[command(about = "Normalize phone numbers and repair social profiles in contact exports")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the default country prefix from config
    #[arg(long, global = true)]
    pub country_prefix: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Normalize a phone number to E.164-like form
    Phone { raw: String },

    /// Inspect the service registry
    #[command(subcommand)]
    Service(ServiceCommand),

    /// Convert between profile URLs and (service, username)
    #[command(subcommand)]
    Url(UrlCommand),

    /// Find the profile photo for a profile URL
    Photo {
        url: String,
        /// Call the service's photo API when there is no direct image URL
        #[arg(long)]
        fetch: bool,
    },

    /// Repair a single social profile record
    Repair {
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        url: Option<String>,
    },

    /// Normalize phones and repair profiles across a contact export
    Fix {
        /// Contact export (.json or .csv)
        input: String,
        /// Override the output directory from config
        #[arg(short, long)]
        output: Option<String>,
        /// Only fix this contact id
        #[arg(long)]
        contact: Option<String>,
        /// Print the report without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Move profiles between social profiles and labelled URLs
    Migrate {
        /// Contact export (.json)
        input: String,
        #[arg(long, value_enum)]
        to: MigrationDirection,
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum ServiceCommand {
    /// Show one service by key, display name or alias
    Show { name: String },
    /// List services
    List {
        /// Only services the contact store models natively
        #[arg(long)]
        native: bool,
        /// Only services with photo support
        #[arg(long)]
        photos: bool,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum UrlCommand {
    /// Identify the service and username behind a profile URL
    Resolve { url: String },
    /// Build the profile URL for a service and username
    Build { service: String, username: String },
    /// Label a URL with the display name of its service
    Label { url: String },
}

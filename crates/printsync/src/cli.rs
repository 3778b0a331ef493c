//! Clap derive structures for the `printsync` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// printsync -- keep Cirrato printers and SysMan registrations in step
#[derive(Debug, Parser)]
#[command(
    name = "printsync",
    version,
    about = "Manage Cirrato printers and their SysMan registrations",
    long_about = "Administer printers in Cirrato through its PMC command-line tool\n\
        and keep the matching SysMan printer registrations in sync.\n\n\
        Cirrato and SysMan are queried on every run; printers are matched\n\
        across both systems by exact name.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "PRINTSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Path of the Cirrato PMC executable (overrides profile)
    #[arg(long, env = "PRINTSYNC_PMC_PATH", global = true)]
    pub pmc_path: Option<PathBuf>,

    /// SysMan service URL (overrides profile)
    #[arg(long, env = "PRINTSYNC_SYSMAN_URL", global = true)]
    pub sysman_url: Option<String>,

    /// Access group DN or name (overrides profile)
    #[arg(long, env = "PRINTSYNC_ACCESS_GROUP", global = true, hide_env = true)]
    pub access_group: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PRINTSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid SysMan TLS certificates
    #[arg(long, short = 'k', env = "PRINTSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// SysMan request timeout in seconds (default: profile, then 30)
    #[arg(long, env = "PRINTSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Upper bound for a single PMC invocation in seconds
    #[arg(long, env = "PRINTSYNC_PMC_TIMEOUT", global = true)]
    pub pmc_timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage printers in Cirrato and SysMan
    #[command(alias = "p")]
    Printers(PrintersArgs),

    /// View Cirrato drivers and their configurations
    #[command(alias = "drv")]
    Drivers(DriversArgs),

    /// View Cirrato regions
    Regions(RegionsArgs),

    /// View printers registered in SysMan
    Sysman(SysmanArgs),

    /// Suggest printer names from the SITE_BUILDING_FLOOR_NN scheme
    Names(NamesArgs),

    /// Show connection status and directory counts
    Status,

    /// Log the Cirrato PMC in
    Login(LoginArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRINTERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PrintersArgs {
    #[command(subcommand)]
    pub command: PrintersCommand,
}

/// Printer field a search term is matched against.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum FilterField {
    #[default]
    Name,
    Ip,
    Driver,
    Region,
    Description,
    Location,
}

#[derive(Debug, Subcommand)]
pub enum PrintersCommand {
    /// List printers, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Case-insensitive search term
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Field the search term is matched against
        #[arg(long, short = 'f', value_enum, default_value_t)]
        field: FilterField,
    },

    /// Show printer details
    Get {
        /// Printer name
        printer: String,
    },

    /// Create a printer in Cirrato and, unless told otherwise, SysMan
    Create {
        /// Printer name (SITE_BUILDING_FLOOR_NN)
        name: String,

        /// Cirrato region
        #[arg(long, short = 'r')]
        region: String,

        /// IPv4 address
        #[arg(long)]
        ip: String,

        /// Driver name
        #[arg(long, short = 'd')]
        driver: String,

        /// Configuration of the driver to bind to the queue
        #[arg(long, short = 'c')]
        configuration: Option<String>,

        /// Printer description (comment)
        #[arg(long)]
        description: String,

        /// Printer location
        #[arg(long, short = 'l')]
        location: String,

        /// Create the printer in Cirrato only
        #[arg(long)]
        no_sysman: bool,
    },

    /// Update a printer; omitted values stay unchanged
    Update(UpdatePrinterArgs),

    /// Delete a printer from Cirrato and SysMan
    #[command(alias = "rm")]
    Delete {
        /// Printer name
        printer: String,
    },

    /// Register an existing Cirrato printer in SysMan
    SysmanCreate {
        /// Printer name
        printer: String,
    },

    /// List computers that have the printer installed
    Targets {
        /// Printer name
        printer: String,
    },

    /// Bind a driver configuration to the printer's queue
    AddConfig {
        /// Printer name
        printer: String,

        /// Configuration name
        configuration: String,
    },

    /// Remove the configuration from the printer's queue
    RemoveConfig {
        /// Printer name
        printer: String,
    },
}

#[derive(Debug, Args)]
pub struct UpdatePrinterArgs {
    /// Printer name
    pub printer: String,

    /// New printer name
    #[arg(long)]
    pub name: Option<String>,

    /// New IPv4 address
    #[arg(long)]
    pub ip: Option<String>,

    /// New driver
    #[arg(long, short = 'd')]
    pub driver: Option<String>,

    /// New region
    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// New queue configuration
    #[arg(long, short = 'c', conflicts_with = "no_configuration")]
    pub configuration: Option<String>,

    /// Remove the queue configuration
    #[arg(long)]
    pub no_configuration: bool,

    /// New Cirrato description
    #[arg(long)]
    pub description: Option<String>,

    /// New Cirrato location
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// New SysMan description
    #[arg(long)]
    pub sysman_description: Option<String>,

    /// New SysMan location
    #[arg(long)]
    pub sysman_location: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DRIVERS / REGIONS / SYSMAN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DriversArgs {
    #[command(subcommand)]
    pub command: DriversCommand,
}

#[derive(Debug, Subcommand)]
pub enum DriversCommand {
    /// List drivers
    #[command(alias = "ls")]
    List,

    /// Show a driver with its configurations and operating systems
    Get {
        /// Driver name
        driver: String,
    },
}

#[derive(Debug, Args)]
pub struct RegionsArgs {
    #[command(subcommand)]
    pub command: RegionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RegionsCommand {
    /// List regions
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct SysmanArgs {
    #[command(subcommand)]
    pub command: SysmanCommand,
}

#[derive(Debug, Subcommand)]
pub enum SysmanCommand {
    /// List active SysMan printers
    #[command(alias = "ls")]
    List,

    /// List SysMan printers with no Cirrato counterpart
    Orphans,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NAMES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NamesArgs {
    #[command(subcommand)]
    pub command: NamesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NamesCommand {
    /// Suggest the next free name for a location
    Suggest {
        /// Site code
        #[arg(long)]
        site: Option<String>,

        /// Building code
        #[arg(long, requires = "site")]
        building: Option<String>,

        /// Floor code
        #[arg(long, requires = "building")]
        floor: Option<String>,
    },

    /// List known sites
    Sites,

    /// List buildings of a site
    Buildings {
        /// Site code
        site: String,
    },

    /// List floors of a building
    Floors {
        /// Site code
        site: String,

        /// Building code
        building: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login domain (defaults to the profile's domain)
    #[arg(long)]
    pub domain: Option<String>,

    /// Username (defaults to the profile's username)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g., "sysman_url", "pmc_path")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,

        /// Store the SysMan password instead of the PMC password
        #[arg(long)]
        sysman: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

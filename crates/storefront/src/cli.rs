//! Clap derive structures for the `storefront` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// storefront -- browse the catalog, manage your cart, from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    version,
    about = "Shop a storefront backend from the command line",
    long_about = "Browse products, manage a cart, and log in against a storefront\n\
        backend. The backend is the source of truth: every cart change is\n\
        followed by a fresh fetch of the cart.",
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
    #[arg(long, short = 'p', env = "STOREFRONT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "STOREFRONT_BACKEND_URL", global = true)]
    pub backend_url: Option<String>,

    /// Where to keep the login session (overrides profile)
    #[arg(long, env = "STOREFRONT_SESSION", global = true)]
    pub session: Option<SessionMode>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "STOREFRONT_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "STOREFRONT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
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

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SessionMode {
    /// JSON file in the data directory
    File,
    /// System keyring
    Keyring,
    /// Not persisted (every run starts logged out)
    Memory,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the product catalog
    #[command(alias = "p")]
    Products(ProductsArgs),

    /// List product categories
    Categories,

    /// View and change your cart
    Cart(CartArgs),

    /// Log in to your account
    Login(LoginArgs),

    /// Create an account and log in
    Register(RegisterArgs),

    /// Log out and forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Check that the backend is up
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products, optionally filtered
    #[command(alias = "ls")]
    List {
        /// Exact category name ("all" for any)
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Case-insensitive text to find in name or description
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

// ── Cart ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    Show,

    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
    },

    /// Set a line's quantity (0 removes it)
    Update {
        /// Product ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a product from the cart
    #[command(alias = "rm")]
    Remove {
        /// Product ID
        id: String,
    },
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name (prompted if omitted)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted if omitted)
    #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a starter config file
    Init,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

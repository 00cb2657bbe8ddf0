use clap::{Parser, Subcommand};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "boxes")]
#[command(about = "Account and box-grid client for the auth API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API URL (otherwise the one you logged in against)
    #[arg(long, global = true, env = "BOXES_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new account
    Register {
        /// Register the account as an admin
        #[arg(long)]
        admin: bool,
    },
    /// Log in and store the token in the system keyring
    Login {
        /// Log in through the admin door (fails for regular accounts)
        #[arg(long)]
        admin: bool,
    },
    /// Log out and clear stored credentials
    Logout,
    /// Check whether the stored token is still good
    Status,
    /// Show the logged-in account
    Whoami,
    /// Print the box grid
    Show,
    /// Select or deselect individual boxes
    Toggle {
        /// Box indices
        #[arg(required = true, allow_negative_numbers = true)]
        indices: Vec<i64>,
    },
    /// Shift-click style range: select up to --to, or deselect back to it
    Extend {
        /// The box you last clicked
        #[arg(long, allow_negative_numbers = true)]
        from: i64,
        /// The box you are shift-clicking now
        #[arg(long, allow_negative_numbers = true)]
        to: i64,
    },
    /// Grow the grid by N boxes
    Add {
        /// Number of boxes to add
        count: u32,
    },
    /// Back to 100 empty boxes
    Reset,
}

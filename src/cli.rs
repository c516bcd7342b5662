use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deals")]
#[command(about = "Browse and claim deals")]
pub struct Cli {
    /// Deals service base URL (overrides DEALS_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Session file (overrides DEALS_SESSION_FILE)
    #[arg(long)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        email: String,
        #[arg(long, env = "DEALS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long, env = "DEALS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the cached profile
    Whoami,
    /// List all deals
    Deals,
    /// Show one deal and whether it can be claimed
    Deal { id: String },
    /// Claim a deal
    Claim {
        id: String,
        /// Send the claim even when the local gate says it will be refused
        #[arg(long)]
        force: bool,
    },
    /// Show your claims and verification status
    Claims,
    /// Request identity verification
    Verify,
    /// Fetch the current verification status
    Status,
}

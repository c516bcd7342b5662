//! # deals
//!
//! Command-line front end for the deals client.
//!
//! ## Environment Setup
//! ```bash
//! export DEALS_API_URL=http://localhost:5000
//! ```
//!
//! ## Usage
//! ```bash
//! deals login you@example.com --password ...
//! deals deal 42
//! deals claim 42
//! ```

mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use deals_client::app::{
    CLAIM_SUCCESS_MESSAGE, VERIFICATION_REQUESTED_MESSAGE, claim_failure_message,
};
use deals_client::config::Config;
use deals_client::models::Credentials;
use deals_client::session::FileSessionBackend;
use deals_client::{ApiClient, ClientError, DealsApp, SessionStore};

use crate::cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(client_err) = e.downcast_ref::<ClientError>() {
                eprintln!("{}", client_err.user_message());
                if client_err.requires_login() {
                    eprintln!("Run `deals login <email>` to sign in.");
                }
            } else {
                eprintln!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?.with_overrides(cli.api_url.as_deref(), cli.session_file)?;
    tracing::debug!(
        "Using {} with session at {}",
        config.api_url,
        config.session_file.display()
    );

    let api = ApiClient::new(&config.api_url, config.request_timeout)
        .context("Failed to create HTTP client")?;
    let session = SessionStore::new(Arc::new(FileSessionBackend::new(&config.session_file)));
    let app = DealsApp::new(api, session);

    match cli.command {
        Command::Register { email, password } => {
            app.register(&Credentials::new(email, password)).await?;
            println!("Account created. Run `deals login` to sign in.");
        }
        Command::Login { email, password } => {
            let profile = app.login(&Credentials::new(email, password)).await?;
            println!(
                "Signed in as {} [{}]",
                profile.email,
                profile.verification_status.badge_label()
            );
        }
        Command::Logout => {
            app.logout()?;
            println!("Signed out.");
        }
        Command::Whoami => match app.session().current() {
            Some(session) => match session.profile {
                Some(profile) => {
                    let note = if session.awaiting_confirmation {
                        " (awaiting confirmation)"
                    } else {
                        ""
                    };
                    let badge = profile.verification_status.badge_label();
                    println!("{} [{}]{}", profile.email, badge, note);
                }
                None => println!("Signed in (no cached profile)"),
            },
            None => println!("Not signed in"),
        },
        Command::Deals => {
            for deal in app.deals().await? {
                let lock = if deal.is_locked { " [locked]" } else { "" };
                println!("{}  {} ({}){}", deal.id, deal.title, deal.category, lock);
            }
        }
        Command::Deal { id } => {
            let view = app.deal_view(&id).await?;
            println!("{}", view.deal.title);
            println!("{}", view.deal.description);
            println!("Category: {}", view.deal.category);
            if let Some(guidance) = view.guidance {
                println!("{}", guidance.message());
            }
            println!("[{}]", view.decision.label);
        }
        Command::Claim { id, force } => {
            let view = app.deal_view(&id).await?;
            if !view.decision.eligible && !force {
                anyhow::bail!("{}: {}", view.decision.label, view.deal.title);
            }
            match app.claim(&id).await {
                Ok(_) => println!("{}", CLAIM_SUCCESS_MESSAGE),
                Err(e) if matches!(e, ClientError::Api(_)) => {
                    anyhow::bail!(claim_failure_message(&e))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Claims => {
            let dashboard = app.dashboard().await?;
            if let Some(profile) = &dashboard.profile {
                println!("{}", profile.email);
            }
            println!("{}", dashboard.verification_status.badge_label());
            if dashboard.claims.is_empty() {
                println!("No claims yet.");
            }
            for claim in dashboard.claims {
                println!(
                    "{}  {} ({})  {}",
                    claim.id, claim.deal.title, claim.deal.category, claim.status
                );
            }
        }
        Command::Verify => {
            app.request_verification().await?;
            println!("{}", VERIFICATION_REQUESTED_MESSAGE);
        }
        Command::Status => {
            let status = app.refresh_verification().await?;
            println!("{}", status.badge_label());
        }
    }

    Ok(())
}

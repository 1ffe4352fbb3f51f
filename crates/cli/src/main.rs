//! Storerate CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sr-cli migrate
//!
//! # Create the first admin account
//! SR_ADMIN_PASSWORD='Adm1n!pass' sr-cli admin create -e admin@example.com -n "Admin" -a "HQ"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create an admin account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "sr-cli")]
#[command(author, version, about = "Storerate CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin postal address
        #[arg(short, long)]
        address: String,

        /// Login password (8-16 chars, one uppercase, one of !@#$%^&*)
        #[arg(long, env = "SR_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                address,
                password,
            } => {
                let password = SecretString::from(password);
                commands::admin::create(&email, &name, &address, &password).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_admin_create_args() {
        let cli = Cli::try_parse_from([
            "sr-cli",
            "admin",
            "create",
            "-e",
            "root@x.com",
            "-n",
            "Root",
            "-a",
            "HQ",
            "--password",
            "Adm1n!pass",
        ])
        .unwrap();

        let Commands::Admin {
            action:
                AdminAction::Create {
                    email, password, ..
                },
        } = cli.command
        else {
            panic!("expected admin create");
        };
        assert_eq!(email, "root@x.com");
        assert_eq!(password, "Adm1n!pass");
    }

    #[test]
    fn test_migrate_takes_no_target() {
        let cli = Cli::try_parse_from(["sr-cli", "migrate"]).unwrap();
        assert!(matches!(cli.command, Commands::Migrate));
        assert!(Cli::try_parse_from(["sr-cli", "migrate", "admin"]).is_err());
    }
}

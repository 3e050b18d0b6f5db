//! CLI command definitions for the `giftafy` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod account;
pub mod catalog;
pub mod find;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Find gifts for the people you care about.
#[derive(Parser)]
#[command(name = "giftafy", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans to stdout through OpenTelemetry.
    #[arg(long, global = true, env = "GIFTAFY_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (hosted functions, accounts, dashboard).
    Serve {
        /// Port to listen on. Defaults to the configured port.
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to. Defaults to the configured host.
        #[arg(long)]
        host: Option<String>,
    },

    /// Find gift ideas (interactive questionnaire when no flags are given).
    Find(find::FindArgs),

    /// List the local gift catalog.
    Catalog,

    /// Manage accounts in the local account store.
    Account {
        #[command(subcommand)]
        action: AccountCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Create an account (prompts for the password when omitted).
    Create {
        /// Email address for the account.
        email: String,

        /// Password (at least eight characters).
        #[arg(long)]
        password: Option<String>,
    },

    /// Change an account's subscription tier.
    Tier {
        /// Email address of the account.
        email: String,

        /// New tier (free, pro, enterprise).
        tier: giftafy_types::account::SubscriptionTier,
    },

    /// Sign in and print a bearer token for `find --token`.
    Login {
        /// Email address of the account.
        email: String,

        /// Password (prompted when omitted).
        #[arg(long)]
        password: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_find_flags_parse() {
        let cli = Cli::try_parse_from([
            "giftafy",
            "find",
            "--relationship",
            "family member",
            "--age",
            "26-35",
            "--occasion",
            "birthday",
            "--interests",
            "cooking",
            "--budget",
            "$50-$100",
            "--sort",
            "priceAsc",
        ])
        .unwrap();

        let Commands::Find(args) = cli.command else {
            panic!("expected find");
        };
        let query = args.flag_query().unwrap();
        assert_eq!(
            query.relationship,
            giftafy_types::query::Relationship::FamilyMember
        );
        assert_eq!(query.interests, "cooking");
        assert_eq!(query.budget_label, "$50-$100");
    }

    #[test]
    fn test_account_tier_parses_tier() {
        let cli = Cli::try_parse_from(["giftafy", "account", "tier", "a@b.co", "pro"]).unwrap();
        let Commands::Account {
            action: AccountCommand::Tier { tier, .. },
        } = cli.command
        else {
            panic!("expected account tier");
        };
        assert_eq!(tier, giftafy_types::account::SubscriptionTier::Pro);
    }

    #[test]
    fn test_invalid_relationship_rejected() {
        assert!(Cli::try_parse_from(["giftafy", "find", "--relationship", "nemesis"]).is_err());
    }
}

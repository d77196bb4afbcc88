//! Command-line interface definitions.
//!
//! Defines the CLI structure for the bracketeer application using `clap`.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use super::paths;

/// Order-book purchases and position redemption for Polymarket
#[derive(Parser, Debug)]
#[command(name = "bracketeer")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the bracketeer CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Preview a capped purchase against the live order book
    Preview(PurchaseArgs),

    /// Buy along the ask ladder up to a price and budget
    Execute(ExecuteArgs),

    /// Show the collateral available for trading
    Balance(ConfigPathArg),

    /// Run one redemption cycle now
    Redeem(ConfigPathArg),

    /// Redeem resolved positions on a schedule until interrupted
    Run(ConfigPathArg),

    /// List redemptions awaiting confirmation
    Pending(ConfigPathArg),
}

impl Commands {
    /// Configuration file the command was pointed at.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        match self {
            Self::Preview(args) => &args.config.config,
            Self::Execute(args) => &args.purchase.config.config,
            Self::Balance(args) | Self::Redeem(args) | Self::Run(args) | Self::Pending(args) => {
                &args.config
            }
        }
    }
}

/// Shared `--config` argument.
#[derive(Args, Debug, Clone)]
pub struct ConfigPathArg {
    /// Path to the configuration file
    #[arg(long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

/// Arguments describing a capped purchase.
#[derive(Args, Debug, Clone)]
pub struct PurchaseArgs {
    /// Outcome token to buy
    #[arg(long)]
    pub token_id: String,

    /// Highest price to pay per share, exclusive of 0 and 1
    #[arg(long)]
    pub max_price: Decimal,

    /// Most to spend in USDC; the whole ladder under the cap if omitted
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// Days until the market settles, for the APY estimate
    #[arg(long)]
    pub days: Option<Decimal>,

    #[command(flatten)]
    pub config: ConfigPathArg,
}

/// Arguments for `bracketeer execute`.
#[derive(Args, Debug, Clone)]
pub struct ExecuteArgs {
    #[command(flatten)]
    pub purchase: PurchaseArgs,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_execute_with_budget() {
        let cli = Cli::try_parse_from([
            "bracketeer",
            "execute",
            "--token-id",
            "123",
            "--max-price",
            "0.5",
            "--budget",
            "10",
            "--yes",
            "--config",
            "/tmp/c.toml",
        ])
        .unwrap();

        match cli.command {
            Commands::Execute(args) => {
                assert!(args.yes);
                assert_eq!(args.purchase.max_price, dec!(0.5));
                assert_eq!(args.purchase.budget, Some(dec!(10)));
                assert_eq!(args.purchase.config.config, PathBuf::from("/tmp/c.toml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_path_is_found_for_every_command() {
        let cli = Cli::try_parse_from(["bracketeer", "run", "--config", "/etc/b.toml"]).unwrap();
        assert_eq!(cli.command.config_path(), Path::new("/etc/b.toml"));

        let cli = Cli::try_parse_from([
            "bracketeer",
            "execute",
            "--token-id",
            "1",
            "--max-price",
            "0.3",
            "--config",
            "/etc/e.toml",
        ])
        .unwrap();
        assert_eq!(cli.command.config_path(), Path::new("/etc/e.toml"));

        let cli =
            Cli::try_parse_from(["bracketeer", "balance", "--config", "/etc/c.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Balance(_)));
        assert_eq!(cli.command.config_path(), Path::new("/etc/c.toml"));
    }

    #[test]
    fn preview_budget_is_optional() {
        let cli = Cli::try_parse_from([
            "bracketeer",
            "preview",
            "--token-id",
            "123",
            "--max-price",
            "0.9",
        ])
        .unwrap();

        match cli.command {
            Commands::Preview(args) => {
                assert_eq!(args.budget, None);
                assert_eq!(args.config.config, paths::default_config());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["bracketeer", "pending", "--json"]).unwrap();
        assert!(cli.json);
    }
}

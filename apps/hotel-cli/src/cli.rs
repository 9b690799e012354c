//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Backend;

#[derive(Parser, Debug)]
#[command(name = "hotel")]
#[command(version)]
#[command(about = "Hotel front desk: rooms, food and drink orders, daily sales")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Acting user (must exist in the user directory)
    #[arg(long, short = 'u', global = true, default_value = "admin")]
    pub user: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to hotel.toml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend override (sqlite, flat_file)
    #[arg(long, global = true)]
    pub backend: Option<Backend>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sell units of an item
    Order {
        /// Item name, e.g. "Burger" or "Room"
        item: String,

        /// Number of units
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Set the total stocked quantity of an item
    Restock {
        item: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Units sold and revenue per item for one day
    Report {
        /// Day to report on (YYYY-MM-DD, UTC). Defaults to today.
        #[arg(long)]
        day: Option<NaiveDate>,
    },

    /// Price, quantity, sold and remaining per item
    Inventory,

    /// Archive today's sales to CSV and reset sold counters
    Rollover {
        /// Required; without it nothing happens
        #[arg(long)]
        confirm: bool,
    },

    /// Create a user account (admin only)
    AddUser {
        username: String,

        /// admin or staff
        #[arg(default_value = "staff")]
        role: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order() {
        let cli = Cli::try_parse_from(["hotel", "order", "Chicken Roll", "2", "--user", "desk"])
            .unwrap();
        assert_eq!(cli.user, "desk");
        match cli.command {
            Commands::Order { item, quantity } => {
                assert_eq!(item, "Chicken Roll");
                assert_eq!(quantity, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_negative_quantity_reaches_the_core() {
        let cli = Cli::try_parse_from(["hotel", "order", "Burger", "-1"]).unwrap();
        assert!(matches!(cli.command, Commands::Order { quantity: -1, .. }));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "hotel",
            "report",
            "--day",
            "2024-03-10",
            "--json",
            "--backend",
            "flat_file",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.backend, Some(Backend::FlatFile));
        assert_eq!(cli.user, "admin");
        assert!(matches!(
            cli.command,
            Commands::Report { day: Some(d) } if d == NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        ));
    }

    #[test]
    fn test_rollover_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["hotel", "rollover"]).unwrap();
        assert!(matches!(cli.command, Commands::Rollover { confirm: false }));
    }
}

//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::EmployeeId;

/// Organization budget rollups from an employee roster
#[derive(Parser, Debug)]
#[command(name = "orgbudget")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Roster file (overrides the `roster` setting)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub roster: Option<PathBuf>,

    /// Fail on unknown employee ids instead of reporting 0
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the organization budget of each employee
    Budget {
        /// Employee ids
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<EmployeeId>,
    },

    /// Show root, headcount and budget of an employee's organization
    Org {
        /// Employee id
        #[arg(allow_negative_numbers = true)]
        id: EmployeeId,
    },

    /// Render the hierarchy, or only the organization of an employee
    Tree {
        /// Employee id
        #[arg(allow_negative_numbers = true)]
        id: Option<EmployeeId>,
    },

    /// List employees without a manager
    Roots,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Print the global config file location
    Path,
    /// Print a commented config template
    Template,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_budget_with_ids_when_parsing_then_collects_all() {
        let cli =
            Cli::try_parse_from(["orgbudget", "-vv", "--strict", "budget", "1", "2"]).unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(cli.strict);
        assert!(matches!(cli.command, Commands::Budget { ref ids } if ids == &vec![1, 2]));
    }

    #[test]
    fn given_budget_without_ids_when_parsing_then_errors() {
        assert!(Cli::try_parse_from(["orgbudget", "budget"]).is_err());
    }

    #[test]
    fn given_global_roster_after_subcommand_when_parsing_then_accepted() {
        let cli = Cli::try_parse_from(["orgbudget", "tree", "-r", "org.toml"]).unwrap();

        assert_eq!(cli.roster, Some(PathBuf::from("org.toml")));
        assert!(matches!(cli.command, Commands::Tree { id: None }));
    }
}

//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings, UnknownEmployeePolicy};
use crate::domain::{EmployeeId, Organization};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::OrgTreeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let cwd = std::env::current_dir().ok();
    let settings = Settings::load(cwd.as_deref())?;
    execute_with_settings(cli, settings)
}

/// Run `cli` against already loaded `settings`; command-line flags still win.
pub fn execute_with_settings(cli: &Cli, settings: Settings) -> CliResult<()> {
    let settings = apply_cli_overrides(cli, settings);
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Commands::Budget { ids } => cmd_budget(&container, ids),
        Commands::Org { id } => cmd_org(&container, *id),
        Commands::Tree { id } => cmd_tree(&container, *id),
        Commands::Roots => cmd_roots(&container),
        Commands::Config { command } => cmd_config(&container, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn apply_cli_overrides(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(roster) = &cli.roster {
        settings.roster = Some(roster.clone());
    }
    if cli.strict {
        settings.unknown_employee = UnknownEmployeePolicy::Error;
    }
    debug!(?settings, "effective settings");
    settings
}

fn load_org(container: &ServiceContainer) -> CliResult<Organization> {
    let roster = container.settings.roster.as_deref().ok_or_else(|| {
        CliError::Usage("no roster file given (use --roster or set `roster` in the config)".into())
    })?;
    Ok(container.budget_service.load(roster)?)
}

#[instrument(level = "debug", skip(container))]
fn cmd_budget(container: &ServiceContainer, ids: &[EmployeeId]) -> CliResult<()> {
    let org = load_org(container)?;
    debug!(policy = %container.budget_service.policy(), "querying budgets");
    for (id, budget) in container.budget_service.budgets(&org, ids)? {
        output::info(&format!("{id}: {budget}"));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_org(container: &ServiceContainer, id: EmployeeId) -> CliResult<()> {
    let org = load_org(container)?;
    let summary = container.budget_service.summary(&org, id)?;

    output::header(&format!("Organization of {id}"));
    output::action("root", &summary.root_id);
    output::action("headcount", &summary.headcount);
    output::action("budget", &summary.budget);
    if summary.root_id != id {
        output::detail(&format!(
            "{id} is an individual contributor reporting to {}",
            summary.root_id
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, id: Option<EmployeeId>) -> CliResult<()> {
    let org = load_org(container)?;

    match id {
        Some(id) => {
            container.budget_service.require(&org, id)?;
            if let Some(tree) = org.org_tree(id) {
                output::info(&tree);
            }
        }
        None => {
            if org.is_empty() {
                output::warning("roster has no employees");
            }
            for tree in org.to_trees() {
                output::info(&tree);
            }
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_roots(container: &ServiceContainer) -> CliResult<()> {
    let org = load_org(container)?;

    for root in org.roots() {
        output::info(&root);
        if let Some(manager_id) = org.get(root).and_then(|node| node.manager_id) {
            output::warning(&format!("{root} reports to unknown manager {manager_id}"));
        }
    }
    debug!(depth = org.depth(), "hierarchy depth");
    Ok(())
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => return Err(CliError::Usage("cannot determine config directory".into())),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

//! Setup CLI commands

use clap::Subcommand;

use crate::display::format_setup_list;
use crate::error::JournalResult;
use crate::facade::Journal;
use crate::models::{Setup, SetupUpdate};

use super::match_id;

/// Setup subcommands
#[derive(Subcommand)]
pub enum SetupCommands {
    /// Create a new setup
    Create {
        /// Setup name
        name: String,
        /// Short description
        #[arg(short, long, default_value = "")]
        description: String,
        /// A rule of the setup (repeatable)
        #[arg(short, long = "rule")]
        rules: Vec<String>,
    },
    /// List setups
    List {
        /// Include deleted setups
        #[arg(short, long)]
        all: bool,
    },
    /// Edit a setup
    Edit {
        /// Setup name or ID
        setup: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Replace the rules (repeatable)
        #[arg(short, long = "rule")]
        rules: Vec<String>,
    },
    /// Delete a setup
    Delete {
        /// Setup name or ID
        setup: String,
    },
}

/// Handle a setup command
pub fn handle_setup_command(journal: &Journal<'_>, cmd: SetupCommands) -> JournalResult<()> {
    match cmd {
        SetupCommands::Create {
            name,
            description,
            rules,
        } => {
            let mut setup = Setup::new(name, description);
            setup.rules = rules;
            let setup = journal.create_setup(setup)?;
            println!("Created setup: {}", setup.name);
            println!("  ID: {}", setup.id);
        }

        SetupCommands::List { all } => {
            let setups = journal.list_setups(all)?;
            println!("{}", format_setup_list(&setups));
        }

        SetupCommands::Edit {
            setup,
            name,
            description,
            rules,
        } => {
            let found = resolve_setup(journal, &setup)?;
            let update = SetupUpdate {
                name,
                description,
                rules: (!rules.is_empty()).then_some(rules),
            };
            if update.is_empty() {
                println!("No changes specified. Use --name, --description or --rule.");
                return Ok(());
            }

            let updated = journal.update_setup(found.id, &update)?;
            println!("Updated setup: {}", updated.name);
        }

        SetupCommands::Delete { setup } => {
            let found = resolve_setup(journal, &setup)?;
            let deleted = journal.delete_setup(found.id)?;
            println!("Deleted setup: {}", deleted.name);
        }
    }

    Ok(())
}

/// Find a live setup by name (case-insensitive) or ID
pub(crate) fn resolve_setup(journal: &Journal<'_>, input: &str) -> JournalResult<Setup> {
    let setups = journal.list_setups(false)?;
    if let Some(setup) = setups.iter().find(|s| s.name.eq_ignore_ascii_case(input.trim())) {
        return Ok(setup.clone());
    }
    match_id(&setups, input, |s| s.id, "Setup").cloned()
}

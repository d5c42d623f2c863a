//! Function for building the command line hierarchy.

use super::check::create_check_subcommand;
use clap::{self, Arg, ArgAction, Command};

/// Build the `tabnufft` command line hierarchy.
pub fn build() -> Command {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .action(ArgAction::SetTrue)
                .help("Display elapsed time when done"),
        )
        .subcommand(create_check_subcommand())
}

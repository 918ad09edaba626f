//! Helpers for building clap commands
use std::path::PathBuf;
use anyhow::{anyhow, Context};
pub use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use eternal_resolution::{ArchiveRegistry, DEFAULT_MAPPING_FILE};

pub type CliResult = anyhow::Result<()>;
pub type Subcommand = (Command, fn(&ArgMatches) -> CliResult);

pub fn parent_command(name: &'static str) -> Command {
    Command::new(name)
        .arg_required_else_help(true)
        .subcommand_required(true)
}

pub fn arg_mapping() -> Arg {
    Arg::new("mapping")
        .short('m')
        .long("mapping")
        .env("ETERNAL_ARCHIVE_RESOLUTION")
        .value_name("file")
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_MAPPING_FILE)
        .help("Archive mapping file")
}

/// Get the mapping file path from the `mapping` arg
pub fn mapping_path(matches: &ArgMatches) -> anyhow::Result<&PathBuf> {
    matches.get_one::<PathBuf>("mapping").context("archive mapping path not set")
}

/// Load the archive mapping, fail if it is not available
pub fn require_registry(matches: &ArgMatches) -> anyhow::Result<ArchiveRegistry> {
    let path = mapping_path(matches)?;
    ArchiveRegistry::load(path)
        .with_context(|| format!("failed to load archive mapping {}", path.display()))?
        .ok_or_else(|| anyhow!("archive mapping {} is missing or has an unsupported version", path.display()))
}

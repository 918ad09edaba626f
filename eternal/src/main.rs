use tracing_subscriber::EnvFilter;

mod cli;
mod cmd_hash;
mod cmd_mapping;
mod cmd_resolve;

use cli::*;


fn main() -> CliResult {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let subcommands: Vec<Subcommand> = vec![
        cmd_hash::subcommand("hash"),
        cmd_resolve::subcommand("resolve"),
        cmd_mapping::subcommand("mapping"),
    ];

    let cmd = Command::new("eternal")
        .about("Resolve game resources to the archives containing them")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand_required(true)
        .after_help(
            "Log level is set with RUST_LOG (default: warn).\n\
             ETERNAL_ARCHIVE_RESOLUTION can be used to set the archive mapping file."
        )
        .subcommands(subcommands.iter().map(|(cmd, _)| cmd.clone()));

    let matches = cmd.get_matches();
    let (name, sub_matches) = matches.subcommand().unwrap_or_else(|| unreachable!());
    let (_, handler) = subcommands
        .iter()
        .find(|(cmd, _)| cmd.get_name() == name)
        .unwrap_or_else(|| unreachable!());
    handler(sub_matches)
}

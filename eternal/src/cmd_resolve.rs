use eternal_resolution::{ArchiveResolver, LoadOutcome};
use tracing::warn;
use crate::cli::*;

pub fn subcommand(name: &'static str) -> Subcommand {
    let cmd = Command::new(name)
        .about("List the archives containing resources")
        .arg(arg_mapping())
        .arg(Arg::new("paths")
            .value_name("path")
            .required(true)
            .num_args(1..)
            .help("Resource paths to resolve"))
        ;
    (cmd, handle)
}

fn handle(matches: &ArgMatches) -> CliResult {
    let mapping = mapping_path(matches)?;
    let resolver = ArchiveResolver::new();
    if resolver.load(mapping)? == LoadOutcome::Absent {
        warn!("archive mapping {} not available, no resource will be resolved", mapping.display());
    }

    for path in matches.get_many::<String>("paths").into_iter().flatten() {
        println!("{path}");
        let names = resolver.resolve_archives(path);
        if names.is_empty() {
            println!("  -");
        }
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}

use eternal_hashes::resource::{
    compute_raw_path_hash,
    compute_resource_hash,
    ResourceHash,
};
use crate::cli::*;

pub fn subcommand(name: &'static str) -> Subcommand {
    let cmd = Command::new(name)
        .about("Hash resource paths")
        .arg(Arg::new("raw")
            .short('r')
            .long("raw")
            .action(ArgAction::SetTrue)
            .help("Hash paths as given, don't prefix `.decl` paths"))
        .arg(Arg::new("paths")
            .value_name("path")
            .required(true)
            .num_args(1..)
            .help("Resource paths to hash"))
        ;
    (cmd, handle)
}

fn handle(matches: &ArgMatches) -> CliResult {
    let hasher: fn(&str) -> u64 = if matches.get_flag("raw") { compute_raw_path_hash } else { compute_resource_hash };
    for path in matches.get_many::<String>("paths").into_iter().flatten() {
        println!("{:x}  {}", ResourceHash::from(hasher(path)), path);
    }
    Ok(())
}

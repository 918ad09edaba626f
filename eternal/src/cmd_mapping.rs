use anyhow::Context;
use eternal_hashes::resource::ResourceHash;
use eternal_resolution::ArchiveRegistry;
use crate::cli::*;

pub fn subcommand(name: &'static str) -> Subcommand {
    let cmd = parent_command(name)
        .about("Inspect archive mapping files")
        .subcommand(
            Command::new("info")
            .about("Show mapping version and counts")
            .arg(arg_mapping())
        )
        .subcommand(
            Command::new("archives")
            .about("List archive names, with their index")
            .arg(arg_mapping())
        )
        .subcommand(
            Command::new("lookup")
            .about("List the archives of hashed resources")
            .arg(arg_mapping())
            .arg(Arg::new("hashes")
                .value_name("hash")
                .required(true)
                .num_args(1..)
                .help("Hexadecimal hash values, with or without `0x` prefix"))
        )
        ;
    (cmd, handle)
}

fn handle(matches: &ArgMatches) -> CliResult {
    match matches.subcommand() {
        Some(("info", matches)) => {
            let registry = require_registry(matches)?;
            println!("version: {}", ArchiveRegistry::VERSION);
            println!("archives: {}", registry.archive_names().len());
            println!("entries: {}", registry.len());
            Ok(())
        }
        Some(("archives", matches)) => {
            let registry = require_registry(matches)?;
            for (index, name) in registry.archive_names().iter().enumerate() {
                println!("{index:5}  {name}");
            }
            Ok(())
        }
        Some(("lookup", matches)) => {
            let registry = require_registry(matches)?;
            for value in matches.get_many::<String>("hashes").into_iter().flatten() {
                let hash = parse_hash(value)?;
                let names = registry.resolve_hash(hash);
                println!("{hash:x}  {}", if names.is_empty() { "-".to_string() } else { names.join(" ") });
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

/// Parse a hexadecimal hash value
fn parse_hash(value: &str) -> anyhow::Result<ResourceHash> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    let hash = u64::from_str_radix(digits, 16)
        .with_context(|| format!("invalid hash value: {value:?}"))?;
    Ok(hash.into())
}

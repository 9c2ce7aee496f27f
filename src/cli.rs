use crate::manifest::DEFAULT_MANIFEST;
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

pub struct Config {
    pub manifest_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub base_path: Option<PathBuf>,
    pub only: Vec<String>,
    pub verbosity: u8,
}

fn command() -> Command {
    Command::new("docsnap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Snapshots a codebase's reference files into sectioned Markdown documents")
        .arg(
            Arg::new("manifest")
                .value_name("MANIFEST")
                .help("Manifest describing the documents to generate")
                .default_value(DEFAULT_MANIFEST),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Writes documents here instead of the manifest's output_dir")
                .num_args(1),
        )
        .arg(
            Arg::new("base-path")
                .short('b')
                .long("base-path")
                .value_name("DIR")
                .help("Resolves file references against this directory")
                .num_args(1),
        )
        .arg(
            Arg::new("only")
                .long("only")
                .value_name("TITLE")
                .help("Generates only the document with this title (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increases log output (-v, -vv)")
                .action(ArgAction::Count),
        )
}

/// Parses the process arguments. Exits on `--help`, `--version` and usage errors.
pub fn parse_args() -> Config {
    from_matches(&command().get_matches())
}

pub fn parse_from<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    Ok(from_matches(&matches))
}

fn from_matches(matches: &ArgMatches) -> Config {
    let manifest_path = matches
        .get_one::<String>("manifest")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));

    let output_dir = matches.get_one::<String>("output-dir").map(PathBuf::from);
    let base_path = matches.get_one::<String>("base-path").map(PathBuf::from);

    let only = matches
        .get_many::<String>("only")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();

    Config {
        manifest_path,
        output_dir,
        base_path,
        only,
        verbosity: matches.get_count("verbose"),
    }
}

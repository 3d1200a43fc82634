//! Clap command tree.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the top-level command.
pub fn build_cli() -> Command {
    Command::new("spanscope")
        .about("Live span index viewer")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .help("Feed configuration (TOML)"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .global(true)
                .value_name("URL")
                .help("Span server base URL, overrides the config file"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print JSON instead of tables"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .subcommand(
            Command::new("history")
                .about("Fetch history from the span server and list traces")
                .arg(limit_arg()),
        )
        .subcommand(
            Command::new("replay")
                .about("Load a JSON-Lines span file and list traces")
                .arg(file_arg())
                .arg(limit_arg()),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the span tree of one trace")
                .arg(Arg::new("trace_id").required(true).value_name("TRACE_ID"))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .value_name("FILE")
                        .help("Read spans from a JSON-Lines file instead of the server"),
                ),
        )
        .subcommand(
            Command::new("tail")
                .about("Follow the live stream, printing spans as they arrive"),
        )
}

fn file_arg() -> Arg {
    Arg::new("file").required(true).value_name("FILE")
}

fn limit_arg() -> Arg {
    Arg::new("limit")
        .long("limit")
        .short('n')
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Show at most N traces")
}

//! ArgMatches → CliAction conversion.

use std::path::PathBuf;

use clap::ArgMatches;
use spanscope_feed::FeedConfig;

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// List traces from the server's history endpoint.
    History { limit: Option<usize> },
    /// List traces from a JSON-Lines file.
    Replay { file: PathBuf, limit: Option<usize> },
    /// Print one trace's span tree, from a file or the server.
    Tree {
        trace_id: String,
        file: Option<PathBuf>,
    },
    /// Follow the live stream.
    Tail,
}

/// Convert clap ArgMatches into a CliAction.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    let (sub_name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command provided".to_string())?;

    match sub_name {
        "history" => Ok(CliAction::History {
            limit: sub.get_one::<usize>("limit").copied(),
        }),
        "replay" => Ok(CliAction::Replay {
            file: required_path(sub, "file")?,
            limit: sub.get_one::<usize>("limit").copied(),
        }),
        "tree" => Ok(CliAction::Tree {
            trace_id: sub
                .get_one::<String>("trace_id")
                .cloned()
                .ok_or_else(|| "Missing TRACE_ID".to_string())?,
            file: sub.get_one::<String>("file").map(PathBuf::from),
        }),
        "tail" => Ok(CliAction::Tail),
        other => Err(format!("Unknown command: {}", other)),
    }
}

/// Resolve feed configuration: config file first, then `--url`.
pub fn feed_config(matches: &ArgMatches) -> Result<FeedConfig, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => FeedConfig::load(path).map_err(|e| format!("{}: {}", path, e))?,
        None => FeedConfig::default(),
    };
    if let Some(url) = matches.get_one::<String>("url") {
        config = config.with_base_url(url.clone());
        config.validate().map_err(|e| e.to_string())?;
    }
    Ok(config)
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf, String> {
    matches
        .get_one::<String>(id)
        .map(PathBuf::from)
        .ok_or_else(|| format!("Missing {}", id.to_uppercase()))
}

//! spanscope CLI, a terminal viewer for a live span server.
//!
//! Three ways to fill the index:
//! - **history**: one fetch from `/api/spans/history`
//! - **replay**: a JSON-Lines file written by the producer's file exporter
//! - **tail**: the live `/api/spans/stream`, reconnecting on failure
//!
//! `tree` prints one trace from either the server or a file.

mod commands;
mod format;
mod parse;

use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::ArgMatches;
use spanscope_core::HistorySource;
use spanscope_feed::{FeedConfig, HttpHistory, JsonLinesHistory, LiveFeed, StreamClient};
use spanscope_index::{IndexChange, SpanIndex};
use tracing::Level;

use commands::build_cli;
use format::{format_error, format_live_span, format_traces, format_tree, OutputMode};
use parse::{feed_config, matches_to_action, CliAction};

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let exit_code = match run(&matches, mode) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", format_error(&format!("{:#}", e)));
            1
        }
    };
    process::exit(exit_code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches, mode: OutputMode) -> anyhow::Result<()> {
    let action = matches_to_action(matches).map_err(anyhow::Error::msg)?;
    let config = feed_config(matches).map_err(anyhow::Error::msg)?;

    match action {
        CliAction::History { limit } => {
            let index = load(&HttpHistory::new(&config))?;
            println!("{}", format_traces(&index.snapshot(), limit, mode));
        }
        CliAction::Replay { file, limit } => {
            let index = load(&JsonLinesHistory::new(file))?;
            println!("{}", format_traces(&index.snapshot(), limit, mode));
        }
        CliAction::Tree { trace_id, file } => {
            let index = match file {
                Some(file) => load(&JsonLinesHistory::new(file))?,
                None => load(&HttpHistory::new(&config))?,
            };
            match format_tree(&index.snapshot(), &trace_id, mode) {
                Some(tree) => println!("{}", tree),
                None => bail!("trace {} not found", trace_id),
            }
        }
        CliAction::Tail => tail(config, mode),
    }
    Ok(())
}

/// Fetch once into a fresh index; a failed fetch is an error here.
fn load(source: &dyn HistorySource) -> anyhow::Result<SpanIndex> {
    let spans = source
        .fetch()
        .with_context(|| format!("failed to load {}", source.describe()))?;
    let index = SpanIndex::builder().span_capacity(spans.len()).build();
    index.ingest_batch(spans);
    Ok(index)
}

fn tail(config: FeedConfig, mode: OutputMode) {
    let index = Arc::new(SpanIndex::new());

    // Weak: the index owns this listener
    let printer = Arc::downgrade(&index);
    index.subscribe(move |change| match change {
        IndexChange::Ingested { span_id, .. } => {
            let Some(index) = printer.upgrade() else { return };
            if let Some(span) = index.snapshot().span(span_id) {
                println!("{}", format_live_span(span, mode));
            }
        }
        IndexChange::Reloaded { spans, .. } => {
            eprintln!("(loaded {} historical spans)", spans);
        }
        _ => {}
    });

    let feed = LiveFeed::new(Arc::clone(&index));
    let stop = AtomicBool::new(false);
    eprintln!("Following {}", config.stream_url());
    StreamClient::new(config).run(&feed, &stop);
}

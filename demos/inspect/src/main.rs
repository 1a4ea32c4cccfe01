//! Inspect Example
//!
//! Reads raw message records, one JSON object per line, decodes them with the
//! MTProto resolvers and prints what the configured routes make of each one.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package inspect -- updates.jsonl --config tidings.toml --extended
//! cat updates.jsonl | cargo run --package inspect
//! ```
//!
//! Each record produces one JSON line on stdout:
//!
//! ```text
//! {"args":[""],"command":"start","event":"message","html":"/start","id":10,"line":1,"media":null,"routes":{"start":null}}
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value, json};
use tidings::prelude::*;
use tidings::runtime::config::{self, LogOutput};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "inspect", about = "Decode records and show matching routes")]
struct Args {
    /// JSON-lines input; reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Configuration file; otherwise the default search paths are used.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Configuration profile.
    #[arg(long)]
    profile: Option<String>,

    /// Render spoilers, custom emoji and user mentions.
    #[arg(long)]
    extended: bool,

    /// Stop at the first record that fails to decode.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load(&args)?;
    // stdout carries the report
    if config.logging.output == LogOutput::Stdout {
        config.logging.output = LogOutput::Stderr;
    }
    logging::init_from_config(&config.logging);

    let pipeline = Pipeline::from_config(&config, mtproto_decoder(), &FilterRegistry::default())
        .context("failed to build routes")?;
    info!(routes = pipeline.routes().len(), "Inspecting records");

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };

    let (mut decoded, mut failed) = (0usize, 0usize);
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;

        match pipeline.process_str(&line) {
            Ok(routed) => {
                decoded += 1;
                println!("{}", report(number, &routed, args.extended));
            }
            Err(err) if args.strict => {
                return Err(err).with_context(|| format!("line {number}"));
            }
            Err(err) => {
                failed += 1;
                warn!(line = number, error = %err, "Skipping record");
            }
        }
    }

    info!(decoded, failed, "Done");
    Ok(())
}

fn load(args: &Args) -> Result<TidingsConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let config = loader.load().context("failed to load configuration")?;
    config::validate_config(&config).context("invalid configuration")?;
    Ok(config)
}

fn report(line: usize, routed: &Routed, extended: bool) -> Value {
    let routes: Map<String, Value> = routed
        .matched
        .iter()
        .map(|(name, matched)| (name.clone(), json!(matched.matches())))
        .collect();

    let mut out = json!({
        "line": line,
        "event": routed.event.event_name(),
        "id": routed.event.id(),
        "routes": routes,
    });

    match routed.event.as_ref() {
        Event::Message(msg) => {
            out["command"] = json!(msg.command());
            out["args"] = json!(msg.command_args());
            out["media"] = json!(msg.media_kind().map(|kind| kind.as_str()));
            out["html"] = json!(msg.html(extended));
            if let Some(fwd) = msg.forwarded_info() {
                out["forwarded_from"] = json!(fwd.origin_label());
            }
        }
        Event::Service(svc) => {
            out["action"] = json!(svc.action.short_kind());
        }
    }
    out
}

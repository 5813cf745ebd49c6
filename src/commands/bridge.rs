use anyhow::Result;
use std::io;

use crate::commands::{CommandReport, open_client, open_store};
use crate::summary::bridge::Bridge;
use crate::summary::framing::{Framing, serve};
use crate::summary::paths::resolve_paths;

#[derive(Debug, Clone, Default)]
pub struct BridgeOptions {
    pub jsonl: bool,
}

pub fn run(opts: &BridgeOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let store = open_store(&paths);
    let client = open_client()?;
    let mut bridge = Bridge::new(&store, &client).with_audit(paths);

    let framing = if opts.jsonl {
        Framing::JsonLines
    } else {
        Framing::Native
    };
    tracing::info!(?framing, "bridge listening on stdin");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let handled = serve(&mut bridge, framing, stdin.lock(), stdout.lock())?;

    let mut report = CommandReport::new("bridge");
    report.detail(format!("requests_handled={handled}"));
    Ok(report)
}

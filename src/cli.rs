use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use crate::commands::{self, CommandReport};

#[derive(Debug, Parser)]
#[command(
    name = "readeck-sum",
    version,
    about = "AI summaries for Readeck articles: chunked summarization, settings, and a native-messaging bridge"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Summarize article text from a file or stdin.
    Summarize(SummarizeArgs),
    /// Read or change stored settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Serve extension messages over stdin/stdout until EOF.
    Bridge(BridgeArgs),
    /// Show resolved paths, settings, and environment overrides.
    Status(JsonFlag),
}

#[derive(Debug, Args)]
struct SummarizeArgs {
    /// Article text file; reads stdin when omitted or `-`.
    #[arg(long)]
    file: Option<String>,
    #[arg(long)]
    title: Option<String>,
    /// `concise` or `detailed`.
    #[arg(long)]
    style: Option<String>,
    #[arg(long)]
    bullets: bool,
    /// Print the bridge response shape instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show(JsonFlag),
    Set(ConfigSetArgs),
    /// Remove the stored API key.
    ClearKey(JsonFlag),
}

#[derive(Debug, Args)]
struct ConfigSetArgs {
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    model: Option<String>,
    /// `short`, `medium`, or `long`.
    #[arg(long)]
    length: Option<String>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct BridgeArgs {
    /// Newline-delimited JSON instead of length-prefixed frames.
    #[arg(long)]
    jsonl: bool,
}

#[derive(Debug, Args)]
struct JsonFlag {
    #[arg(long)]
    json: bool,
}

fn render_report(report: &CommandReport, as_json: bool) -> Result<String> {
    if as_json {
        return Ok(serde_json::to_string_pretty(report)?);
    }
    let mut out = format!(
        "{}: {}\n",
        report.command,
        if report.ok { "ok" } else { "failed" }
    );
    for detail in &report.details {
        out.push_str(&format!("  {detail}\n"));
    }
    for issue in &report.issues {
        out.push_str(&format!("  issue: {issue}\n"));
    }
    Ok(out)
}

fn finish(report: CommandReport, as_json: bool) -> Result<()> {
    print!("{}", render_report(&report, as_json)?);
    if as_json {
        println!();
    }
    if !report.ok {
        anyhow::bail!("{} reported {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Summarize(args) => {
            let result = commands::summarize::run(&commands::summarize::SummarizeOptions {
                file: args.file,
                title: args.title,
                style: args.style,
                bullets: args.bullets,
            })?;
            if args.json {
                let mut body = serde_json::to_value(&result)?;
                if let Some(map) = body.as_object_mut() {
                    map.insert("ok".to_string(), json!(true));
                }
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                let summary = result.summary.trim();
                if summary.is_empty() {
                    println!("No summary returned.");
                } else {
                    println!("{summary}");
                }
                println!();
                println!("{}", commands::summarize::meta_line(&result));
            }
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Show(flag) => finish(commands::config::show()?, flag.json),
            ConfigAction::Set(args) => finish(
                commands::config::set(&commands::config::ConfigSetOptions {
                    api_key: args.api_key,
                    model: args.model,
                    length: args.length,
                })?,
                args.json,
            ),
            ConfigAction::ClearKey(flag) => finish(commands::config::clear_key()?, flag.json),
        },
        Command::Bridge(args) => {
            let report =
                commands::bridge::run(&commands::bridge::BridgeOptions { jsonl: args.jsonl })?;
            // stdout belongs to the message stream
            eprint!("{}", render_report(&report, false)?);
            Ok(())
        }
        Command::Status(flag) => finish(commands::status::run()?, flag.json),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, render_report};
    use crate::commands::CommandReport;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_config_set_flags() {
        let cli = Cli::try_parse_from([
            "readeck-sum",
            "config",
            "set",
            "--api-key",
            "sk-1",
            "--length",
            "long",
        ])
        .expect("parse");
        assert!(format!("{cli:?}").contains("sk-1"));
    }

    #[test]
    fn text_report_lists_details_and_issues() {
        let mut report = CommandReport::new("status");
        report.detail("model=gpt-5-nano");
        report.issue("no API key configured");
        let text = render_report(&report, false).expect("render");
        assert_eq!(
            text,
            "status: failed\n  model=gpt-5-nano\n  issue: no API key configured\n"
        );
    }
}

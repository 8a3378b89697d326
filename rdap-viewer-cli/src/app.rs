//! 命令执行
//!
//! One-shot lookup, the interactive loop, and the `config` subcommands.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rdap_viewer_toolbox::{
    FileExporter, LookupResult, LookupSession, RdapClient, RdapError, ReportExporter,
    format_json, format_report, suggested_filename,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::{ConfigAction, LookupArgs};
use crate::config::{AppConfig, ConfigService};

const INTERACTIVE_HELP: &str = "\
Enter a domain name to look it up.
  :save [FILE]  save the last report (default: its suggested name)
  :json         print the last result as JSON
  :clear        forget the last result
  :help         show this help
  :quit         exit";

/// Expected failures (bad input, unknown domain) are warnings; the rest are errors.
fn log_lookup_error(domain: &str, error: &RdapError) {
    if error.is_expected() {
        tracing::warn!("Lookup of {domain} failed: {error}");
    } else {
        tracing::error!("Lookup of {domain} failed: {error}");
    }
}

/// Rendered output and its suggested filename.
fn render(result: &LookupResult, domain: &str, json: bool, config: &AppConfig) -> Result<(String, String)> {
    if json {
        Ok((format_json(result)?, suggested_filename(domain, "json")))
    } else {
        let report = format_report(result, domain, &config.format_options());
        Ok((report.text, report.filename))
    }
}

/// Where `lookup --save/--output` writes, if anywhere.
fn export_target(config: &AppConfig, args: &LookupArgs, suggested: &str) -> Option<(FileExporter, String)> {
    if let Some(output) = &args.output {
        // `out/` or an existing directory: save there under the suggested name.
        if names_directory(output) {
            return Some((FileExporter::new(output), suggested.to_string()));
        }
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let name = output
            .file_name()
            .map_or_else(|| suggested.to_string(), |n| n.to_string_lossy().into_owned());
        return Some((FileExporter::new(dir), name));
    }
    args.save
        .then(|| (FileExporter::new(&config.output_dir), suggested.to_string()))
}

fn names_directory(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
        || path.is_dir()
}

/// `rdap-viewer lookup`: print the report (or JSON) and optionally save it.
pub async fn lookup<W: Write>(
    client: &RdapClient,
    config: &AppConfig,
    args: &LookupArgs,
    out: &mut W,
) -> Result<Option<PathBuf>> {
    let domain = args.domain.trim();
    let result = client.lookup(domain).await.inspect_err(|e| log_lookup_error(domain, e))?;

    let (body, filename) = render(&result, domain, args.json, config)?;
    out.write_all(body.as_bytes())?;
    out.flush()?;

    let Some((exporter, name)) = export_target(config, args, &filename) else {
        return Ok(None);
    };
    let path = exporter.export(&name, body.as_bytes())?;
    Ok(Some(path))
}

/// A line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lookup(String),
    Save(Option<String>),
    Json,
    Clear,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return if line.is_empty() {
            Command::Empty
        } else {
            Command::Lookup(line.to_string())
        };
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match name {
        "save" | "s" => Command::Save(arg.map(str::to_string)),
        "json" | "j" => Command::Json,
        "clear" | "c" => Command::Clear,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// `rdap-viewer interactive`: one lookup per input line until `:quit` or EOF.
pub async fn interactive<R, W>(
    client: &RdapClient,
    session: &mut LookupSession,
    exporter: &dyn ReportExporter,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{INTERACTIVE_HELP}")?;

    loop {
        write!(out, "rdap> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            writeln!(out)?;
            break;
        };

        match parse_command(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Help => writeln!(out, "{INTERACTIVE_HELP}")?,
            Command::Clear => session.clear(),
            Command::Unknown(name) => {
                writeln!(out, "Unknown command :{name} (try :help)")?;
            }
            Command::Lookup(domain) => {
                if let Err(e) = session.begin(&domain) {
                    writeln!(out, "Error: {e}")?;
                    continue;
                }
                let outcome = client.lookup(&domain).await;
                if let Err(e) = &outcome {
                    log_lookup_error(&domain, e);
                }
                session.finish(&outcome);

                match (&session.report, &session.error) {
                    (Some(report), _) => write!(out, "{}", report.text)?,
                    (None, Some(error)) => writeln!(out, "Error: {error}")?,
                    (None, None) => {}
                }
            }
            Command::Save(name) => {
                let Some(report) = &session.report else {
                    writeln!(out, "Nothing to save yet")?;
                    continue;
                };
                let name = name.unwrap_or_else(|| report.filename.clone());
                match exporter.export(&name, report.text.as_bytes()) {
                    Ok(path) => writeln!(out, "Saved {}", path.display())?,
                    Err(e) => writeln!(out, "Error: {e}")?,
                }
            }
            Command::Json => match &session.result {
                Some(result) => write!(out, "{}", format_json(result)?)?,
                None => writeln!(out, "Nothing to show yet")?,
            },
        }
    }

    Ok(())
}

/// `rdap-viewer config ...`
pub fn config_command<W: Write>(
    service: &dyn ConfigService,
    effective: &AppConfig,
    action: &ConfigAction,
    out: &mut W,
) -> Result<()> {
    match action {
        ConfigAction::Show => writeln!(out, "{}", serde_json::to_string_pretty(effective)?)?,
        ConfigAction::Path => writeln!(out, "{}", service.path().display())?,
        ConfigAction::Init { force } => {
            service.save(&AppConfig::default(), *force)?;
            writeln!(out, "Wrote {}", service.path().display())?;
        }
    }
    Ok(())
}

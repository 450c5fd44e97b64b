//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

use crate::devices::DeviceDraft;

/// Parsed command line.
#[derive(Debug)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub command: Command,
}

/// Subcommand to run against the registry.
#[derive(Debug, PartialEq)]
pub enum Command {
    List { location: Option<String> },
    Add(DeviceDraft),
    Remove { name: String },
    Clear,
    Stats,
    Leaderboard,
    Export { out: PathBuf },
    #[cfg(feature = "api")]
    Serve { bind: Option<String> },
    Help,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut config = None;
    let mut store = None;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args
                    .next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--store" => {
                i += 1;
                let path = args
                    .next_or_err(i, "missing value for --store (expected a JSON file path)")?;
                if store.replace(PathBuf::from(path)).is_some() {
                    return Err("--store provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                return Ok(CliOptions {
                    config,
                    store,
                    command: Command::Help,
                });
            }
            _ => break,
        }
        i += 1;
    }

    let Some(name) = args.get(i) else {
        return Err("missing command (try --help)".to_string());
    };
    let rest = &args[i + 1..];
    let command = match name.as_str() {
        "list" => parse_list(rest)?,
        "add" => parse_add(rest)?,
        "remove" => parse_remove(rest)?,
        "clear" => no_args(rest, Command::Clear)?,
        "stats" => no_args(rest, Command::Stats)?,
        "leaderboard" => no_args(rest, Command::Leaderboard)?,
        "export" => parse_export(rest)?,
        #[cfg(feature = "api")]
        "serve" => parse_serve(rest)?,
        "help" => Command::Help,
        other => return Err(format!("unknown command: {other}")),
    };

    Ok(CliOptions {
        config,
        store,
        command,
    })
}

fn no_args(args: &[String], command: Command) -> Result<Command, String> {
    match args.first() {
        Some(extra) => Err(format!("unexpected argument: {extra}")),
        None => Ok(command),
    }
}

fn parse_list(args: &[String]) -> Result<Command, String> {
    let mut location = None;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--location" => {
                i += 1;
                let value = args.next_or_err(i, "missing value for --location")?;
                if location.replace(value.to_string()).is_some() {
                    return Err("--location provided more than once".to_string());
                }
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(Command::List { location })
}

fn parse_add(args: &[String]) -> Result<Command, String> {
    let mut name = None;
    let mut consumption = None;
    let mut location = None;
    let mut energy_source = None;
    let mut usage_time = None;

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let slot = match flag {
            "--name" => &mut name,
            "--consumption" => &mut consumption,
            "--location" => &mut location,
            "--energy-source" => &mut energy_source,
            "--usage-time" => &mut usage_time,
            other => return Err(format!("unknown argument: {other}")),
        };
        i += 1;
        let value = args.next_or_err(i, &format!("missing value for {flag}"))?;
        if slot.replace(value.to_string()).is_some() {
            return Err(format!("{flag} provided more than once"));
        }
        i += 1;
    }

    let name = name.ok_or("add requires --name")?;
    let consumption = consumption.ok_or("add requires --consumption")?;
    let location = location.ok_or("add requires --location")?;

    let mut draft = DeviceDraft::new(name, consumption, location);
    if let Some(source) = energy_source {
        draft = draft.energy_source(source);
    }
    if let Some(hours) = usage_time {
        draft = draft.usage_time(hours);
    }
    Ok(Command::Add(draft))
}

fn parse_remove(args: &[String]) -> Result<Command, String> {
    match args {
        [name] => Ok(Command::Remove { name: name.clone() }),
        [] => Err("remove requires a device name".to_string()),
        [_, extra, ..] => Err(format!("unexpected argument: {extra}")),
    }
}

fn parse_export(args: &[String]) -> Result<Command, String> {
    match args {
        [flag, path] if flag == "--out" => Ok(Command::Export {
            out: PathBuf::from(path),
        }),
        _ => Err("usage: export --out <path>".to_string()),
    }
}

#[cfg(feature = "api")]
fn parse_serve(args: &[String]) -> Result<Command, String> {
    match args {
        [] => Ok(Command::Serve { bind: None }),
        [flag, addr] if flag == "--bind" => Ok(Command::Serve {
            bind: Some(addr.clone()),
        }),
        _ => Err("usage: serve [--bind <addr>]".to_string()),
    }
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("energy-tracker: household device registry and usage statistics");
    eprintln!();
    eprintln!("Usage: energy-tracker [--config <path>] [--store <path>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list [--location <text>]          List devices, optionally by location");
    eprintln!("  add --name <n> --consumption <kwh> --location <loc>");
    eprintln!("      [--energy-source <s>] [--usage-time <h>]");
    eprintln!("                                    Register a device");
    eprintln!("  remove <name>                     Remove a device");
    eprintln!("  clear                             Remove every device");
    eprintln!("  stats                             Print usage statistics");
    eprintln!("  leaderboard                       Rank devices by consumption");
    eprintln!("  export --out <path>               Write devices to CSV");
    #[cfg(feature = "api")]
    eprintln!("  serve [--bind <addr>]             Start the REST API");
}

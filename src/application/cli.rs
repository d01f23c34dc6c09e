#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::Local;
use chrono::NaiveDate;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::format_query_date;
use crate::domain::models::LogSnapshot;
use crate::domain::models::SessionIdSet;
use crate::domain::services::actions::help_text;
use crate::infrastructure::monitors::MonitorManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

/// Accepts dates in ISO `YYYY-MM-DD` form only.
pub fn parse_date(val: &str) -> Result<NaiveDate, String> {
    return NaiveDate::parse_from_str(val, "%Y-%m-%d")
        .map_err(|err| return format!("'{val}' is not a YYYY-MM-DD date: {err}"));
}

pub fn log_path() -> path::PathBuf {
    return dirs::cache_dir()
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("octavio-dash/debug.log");
}

async fn print_instruments() -> Result<()> {
    let text = MonitorManager::get()?.fetch_instruments().await?;
    println!("{text}");

    return Ok(());
}

async fn print_log(date: NaiveDate) -> Result<()> {
    let body = MonitorManager::get()?.fetch_log(date).await?;
    let snapshot = LogSnapshot::parse(date, &body)?;

    println!("Date: {}", format_query_date(date));
    if snapshot.is_empty() {
        println!("No events were logged on this day.");
        return Ok(());
    }

    let session_ids = SessionIdSet::from_snapshot(&snapshot);
    println!(
        "{} events, {} sessions with new chunks",
        snapshot.records.len(),
        session_ids.len()
    );
    println!("{session_ids}");
    println!("\n{}", snapshot.body);

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for octavio-dash")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running with environment variable RUST_LOG=octavio_dash")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_logs() -> Command {
    return Command::new("logs")
        .about("Fetch the log for one day and print its ADD_CHUNK sessions followed by the raw log.")
        .arg(
            Arg::new("date")
                .short('d')
                .long("date")
                .num_args(1)
                .help("Day to fetch, as YYYY-MM-DD. Defaults to today.")
                .value_parser(parse_date),
        );
}

pub fn build() -> Command {
    let hotkeys_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("HOTKEYS:") {
                return Paint::new(format!("DASHBOARD {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nBuilt: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_BUILD_DATE")
    );

    return Command::new("octavio-dash")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(hotkeys_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("dashboard").about("Start the dashboard. This is the default when no command is given."))
        .subcommand(Command::new("instruments").about("Fetch the online instruments once and print them."))
        .subcommand(subcommand_logs())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("OCTAVIO_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::PollInterval.to_string())
                .long(ConfigKey::PollInterval.to_string())
                .env("OCTAVIO_POLL_INTERVAL")
                .num_args(1)
                .help(format!("Seconds between polls of the online instruments endpoint. [default: {}]", Config::default(ConfigKey::PollInterval)))
                .value_parser(value_parser!(u64).range(1..))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("OCTAVIO_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Milliseconds to wait for the server before marking a fetch as failed. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .value_parser(value_parser!(u64).range(1..))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ServerURL.to_string())
                .short('u')
                .long(ConfigKey::ServerURL.to_string())
                .env("OCTAVIO_SERVER_URL")
                .num_args(1)
                .help(format!("Origin of the Octavio server used for both the instruments and log endpoints. [default: {}]", Config::default(ConfigKey::ServerURL)))
                .global(true),
        );
}

/// Handles one-shot commands. Returns true when the dashboard should start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("dashboard", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        Some(("instruments", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            print_instruments().await?;
            return Ok(false);
        }
        Some(("logs", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            let date = subcmd_matches
                .get_one::<NaiveDate>("date")
                .copied()
                .unwrap_or_else(|| return Local::now().date_naive());
            print_log(date).await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}

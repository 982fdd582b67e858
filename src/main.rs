mod app;
mod calendar;
mod clock;
mod config;
mod editor;
mod help;
mod jumpto;
mod logging;
mod store;
mod theme;
mod view;
mod worker;
use crate::app::App;
use crate::calendar::MonthCursor;
use crate::clock::Clock;
use crate::config::{CliArgs, Config};
use crate::worker::StoreWorker;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use lexopt::{Arg, Parser, ValueExt};
use log::{info, warn};
use ratatui::DefaultTerminal;
use std::io::stdout;
use time::{format_description::FormatItem, macros::format_description, Date, UtcOffset};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(CliArgs),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = CliArgs::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("url") => args.url = Some(parser.value()?.string()?),
                Arg::Long("api-key") => args.api_key = Some(parser.value()?.string()?),
                Arg::Long("table") => args.table = Some(parser.value()?.string()?),
                Arg::Long("file") => args.file = Some(parser.value()?.into()),
                Arg::Long("scratch") => args.scratch = true,
                Arg::Long("log-dir") => args.log_dir = Some(parser.value()?.into()),
                Arg::Long("log-level") => args.log_level = Some(parser.value()?.string()?),
                Arg::Value(value) if args.date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => match MonthCursor::new(d.year(), d.month()) {
                            Ok(_) => args.date = Some(d),
                            Err(e) => {
                                return Err(lexopt::Error::ParsingFailed {
                                    value,
                                    error: Box::new(e),
                                })
                            }
                        },
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(args) => {
                // Must happen while this is still the only thread
                let offset = UtcOffset::current_local_offset()
                    .context("failed to determine local time zone offset")?;
                let clock = Clock::Local(offset);
                let config = Config::resolve(args, |name| std::env::var(name).ok())?;
                let _logger = logging::init(&config.log)?;
                info!("event=store_open backend={}", config.backend.describe());
                let store = config
                    .backend
                    .open()
                    .context("failed to set up notes store")?;
                let worker = StoreWorker::spawn(store).context("failed to start notes worker")?;
                let start = config.start.unwrap_or_else(|| clock.today());
                let app = App::new(worker, clock, start);
                let worker = with_terminal(|mut terminal| Ok(app.run(&mut terminal)?))?;
                // Finish queued saves only once the terminal is back to normal
                drop(worker);
                Ok(())
            }
            Command::Help => {
                println!("Usage: notecal [options] [YYYY-MM-DD]");
                println!();
                println!("Terminal month calendar with per-day notes kept in a remote notes table");
                println!();
                println!("Options:");
                println!("  --url URL           Base URL of the notes service [env: NOTECAL_URL]");
                println!("  --api-key KEY       API key for the notes service [env: NOTECAL_API_KEY]");
                println!("  --table NAME        Notes table name (default: calendar_notes) [env: NOTECAL_TABLE]");
                println!("  --file PATH         Keep notes in a local JSON file instead [env: NOTECAL_FILE]");
                println!("  --scratch           Keep notes in memory only; nothing is saved");
                println!("  --log-dir DIR       Directory for log files [env: NOTECAL_LOG_DIR]");
                println!("  --log-level SPEC    Log level (default: info) [env: NOTECAL_LOG]");
                println!("  -h, --help          Display this help message and exit");
                println!("  -V, --version       Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = crossterm::execute!(stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    if let Err(e) = crossterm::execute!(stdout(), DisableMouseCapture) {
        warn!("event=mouse_release_failed error={e}");
    }
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("notecal").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(CliArgs::default()));
    }

    #[test]
    fn test_date() {
        assert_eq!(
            parse(&["2024-02-29"]).unwrap(),
            Command::Run(CliArgs {
                date: Some(date!(2024 - 02 - 29)),
                ..CliArgs::default()
            })
        );
    }

    #[test]
    fn test_bad_date() {
        assert!(parse(&["2023-02-29"]).is_err());
        assert!(parse(&["2024-3-5"]).is_err());
    }

    #[test]
    fn test_date_out_of_range() {
        assert!(parse(&["--", "-0001-12-01"]).is_err());
        assert_eq!(
            parse(&["0000-01-01"]).unwrap(),
            Command::Run(CliArgs {
                date: Some(date!(0000 - 01 - 01)),
                ..CliArgs::default()
            })
        );
    }

    #[test]
    fn test_two_dates() {
        assert!(parse(&["2024-02-29", "2024-03-01"]).is_err());
    }

    #[test]
    fn test_options() {
        assert_eq!(
            parse(&[
                "--url",
                "https://db.example.com",
                "--api-key=secret",
                "--table",
                "notes",
                "--log-level",
                "debug",
                "--log-dir",
                "/tmp/logs",
                "2024-03-05",
            ])
            .unwrap(),
            Command::Run(CliArgs {
                url: Some(String::from("https://db.example.com")),
                api_key: Some(String::from("secret")),
                table: Some(String::from("notes")),
                log_dir: Some(std::path::PathBuf::from("/tmp/logs")),
                log_level: Some(String::from("debug")),
                date: Some(date!(2024 - 03 - 05)),
                ..CliArgs::default()
            })
        );
    }

    #[test]
    fn test_file_and_scratch() {
        assert_eq!(
            parse(&["--file", "notes.json", "--scratch"]).unwrap(),
            Command::Run(CliArgs {
                file: Some(std::path::PathBuf::from("notes.json")),
                scratch: true,
                ..CliArgs::default()
            })
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
        assert_eq!(parse(&["2024-01-01", "-h"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_unknown_option() {
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["--url"]).is_err());
    }
}

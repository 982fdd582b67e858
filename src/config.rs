use crate::store::{FileStore, MemoryStore, NotesStore, RestStore, StoreError};
use std::path::PathBuf;
use thiserror::Error;
use time::Date;

pub(crate) const DEFAULT_TABLE: &str = "calendar_notes";

pub(crate) const DEFAULT_LOG_LEVEL: &str = "info";

const APP_DIR: &str = "notecal";

const NOTES_FILE: &str = "notes.json";

pub(crate) const URL_VAR: &str = "NOTECAL_URL";
pub(crate) const API_KEY_VAR: &str = "NOTECAL_API_KEY";
pub(crate) const TABLE_VAR: &str = "NOTECAL_TABLE";
pub(crate) const FILE_VAR: &str = "NOTECAL_FILE";
pub(crate) const LOG_DIR_VAR: &str = "NOTECAL_LOG_DIR";
pub(crate) const LOG_VAR: &str = "NOTECAL_LOG";

/// Options given on the command line.  Anything left unset here falls back
/// to the environment and then to the defaults.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct CliArgs {
    pub(crate) url: Option<String>,
    pub(crate) api_key: Option<String>,
    pub(crate) table: Option<String>,
    pub(crate) file: Option<PathBuf>,
    pub(crate) scratch: bool,
    pub(crate) log_dir: Option<PathBuf>,
    pub(crate) log_level: Option<String>,
    pub(crate) date: Option<Date>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RestConfig {
    pub(crate) url: String,
    pub(crate) api_key: Option<String>,
    pub(crate) table: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Backend {
    Rest(RestConfig),
    File(PathBuf),
    Scratch,
}

impl Backend {
    pub(crate) fn open(&self) -> Result<Box<dyn NotesStore>, StoreError> {
        Ok(match self {
            Backend::Rest(config) => Box::new(RestStore::new(config)?),
            Backend::File(path) => Box::new(FileStore::new(path.clone())),
            Backend::Scratch => Box::new(MemoryStore::new()),
        })
    }

    /// Short description for log lines.  Never includes the API key.
    pub(crate) fn describe(&self) -> String {
        match self {
            Backend::Rest(config) => format!("rest url={} table={}", config.url, config.table),
            Backend::File(path) => format!("file path={}", path.display()),
            Backend::Scratch => String::from("scratch"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LogConfig {
    /// `None` if no log directory could be determined, in which case logging
    /// is off
    pub(crate) dir: Option<PathBuf>,
    pub(crate) level: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Config {
    pub(crate) backend: Backend,
    pub(crate) log: LogConfig,
    pub(crate) start: Option<Date>,
}

impl Config {
    /// Merges `args` over the variables looked up with `env` over the
    /// defaults.  Variables set to the empty string count as unset.
    pub(crate) fn resolve<F>(args: CliArgs, env: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|s| !s.is_empty());
        let url = args.url.or_else(|| var(URL_VAR));
        let api_key = args.api_key.or_else(|| var(API_KEY_VAR));
        let backend = if args.scratch {
            Backend::Scratch
        } else if let Some(url) = url {
            let url = url.trim_end_matches('/').to_owned();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::BadUrl(url));
            }
            let table = args
                .table
                .or_else(|| var(TABLE_VAR))
                .unwrap_or_else(|| String::from(DEFAULT_TABLE));
            Backend::Rest(RestConfig {
                url,
                api_key,
                table,
            })
        } else if api_key.is_some() {
            return Err(ConfigError::KeyWithoutUrl);
        } else {
            let path = match args.file.or_else(|| var(FILE_VAR).map(PathBuf::from)) {
                Some(p) => p,
                None => dirs::data_dir()
                    .ok_or(ConfigError::NoDataDir)?
                    .join(APP_DIR)
                    .join(NOTES_FILE),
            };
            Backend::File(path)
        };
        let log = LogConfig {
            dir: args
                .log_dir
                .or_else(|| var(LOG_DIR_VAR).map(PathBuf::from))
                .or_else(|| dirs::cache_dir().map(|d| d.join(APP_DIR))),
            level: args
                .log_level
                .or_else(|| var(LOG_VAR))
                .unwrap_or_else(|| String::from(DEFAULT_LOG_LEVEL)),
        };
        Ok(Config {
            backend,
            log,
            start: args.date,
        })
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("an API key was given but no notes service URL; set --url or {URL_VAR}")]
    KeyWithoutUrl,
    #[error("could not determine a data directory for the notes file; set --file or {FILE_VAR}")]
    NoDataDir,
    #[error("notes service URL must start with http:// or https://: {0:?}")]
    BadUrl(String),
}

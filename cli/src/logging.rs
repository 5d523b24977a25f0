use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use webmarks::error::Result;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// `RUST_LOG` is set and owns the filter
    pub from_env: bool,
    /// `--debug` was passed
    pub debug: bool,
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    pub fn new(debug: bool, log_file: Option<PathBuf>) -> Self {
        Self {
            from_env: std::env::var_os("RUST_LOG").is_some(),
            debug,
            log_file,
        }
    }
}

/// Level used before the store's settings are known
pub fn initial_level(opts: &LogOptions) -> LevelFilter {
    if opts.debug || opts.log_file.is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Level once the `debugLogs` setting has been read.
///
/// The setting only matters for a log file; the terminal stays at warnings
/// unless `--debug` is passed.
pub fn settled_level(opts: &LogOptions, debug_logs: bool) -> LevelFilter {
    match (opts.debug, opts.log_file.is_some(), debug_logs) {
        (true, _, _) => LevelFilter::Debug,
        (false, true, true) => LevelFilter::Debug,
        (false, true, false) => LevelFilter::Info,
        (false, false, _) => LevelFilter::Warn,
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

pub fn init(opts: &LogOptions) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    if opts.from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(initial_level(opts));
    }

    if let Some(path) = &opts.log_file {
        let file = open_log_file(path)?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }

    // Ignore errors initializing the logger if something configured it first
    let _ = builder.try_init();
    Ok(())
}

/// Apply the `debugLogs` setting unless `RUST_LOG` is in charge
pub fn settle(opts: &LogOptions, debug_logs: bool) {
    if !opts.from_env {
        log::set_max_level(settled_level(opts, debug_logs));
    }
}

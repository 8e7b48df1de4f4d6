//! Logger setup for shell_app.
//!
//! File output goes to `./shell.log` in the current working directory.

use std::path::PathBuf;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use shell_logging::LogDestination;

const LOG_FILE: &str = "./shell.log";

/// Where the host writes its log, as named in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl LogTarget {
    fn destination(self) -> LogDestination {
        match self {
            LogTarget::File => LogDestination::File(PathBuf::from(LOG_FILE)),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(PathBuf::from(LOG_FILE)),
        }
    }
}

pub fn initialize(target: LogTarget, level: &str) {
    let level = level.parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level {level:?}, using info");
        LevelFilter::Info
    });
    shell_logging::initialize(target.destination(), level);
}

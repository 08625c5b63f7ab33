//! Logger setup.
//!
//! The game owns the terminal (raw mode + alternate screen), so log
//! lines go to the configured file. Without a file, logging only
//! reaches stderr when `RUST_LOG` asks for it explicitly.

use std::fs::OpenOptions;

use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::config::LogConfig;

/// Parse a config level name (`off`, `error`, ..., `trace`).
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    name.trim().parse().ok()
}

/// Parse a config level name. Unknown names turn logging off.
pub fn level_filter(name: &str) -> LevelFilter {
    parse_level(name).unwrap_or(LevelFilter::Off)
}

/// Base filter before `RUST_LOG` is applied. Without a log file the
/// only output is stderr, which the game screen covers, so the
/// configured level is ignored unless `RUST_LOG` is set.
pub fn base_filter(cfg: &LogConfig, rust_log_set: bool) -> LevelFilter {
    if cfg.file.is_none() && !rust_log_set {
        LevelFilter::Off
    } else {
        level_filter(&cfg.level)
    }
}

/// Initialize the global logger. `RUST_LOG`, if set, overrides the
/// configured level.
pub fn init_logger(cfg: &LogConfig) {
    let rust_log = std::env::var("RUST_LOG").ok();

    let mut builder = Builder::new();
    builder
        .filter(None, base_filter(cfg, rust_log.is_some()))
        .format_timestamp(None)
        .format_module_path(false);

    if let Some(spec) = &rust_log {
        builder.parse_filters(spec);
    }

    if let Some(path) = &cfg.file {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                // Nowhere safe to write while the game is on screen.
                builder.filter(None, LevelFilter::Off);
                builder.target(Target::Stderr);
                eprintln!("could not open log file {}: {e}", path.display());
            }
        }
    }

    if builder.try_init().is_ok() {
        log::info!("logger initialized at {:?}", log::max_level());
    }
}

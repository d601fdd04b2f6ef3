//! Per-instance leveled logger.
//!
//! Level gating happens here, per logger, instead of relying only on the
//! global subscriber: a silent builder stays silent even when the process
//! runs with `RUST_LOG=debug`. Events that pass are emitted through
//! `tracing` with the logger name attached.

use std::fmt::Display;

use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Logger construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerOptions {
    pub name: String,
    pub silent: bool,
    pub verbose: bool,
}

impl LoggerOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            silent: false,
            verbose: false,
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

macro_rules! emit {
    ($level:expr, $($arg:tt)+) => {
        if $level == Level::ERROR {
            tracing::error!($($arg)+)
        } else if $level == Level::WARN {
            tracing::warn!($($arg)+)
        } else if $level == Level::INFO {
            tracing::info!($($arg)+)
        } else if $level == Level::DEBUG {
            tracing::debug!($($arg)+)
        } else {
            tracing::trace!($($arg)+)
        }
    };
}

/// Leveled logger owned by one builder.
#[derive(Debug, Clone)]
pub struct BuildLogger {
    name: String,
    level: LevelFilter,
}

impl BuildLogger {
    /// Silent wins over verbose: a silent logger only lets fatal messages
    /// through, and nothing in this crate logs at fatal.
    pub fn new(options: &LoggerOptions) -> Self {
        let level = if options.silent {
            LevelFilter::OFF
        } else if options.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };

        Self {
            name: options.name.clone(),
            level,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    pub fn debug(&self, message: impl Display) {
        self.log(Level::DEBUG, None, &message);
    }

    pub fn info(&self, message: impl Display) {
        self.log(Level::INFO, None, &message);
    }

    pub fn warn(&self, message: impl Display) {
        self.log(Level::WARN, None, &message);
    }

    pub fn error(&self, message: impl Display) {
        self.log(Level::ERROR, None, &message);
    }

    /// Log at info with a structured payload rendered as JSON.
    pub fn info_with<T: Serialize + ?Sized>(&self, payload: &T, message: impl Display) {
        if self.enabled(Level::INFO) {
            self.log(Level::INFO, serde_json::to_string(payload).ok(), &message);
        }
    }

    /// Log at error with a structured payload rendered as JSON.
    pub fn error_with<T: Serialize + ?Sized>(&self, payload: &T, message: impl Display) {
        if self.enabled(Level::ERROR) {
            self.log(Level::ERROR, serde_json::to_string(payload).ok(), &message);
        }
    }

    fn log(&self, level: Level, payload: Option<String>, message: &dyn Display) {
        if !self.enabled(level) {
            return;
        }
        match payload {
            Some(payload) => emit!(level, logger = %self.name, payload = %payload, "{}", message),
            None => emit!(level, logger = %self.name, "{}", message),
        }
    }
}

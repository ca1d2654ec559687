use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};

/// Writes timestamped log lines to stderr, keeping stdout for results
#[derive(Clone, Copy)]
pub struct CliLogger {
    level: LevelFilter,
}

impl CliLogger {
    /// Each `-v` raises the level by one step from warnings
    pub fn new(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(self.level);
        Ok(())
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}", format_line(record.level(), record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

fn format_line(level: Level, target: &str, message: &std::fmt::Arguments) -> String {
    format!(
        "{} {:<5} [{}] {}",
        Local::now().format("%H:%M:%S%.3f"),
        level,
        target,
        message
    )
}

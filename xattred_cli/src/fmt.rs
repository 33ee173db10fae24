use colored::{ColoredString, Colorize};
use std::path::Path;

use crate::Error;
use xattred_core::AttributeRecord;

pub fn err(err: &Error) -> String {
    match err {
        Error::Store(e) if e.is_partial_commit() => format!(
            "{} {}",
            "PARTIAL COMMIT".yellow().bold(),
            e.to_string().white().bold()
        ),
        e => format!("{} {}", "ERROR".red().bold(), e.to_string().white().bold()),
    }
}

pub fn warn<S: AsRef<str>>(msg: S) -> String {
    format!("{} {}", "WARNING".yellow().bold(), msg.as_ref().white().bold())
}

pub fn ok<S: AsRef<str>>(msg: S) -> String {
    format!("{} {}", "OK".green().bold(), msg.as_ref().white().bold())
}

pub fn path<P: AsRef<Path>>(path: P) -> ColoredString {
    path.as_ref().display().to_string().bold().blue()
}

pub fn name(record: &AttributeRecord) -> ColoredString {
    if record.name().chars().any(|c| c.is_ascii_whitespace()) {
        format!("\"{}\"", record.name()).cyan().bold()
    } else {
        record.name().cyan().bold()
    }
}

pub fn value(record: &AttributeRecord) -> ColoredString {
    match record.value() {
        Some(value) => value.normal(),
        None => "".dimmed(),
    }
}

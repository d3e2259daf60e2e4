//! Parsers for PSI pressure files.
//!
//! Format (cgroup v2 `*.pressure` and `/proc/pressure/*`):
//!
//! ```text
//! some avg10=0.00 avg60=0.00 avg300=0.00 total=0
//! full avg10=0.00 avg60=0.00 avg300=0.00 total=0
//! ```
//!
//! Unknown leading tokens and unknown keys are skipped so that fields added
//! by newer kernels do not break parsing. Known keys are strictly validated.

use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use tracing::trace;

use crate::error::{PsiError, Result};
use crate::model::{PressureKind, PressureRecord, PressureStats, PressureWindow};

/// Identifies the pressure file a stream was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressureFile<'a> {
    /// Directory holding the file. Used for error context only.
    pub dir: &'a Path,
    /// File name relative to `dir`.
    pub name: &'a str,
    /// Resource domain, selects the destination slot.
    pub kind: PressureKind,
}

impl<'a> PressureFile<'a> {
    /// `<dir>/cpu.pressure` and friends.
    pub fn cgroup(dir: &'a Path, kind: PressureKind) -> Self {
        Self {
            dir,
            name: kind.cgroup_file_name(),
            kind,
        }
    }

    /// `<proc>/pressure/cpu` and friends; `dir` is the `pressure` directory.
    pub fn system(dir: &'a Path, kind: PressureKind) -> Self {
        Self {
            dir,
            name: kind.as_str(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Some,
    Full,
}

/// Reads a pressure file line by line into the slot of `target` selected by
/// `file.kind`.
///
/// Only the `some`/`full` windows that are actually present are written; a
/// repeated line overwrites the earlier one. The first malformed line aborts
/// the scan, and windows written before it stay written.
pub fn parse_pressure<R: BufRead>(
    reader: R,
    file: PressureFile<'_>,
    target: Option<&mut PressureStats>,
) -> Result<()> {
    let Some(target) = target else {
        return Err(PsiError::invalid_argument("pressure stats target is None"));
    };

    for line in reader.lines() {
        let line = line.map_err(|e| PsiError::stream_read(file.dir, file.name, e))?;
        if let Some((severity, window)) = decode_line(&line)? {
            let record = target.record_mut(file.kind);
            match severity {
                Severity::Some => record.some = window,
                Severity::Full => record.full = window,
            }
        }
    }

    Ok(())
}

/// Decodes the `key=value` fields following the leading token of a line.
///
/// Keys missing from `fields` stay zero. Duplicate keys: last one wins.
pub fn decode_window<'a, I>(fields: I) -> Result<PressureWindow>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut window = PressureWindow::default();

    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            return Err(PsiError::malformed_token(field));
        };

        match key {
            "avg10" => window.avg10 = parse_avg(key, value)?,
            "avg60" => window.avg60 = parse_avg(key, value)?,
            "avg300" => window.avg300 = parse_avg(key, value)?,
            "total" => window.total = parse_total(key, value)?,
            _ => {}
        }
    }

    Ok(window)
}

/// Digits only: `u64::from_str` would also take a leading `+`.
fn parse_total(key: &str, value: &str) -> Result<u64> {
    if !value.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(PsiError::invalid_value(key, value));
    }
    value
        .parse()
        .map_err(|_| PsiError::invalid_value(key, value))
}

fn parse_avg(key: &str, value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PsiError::invalid_value(key, value)),
    }
}

/// Returns `None` for lines that carry no window (blank or unknown token).
fn decode_line(line: &str) -> Result<Option<(Severity, PressureWindow)>> {
    let mut fields = line.split_whitespace();
    let severity = match fields.next() {
        Some("some") => Severity::Some,
        Some("full") => Severity::Full,
        Some(other) => {
            trace!(token = other, "skipping unrecognized pressure line");
            return Ok(None);
        }
        None => return Ok(None),
    };

    decode_window(fields).map(|window| Some((severity, window)))
}

impl FromStr for PressureRecord {
    type Err = PsiError;

    fn from_str(content: &str) -> Result<Self> {
        let mut record = PressureRecord::default();
        for line in content.lines() {
            match decode_line(line)? {
                Some((Severity::Some, window)) => record.some = window,
                Some((Severity::Full, window)) => record.full = window,
                None => {}
            }
        }
        Ok(record)
    }
}

//! cgpsi - Pressure Stall Information reader.
//!
//! Reads cpu, memory and io pressure for a cgroup v2 directory or for the
//! whole system and prints it once, as text or JSON.

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use cgpsi_core::collector::{PressureCollector, RealFs};
use cgpsi_core::{PressureKind, PressureStats, PressureWindow, PsiError};

#[derive(Parser)]
#[command(name = "cgpsi", about = "Read pressure stall information", version)]
struct Args {
    /// Path to the cgroup v2 directory to read.
    #[arg(long, value_name = "PATH", default_value = "/sys/fs/cgroup")]
    cgroup: PathBuf,

    /// Read system-wide pressure from <proc-path>/pressure instead of a cgroup.
    #[arg(long, conflicts_with = "cgroup")]
    system: bool,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    /// Unix timestamp of the reading.
    timestamp: i64,
    /// Directory the pressure files were read from.
    source: String,
    pressure: &'a PressureStats,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Psi(#[from] PsiError),

    #[error("failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["cgpsi", "cgpsi_core"] {
        if let Ok(directive) = format!("{target}={level}").parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn format_window(window: &PressureWindow) -> String {
    format!(
        "avg10={:.2} avg60={:.2} avg300={:.2} total={}",
        window.avg10, window.avg60, window.avg300, window.total
    )
}

fn print_text(stats: &PressureStats) {
    for kind in PressureKind::ALL {
        match stats.get(kind) {
            Some(record) => {
                println!("{:<6} some {}", kind, format_window(&record.some));
                println!("{:<6} full {}", "", format_window(&record.full));
            }
            None => println!("{:<6} unavailable", kind),
        }
    }
}

/// Writes the report as pretty-printed JSON followed by a newline.
fn write_report<W: Write>(mut writer: W, report: &Report<'_>) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)?;
    Ok(())
}

/// Formats an error together with its chain of sources.
fn describe_error(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        // StreamRead/Open already embed their cause in the message
        if !text.ends_with(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

fn run(args: &Args) -> Result<(), CliError> {
    let fs = RealFs::new();
    let collector = if args.system {
        PressureCollector::system(fs, &args.proc_path)
    } else {
        PressureCollector::cgroup(fs, &args.cgroup)
    };

    debug!("reading pressure from {}", collector.dir().display());
    if !collector.is_available() {
        info!(
            "no pressure files in {} (kernel without PSI?)",
            collector.dir().display()
        );
    }

    let stats = collector.collect()?;

    if args.json {
        let report = Report {
            timestamp: Utc::now().timestamp(),
            source: collector.dir().display().to_string(),
            pressure: &stats,
        };
        write_report(io::stdout().lock(), &report)?;
    } else {
        print_text(&stats);
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", describe_error(&e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgpsi_core::PressureRecord;

    /// Writer whose every write fails, like a closed stdout pipe.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample_report(stats: &PressureStats) -> Report<'_> {
        Report {
            timestamp: 1_700_000_000,
            source: "/sys/fs/cgroup".to_string(),
            pressure: stats,
        }
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["cgpsi"]);
        assert_eq!(args.cgroup, PathBuf::from("/sys/fs/cgroup"));
        assert_eq!(args.proc_path, PathBuf::from("/proc"));
        assert!(!args.system);
        assert!(!args.json);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_system_conflicts_with_cgroup() {
        assert!(Args::try_parse_from(["cgpsi", "--system", "--cgroup", "/x"]).is_err());
        let args = Args::try_parse_from(["cgpsi", "--system", "-vv", "--json"]).unwrap();
        assert!(args.system);
        assert!(args.json);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_format_window() {
        let window = PressureWindow {
            avg10: 1.5,
            avg60: 2.75,
            avg300: 3.1,
            total: 12345,
        };
        assert_eq!(
            format_window(&window),
            "avg10=1.50 avg60=2.75 avg300=3.10 total=12345"
        );
    }

    #[test]
    fn test_describe_error_does_not_repeat_cause() {
        let err = PsiError::stream_read(
            "/sys/fs/cgroup",
            "io.pressure",
            io::Error::new(io::ErrorKind::Other, "device gone"),
        );
        assert_eq!(
            describe_error(&err),
            "unable to read /sys/fs/cgroup/io.pressure: device gone"
        );
    }

    #[test]
    fn test_report_json_shape() {
        let stats = PressureStats {
            memory: Some(PressureRecord::default()),
            ..PressureStats::default()
        };
        let value = serde_json::to_value(sample_report(&stats)).unwrap();
        assert_eq!(value["timestamp"], 1_700_000_000);
        assert!(value["pressure"]["cpu"].is_null());
        assert_eq!(value["pressure"]["memory"]["full"]["total"], 0);
    }

    #[test]
    fn test_write_report_ends_with_newline() {
        let stats = PressureStats::default();
        let mut out = Vec::new();
        write_report(&mut out, &sample_report(&stats)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("}\n"));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["source"], "/sys/fs/cgroup");
    }

    #[test]
    fn test_write_report_failure_is_an_error() {
        let stats = PressureStats::default();
        let err = write_report(ClosedPipe, &sample_report(&stats)).unwrap_err();
        assert!(matches!(err, CliError::Report(_)));
        assert!(describe_error(&err).starts_with("failed to write report"));
    }

    #[test]
    fn test_psi_error_passes_through_cli_error() {
        let err = CliError::from(PsiError::unknown_file("cpu.stat"));
        assert_eq!(describe_error(&err), "unknown pressure file: \"cpu.stat\"");
    }
}

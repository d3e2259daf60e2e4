//! Pressure collection against real files on disk.

use std::fs;

use cgpsi_core::collector::{PressureCollector, RealFs};
use cgpsi_core::{PressureKind, PressureStats, PsiError};
use tempfile::TempDir;

fn cgroup_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cpu.pressure"),
        "some avg10=0.10 avg60=0.20 avg300=0.30 total=400\nfull avg10=0.00 avg60=0.00 avg300=0.00 total=0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("memory.pressure"),
        "some avg10=0.00 avg60=0.00 avg300=0.00 total=0\nfull avg10=1.50 avg60=2.75 avg300=3.10 total=12345\n",
    )
    .unwrap();
    dir
}

#[test]
fn collect_from_cgroup_directory() {
    let dir = cgroup_dir();
    let collector = PressureCollector::cgroup(RealFs::new(), dir.path());

    assert!(collector.is_available());
    let stats = collector.collect().unwrap();

    assert_eq!(stats.cpu.unwrap().some.total, 400);
    assert_eq!(stats.memory.unwrap().full.avg60, 2.75);
    // io.pressure was never written
    assert!(stats.io.is_none());
}

#[test]
fn collect_from_proc_layout() {
    let proc = tempfile::tempdir().unwrap();
    fs::create_dir(proc.path().join("pressure")).unwrap();
    fs::write(
        proc.path().join("pressure").join("io"),
        "some avg10=5.00 avg60=4.00 avg300=3.00 total=2000\nfull avg10=2.50 avg60=2.00 avg300=1.50 total=1000\n",
    )
    .unwrap();

    let collector = PressureCollector::system(RealFs::new(), proc.path());
    let io = collector.read(PressureKind::Io).unwrap().unwrap();
    assert_eq!(io.some.avg10, 5.00);
    assert_eq!(io.full.total, 1000);
    assert!(collector.read(PressureKind::Cpu).unwrap().is_none());
}

#[test]
fn stat_reports_bad_value_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("io.pressure"),
        "some avg10=1.0 avg60=bad avg300=1.0 total=1\n",
    )
    .unwrap();

    let collector = PressureCollector::cgroup(RealFs::new(), dir.path());
    let mut stats = PressureStats::default();
    let err = collector.stat("io.pressure", Some(&mut stats)).unwrap_err();

    assert!(matches!(&err, PsiError::InvalidValue { value, .. } if value == "bad"));
    assert!(err.to_string().contains("bad"));
    assert!(stats.io.is_none());
}

#[test]
fn empty_directory_has_no_pressure() {
    let dir = tempfile::tempdir().unwrap();
    let collector = PressureCollector::cgroup(RealFs::new(), dir.path());

    assert!(!collector.is_available());
    assert_eq!(collector.collect().unwrap(), PressureStats::default());
}
